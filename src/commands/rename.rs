use anyhow::Result;
use tracing::info;

use musren::config::RunConfig;
use musren::metadata::LoftyTagWriter;
use musren::progress::StdoutProgress;
use musren::{Pipeline, RunSummary};

/// Run the rename pipeline with the real encoder, copy tool and tag writer.
pub fn rename_tree(config: &RunConfig, verbose: bool) -> Result<RunSummary> {
    let converter = config.tools.converter();
    let copier = config.tools.copier();
    let tagger = LoftyTagWriter::default();

    if config.id3_only {
        info!("Tag-only mode: nothing will be converted or copied");
    }
    info!(
        "Renaming {} -> {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    let mut progress = StdoutProgress { verbose };
    let summary = Pipeline::new(config, &converter, &copier, &tagger).run(&mut progress)?;
    Ok(summary)
}
