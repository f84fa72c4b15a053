//! The rename run: scan, validate, then map/produce/tag one file at a time.
//!
//! Any error aborts the whole run. Files finished before the failure stay
//! where they are.

use std::path::Path;
use tracing::{debug, error, info};

use crate::config::RunConfig;
use crate::directory::create_destination_dir;
use crate::error::{RenameError, Result};
use crate::external::{Converter, Copier};
use crate::mapper::{action_for, map_path, normalized_file_name, Action};
use crate::metadata::{derive_tags, TagOutcome, TagWriter};
use crate::progress::{ProgressMessage, ProgressSink};
use crate::utils::{scan_input_tree, SourceFile};

/// Counts for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub converted: usize,
    pub copied: usize,
    pub skipped: usize,
    pub tagged: usize,
    pub untagged: usize,
}

pub struct Pipeline<'a> {
    config: &'a RunConfig,
    converter: &'a dyn Converter,
    copier: &'a dyn Copier,
    tagger: &'a dyn TagWriter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a RunConfig,
        converter: &'a dyn Converter,
        copier: &'a dyn Copier,
        tagger: &'a dyn TagWriter,
    ) -> Self {
        Self {
            config,
            converter,
            copier,
            tagger,
        }
    }

    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<RunSummary> {
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(RenameError::InputNotFound(input_dir.clone()));
        }

        info!("Scanning input directory: {}", input_dir.display());
        let scan = scan_input_tree(input_dir)?;
        progress.send(ProgressMessage::ScanComplete {
            files_scanned: scan.files_scanned,
            audio_files_found: scan.audio_files.len(),
            files_skipped: scan.files_skipped,
        });

        // the whole tree has to be valid before anything is written
        for file in &scan.audio_files {
            validate(file)?;
        }

        let mut summary = RunSummary::default();
        for (index, file) in scan.audio_files.iter().enumerate() {
            self.process_file(index + 1, file, progress, &mut summary)?;
        }

        info!(
            "Converted {}, copied {}, skipped {}, tagged {}, untagged {}",
            summary.converted, summary.copied, summary.skipped, summary.tagged, summary.untagged
        );
        progress.send(ProgressMessage::FinalComplete {
            files_processed: summary.processed,
        });

        Ok(summary)
    }

    fn process_file(
        &self,
        file_num: usize,
        file: &SourceFile,
        progress: &mut dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let (destination, action) = map_path(&self.config.output_dir, &file.rel)?;
        debug!(
            "{} -> {} ({:?})",
            file.path.display(),
            destination.display(),
            action
        );

        if self.config.dry_run {
            self.report_planned(file_num, &file.path, &destination, action, progress);
            summary.processed += 1;
            return Ok(());
        }

        if !self.config.id3_only {
            create_destination_dir(&destination)?;
            self.produce(file_num, &file.path, &destination, action, progress, summary)?;
        }

        let tags = derive_tags(&file.rel.dirs);
        match self.tagger.write_tags(&destination, &tags) {
            Ok(TagOutcome::Written) => summary.tagged += 1,
            Ok(TagOutcome::NoContainer) => summary.untagged += 1,
            Err(source) => {
                error!("full_output_path={}", destination.display());
                return Err(RenameError::TagWrite {
                    path: destination,
                    source,
                });
            }
        }

        summary.processed += 1;
        Ok(())
    }

    /// Convert or copy into place, announcing the command first.
    fn produce(
        &self,
        file_num: usize,
        src: &Path,
        dst: &Path,
        action: Action,
        progress: &mut dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        match action {
            Action::Convert => {
                let command = self.converter.command(src, dst).to_string();
                progress.send(ProgressMessage::FileCommand { file_num, command });
                self.converter.convert(src, dst)?;
                summary.converted += 1;
            }
            Action::Copy => {
                let command = self.copier.command(src, dst).to_string();
                progress.send(ProgressMessage::FileCommand { file_num, command });
                self.copier.copy(src, dst)?;
                summary.copied += 1;
            }
            Action::Skip => {
                progress.send(ProgressMessage::FileSkipped {
                    file_num,
                    destination: dst.display().to_string(),
                });
                summary.skipped += 1;
            }
        }
        Ok(())
    }

    fn report_planned(
        &self,
        file_num: usize,
        src: &Path,
        dst: &Path,
        action: Action,
        progress: &mut dyn ProgressSink,
    ) {
        let message = match action {
            Action::Convert => ProgressMessage::WouldRun {
                file_num,
                command: self.converter.command(src, dst).to_string(),
            },
            Action::Copy => ProgressMessage::WouldRun {
                file_num,
                command: self.copier.command(src, dst).to_string(),
            },
            Action::Skip => ProgressMessage::FileSkipped {
                file_num,
                destination: dst.display().to_string(),
            },
        };
        progress.send(message);
    }
}

/// Depth, type and file name checks, reported against the source path
fn validate(file: &SourceFile) -> Result<()> {
    file.rel.check_depth().map_err(|err| match err {
        RenameError::DepthMismatch {
            depth, expected, ..
        } => RenameError::DepthMismatch {
            path: file.path.parent().unwrap_or(&file.path).to_path_buf(),
            depth,
            expected,
        },
        other => other,
    })?;
    action_for(&file.rel.file_name).map_err(|_| RenameError::UnsupportedType(file.path.clone()))?;
    normalized_file_name(&file.rel.file_name)
        .map_err(|_| RenameError::UnsupportedType(file.path.clone()))?;
    Ok(())
}
