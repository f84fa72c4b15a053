use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use musren::config::{RunConfig, ToolSettings};
use musren::utils::expand_dir;
use musren::RenameError;

mod commands;

const LONG_ABOUT: &str = "\
Copy every music file under <INPUT_DIR> into <OUTPUT_DIR>, renaming each
directory and file to a shell-safe form. The input tree must look like

    GENRE/COMPOSER/TYPE/SUBTYPE/FILENAME

m4a, mp4, ogg and flac files are converted to MP3; MP3 files are copied.
Afterwards the title, genre, artist and album tags are rewritten from the
directory names. A directory named 'misc' means 'no value'.

Encoder and copy tool can be overridden with MUSREN_FFMPEG, MUSREN_BITRATE
and MUSREN_COPY (a .env file is read if present).";

#[derive(Parser)]
#[command(author, version, about, long_about = LONG_ABOUT)]
struct Cli {
    /// Assume files are already converted/copied and just edit the tags
    #[arg(short = 'i', long = "id3")]
    id3: bool,
    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Print every step, not just the commands being run
    #[arg(short, long)]
    verbose: bool,
    /// Root of the GENRE/COMPOSER/TYPE/SUBTYPE tree
    input_dir: String,
    /// Where the renamed tree is written
    output_dir: String,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status for a failed parse. Help output counts as a usage error;
/// only `--version` succeeds.
fn parse_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayVersion => 0,
        _ => RenameError::Usage(err.to_string()).exit_code(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = RunConfig::new(expand_dir(&cli.input_dir), expand_dir(&cli.output_dir));
    config.id3_only = cli.id3;
    config.dry_run = cli.dry_run;
    config.tools = ToolSettings::from_env();

    commands::rename::rename_tree(&config, cli.verbose)?;
    Ok(())
}

fn main() -> ExitCode {
    // Load environment variables from a .env file if present
    dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_status(&err));
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!();
            eprintln!("{:#}", err);
            eprintln!();
            let code = err
                .downcast_ref::<RenameError>()
                .map(RenameError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_dirs() {
        let cli = Cli::try_parse_from(["musren", "-i", "~/in", "/out"]).unwrap();
        assert!(cli.id3);
        assert!(!cli.dry_run);
        assert_eq!(cli.input_dir, "~/in");
        assert_eq!(cli.output_dir, "/out");

        let cli = Cli::try_parse_from(["musren", "--id3", "--dry-run", "a", "b"]).unwrap();
        assert!(cli.id3 && cli.dry_run);
    }

    #[test]
    fn test_help_and_bad_arity_are_errors() {
        let err = Cli::try_parse_from(["musren", "-h"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        assert!(Cli::try_parse_from(["musren", "only-one"]).is_err());
        assert!(Cli::try_parse_from(["musren", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_parse_status() {
        let help = Cli::try_parse_from(["musren", "--help"]).err().unwrap();
        assert_eq!(parse_status(&help), musren::error::EXIT_USAGE);

        let missing = Cli::try_parse_from(["musren"]).err().unwrap();
        assert_eq!(parse_status(&missing), musren::error::EXIT_USAGE);

        let version = Cli::try_parse_from(["musren", "--version"]).err().unwrap();
        assert_eq!(parse_status(&version), 0);
    }

    #[test]
    fn test_missing_input_dir_maps_to_input_status() {
        let cli = Cli::try_parse_from(["musren", "/definitely/missing/in", "/tmp/out"]).unwrap();
        let err = run(cli).unwrap_err();
        let rename_err = err.downcast_ref::<RenameError>().unwrap();
        assert!(matches!(rename_err, RenameError::InputNotFound(_)));
        assert_eq!(rename_err.exit_code(), musren::error::EXIT_INPUT);
    }
}
