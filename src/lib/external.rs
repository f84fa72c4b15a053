//! External tools that produce the output files.
//!
//! Conversion and copying both shell out to a blocking process. Each is a
//! trait so the pipeline can be driven by fakes in tests.

use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::debug;

/// Default encoder binary
pub const DEFAULT_ENCODER: &str = "ffmpeg";
/// Default MP3 bitrate handed to the encoder
pub const DEFAULT_BITRATE: &str = "128k";
/// Default copy binary
pub const DEFAULT_COPIER: &str = "cp";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit, or killed by a signal (e.g. ^C)
    #[error("'{command}' failed ({status})")]
    Failed { command: String, status: ExitStatus },
}

/// A program plus arguments, printable the way a shell would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Run to completion; anything but a zero exit is an error.
    pub fn run(&self) -> Result<(), ProcessError> {
        debug!("Running {}", self);
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| ProcessError::Spawn {
                command: self.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ProcessError::Failed {
                command: self.to_string(),
                status,
            });
        }
        Ok(())
    }
}

fn needs_quotes(arg: &str) -> bool {
    arg.is_empty()
        || !arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+".contains(c))
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if needs_quotes(arg) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Re-encodes a media file to MP3
pub trait Converter {
    /// The command that `convert` would run, for progress output
    fn command(&self, src: &Path, dst: &Path) -> ExternalCommand;

    fn convert(&self, src: &Path, dst: &Path) -> Result<(), ProcessError> {
        self.command(src, dst).run()
    }
}

/// Duplicates an MP3 byte for byte
pub trait Copier {
    /// The command that `copy` would run, for progress output
    fn command(&self, src: &Path, dst: &Path) -> ExternalCommand;

    fn copy(&self, src: &Path, dst: &Path) -> Result<(), ProcessError> {
        self.command(src, dst).run()
    }
}

/// ffmpeg at a constant bitrate, quiet unless something breaks.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    pub program: String,
    pub bitrate: String,
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENCODER.to_string(),
            bitrate: DEFAULT_BITRATE.to_string(),
        }
    }
}

impl Converter for FfmpegConverter {
    fn command(&self, src: &Path, dst: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.program)
            .arg("-loglevel")
            .arg("8")
            .arg("-i")
            .path_arg(src)
            .arg("-ab")
            .arg(&self.bitrate)
            .path_arg(dst)
    }
}

/// Plain `cp src dst`
#[derive(Debug, Clone)]
pub struct CommandCopier {
    pub program: String,
}

impl Default for CommandCopier {
    fn default() -> Self {
        Self {
            program: DEFAULT_COPIER.to_string(),
        }
    }
}

impl Copier for CommandCopier {
    fn command(&self, src: &Path, dst: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.program).path_arg(src).path_arg(dst)
    }
}
