use std::path::PathBuf;
use thiserror::Error;

use crate::external::ProcessError;
use crate::metadata::TagError;

/// Result type for a rename run
pub type Result<T> = std::result::Result<T, RenameError>;

/// Exit status for help output and bad invocations
pub const EXIT_USAGE: u8 = 10;
/// Exit status for bad input trees
pub const EXIT_INPUT: u8 = 20;
/// Exit status for a failed or interrupted external tool
pub const EXIT_PROCESS: u8 = 10;
/// Exit status for a failed tag write
pub const EXIT_TAG: u8 = 1;

/// Everything that can abort a rename run.
///
/// None of these are recovered per file: the first one stops the batch and
/// whatever was already written stays on disk.
#[derive(Error, Debug)]
pub enum RenameError {
    /// Bad command line
    #[error("{0}")]
    Usage(String),

    #[error("Can't find input dir: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("dirpath {} is WRONG! depth={depth}, expected {expected}", .path.display())]
    DepthMismatch {
        path: PathBuf,
        depth: usize,
        expected: usize,
    },

    #[error("Can't process unknown filetype: {}", .0.display())]
    UnsupportedType(PathBuf),

    #[error("Failed to create output directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    ExternalProcess(#[from] ProcessError),

    #[error("Failed to write tags to '{}': {source}", .path.display())]
    TagWrite {
        path: PathBuf,
        #[source]
        source: TagError,
    },
}

impl RenameError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            RenameError::Usage(_) => EXIT_USAGE,
            RenameError::InputNotFound(_)
            | RenameError::DepthMismatch { .. }
            | RenameError::UnsupportedType(_)
            | RenameError::Walk(_) => EXIT_INPUT,
            RenameError::ExternalProcess(_) | RenameError::CreateDir { .. } => EXIT_PROCESS,
            RenameError::TagWrite { .. } => EXIT_TAG,
        }
    }
}
