//! # musren core library
//!
//! Copies a `GENRE/COMPOSER/TYPE/SUBTYPE/FILENAME` music tree into a new
//! root with shell-safe names, converting everything that isn't MP3, and
//! rewrites each output file's tags from its directory levels.

pub mod audio;
pub mod config;
pub mod directory;
pub mod error;
pub mod external;
pub mod mapper;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod utils;

pub use error::{RenameError, Result};
pub use pipeline::{Pipeline, RunSummary};
