//! Audio file format constants used across the application.
//!
//! Matching is exact and case-sensitive: `track.FLAC` is not an audio file here.

use std::path::Path;

/// Formats that must be re-encoded to MP3
pub const CONVERT_EXTENSIONS: &[&str] = &["mp4", "m4a", "ogg", "flac"];

/// Formats that are copied through unchanged
pub const COPY_EXTENSIONS: &[&str] = &["mp3"];

/// Extension given to every produced file
pub const TARGET_EXTENSION: &str = "mp3";

/// How a source file reaches the output tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Needs the encoder
    Convert,
    /// Already MP3, byte copy
    Copy,
}

/// Classify a file by its extension, `None` if it isn't handled
pub fn classify<P: AsRef<Path>>(path: P) -> Option<MediaKind> {
    let ext = path.as_ref().extension().and_then(|e| e.to_str())?;

    if CONVERT_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Convert)
    } else if COPY_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Copy)
    } else {
        None
    }
}

/// Check if a file path has a handled audio extension
pub fn is_audio_file<P: AsRef<Path>>(path: P) -> bool {
    classify(path).is_some()
}

/// Hidden files (leading dot) are never picked up
pub fn is_hidden<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
