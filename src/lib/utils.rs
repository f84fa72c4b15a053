use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::audio;
use crate::error::Result;
use crate::mapper::RelativePath;

/// Expand a leading `~` (and `$VARS`) in a user supplied directory
pub fn expand_dir(dir: &str) -> PathBuf {
    match shellexpand::full(dir) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
    }
}

/// An audio file found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rel: RelativePath,
}

/// Result of walking the input tree
pub struct FileScanResult {
    pub audio_files: Vec<SourceFile>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

/// Walk `input_root` and collect every handled, non-hidden audio file.
///
/// Entries are visited in file name order so runs are reproducible.
/// Symlinks to files count as files; symlinked directories are not entered.
/// Unreadable entries abort the scan.
pub fn scan_input_tree(input_root: &Path) -> Result<FileScanResult> {
    let mut audio_files = Vec::new();
    let mut files_scanned = 0;
    let mut files_skipped = 0;

    for entry in WalkDir::new(input_root).sort_by_file_name() {
        let entry = entry?;
        // `Path::is_file` follows the link, `DirEntry::file_type` doesn't
        if !entry.path().is_file() {
            continue;
        }

        files_scanned += 1;
        let path = entry.path();

        if audio::is_hidden(path) || !audio::is_audio_file(path) {
            debug!("Ignoring {}", path.display());
            files_skipped += 1;
            continue;
        }

        match RelativePath::from_source(input_root, path) {
            Some(rel) => audio_files.push(SourceFile {
                path: path.to_path_buf(),
                rel,
            }),
            None => files_skipped += 1,
        }
    }

    Ok(FileScanResult {
        audio_files,
        files_scanned,
        files_skipped,
    })
}
