use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RenameError, Result};

/// Create every directory above `destination` (a file path).
/// Returns the directory the file will live in.
pub fn create_destination_dir(destination: &Path) -> Result<PathBuf> {
    let dir = destination
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(dir);
    }

    fs::create_dir_all(&dir).map_err(|source| RenameError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    debug!("Created directory {}", dir.display());

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_create_destination_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let destination = temp_dir.path().join("Rock/Beethoven/Symphony/No9/track1.mp3");

        let dir = create_destination_dir(&destination)?;

        assert!(dir.is_dir());
        assert_eq!(dir, temp_dir.path().join("Rock/Beethoven/Symphony/No9"));
        assert!(!destination.exists());

        // second call is a no-op
        create_destination_dir(&destination)?;
        Ok(())
    }

    #[test]
    fn test_create_destination_dir_blocked_by_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("Rock"), b"not a directory")?;
        let destination = temp_dir.path().join("Rock/Beethoven/track1.mp3");

        let err = create_destination_dir(&destination).unwrap_err();
        assert!(matches!(err, RenameError::CreateDir { .. }));
        Ok(())
    }
}
