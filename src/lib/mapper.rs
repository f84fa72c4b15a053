use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio::{self, MediaKind, TARGET_EXTENSION};
use crate::error::{RenameError, Result};
use crate::normalize::normalize;

/// Number of directory levels between the input root and every file:
/// GENRE/COMPOSER/TYPE/SUBTYPE
pub const EXPECTED_DEPTH: usize = 4;

/// A file's location below the input root, split into directory names and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath {
    pub dirs: Vec<String>,
    pub file_name: String,
}

impl RelativePath {
    /// Split `source` into its parts below `input_root`.
    ///
    /// Returns `None` when `source` isn't under `input_root`. Names that
    /// aren't UTF-8 are converted lossily; normalization drops the
    /// replacement characters anyway.
    pub fn from_source(input_root: &Path, source: &Path) -> Option<Self> {
        let relative = source.strip_prefix(input_root).ok()?;
        let mut parts = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        let file_name = parts.pop()?;
        Some(Self {
            dirs: parts,
            file_name,
        })
    }

    /// Directory levels above the file name
    pub fn depth(&self) -> usize {
        self.dirs.len()
    }

    /// Reject anything that isn't exactly GENRE/COMPOSER/TYPE/SUBTYPE/FILENAME.
    pub fn check_depth(&self) -> Result<()> {
        if self.depth() != EXPECTED_DEPTH {
            return Err(RenameError::DepthMismatch {
                path: self.dirs.iter().collect(),
                depth: self.depth(),
                expected: EXPECTED_DEPTH,
            });
        }
        Ok(())
    }

    pub fn as_path(&self) -> PathBuf {
        self.dirs.iter().chain(std::iter::once(&self.file_name)).collect()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

/// What has to happen to get a source file to its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Re-encode to MP3
    Convert,
    /// Byte copy of an MP3
    Copy,
    /// Destination already present, nothing to produce
    Skip,
}

impl From<MediaKind> for Action {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Convert => Action::Convert,
            MediaKind::Copy => Action::Copy,
        }
    }
}

/// Decide convert vs. copy from the original (un-normalized) file name.
pub fn action_for(file_name: &str) -> Result<Action> {
    audio::classify(file_name)
        .map(Action::from)
        .ok_or_else(|| RenameError::UnsupportedType(PathBuf::from(file_name)))
}

/// Normalize a file name, rejecting names left with nothing before the extension.
///
/// `東京.flac` normalizes to `.flac`, which has no stem and would collide
/// with every other such name in the directory.
pub fn normalized_file_name(file_name: &str) -> Result<String> {
    let name = normalize(file_name);
    if Path::new(&name).extension().is_none() {
        return Err(RenameError::UnsupportedType(PathBuf::from(file_name)));
    }
    Ok(name)
}

/// Destination of a file below `output_root`, every level normalized.
///
/// Converted files always end in `.mp3`. Does not touch the filesystem.
pub fn destination_path(output_root: &Path, rel: &RelativePath) -> Result<PathBuf> {
    let kind = action_for(&rel.file_name)?;

    let mut destination = output_root.to_path_buf();
    for dir in &rel.dirs {
        destination.push(normalize(dir));
    }
    destination.push(normalized_file_name(&rel.file_name)?);

    if kind == Action::Convert {
        destination.set_extension(TARGET_EXTENSION);
    }
    Ok(destination)
}

/// Map a relative source path to its destination and the action needed there.
///
/// An existing destination file turns `Convert`/`Copy` into `Skip`; output
/// already on disk is never overwritten.
pub fn map_path(output_root: &Path, rel: &RelativePath) -> Result<(PathBuf, Action)> {
    let action = action_for(&rel.file_name)?;
    let destination = destination_path(output_root, rel)?;

    if destination.is_file() {
        return Ok((destination, Action::Skip));
    }
    Ok((destination, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    fn rel(dirs: &[&str], file_name: &str) -> RelativePath {
        RelativePath {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
            file_name: file_name.to_string(),
        }
    }

    #[test]
    fn test_from_source() {
        let root = Path::new("/music/in");
        let source = root.join("Rock/Beethoven/Symphony/No9/track1.flac");
        let parsed = RelativePath::from_source(root, &source).unwrap();
        assert_eq!(parsed, rel(&["Rock", "Beethoven", "Symphony", "No9"], "track1.flac"));
        assert_eq!(parsed.depth(), 4);
        assert_eq!(parsed.to_string(), "Rock/Beethoven/Symphony/No9/track1.flac");

        assert!(RelativePath::from_source(root, Path::new("/elsewhere/a.mp3")).is_none());
    }

    #[test]
    fn test_check_depth() {
        assert!(rel(&["A", "B", "C", "D"], "t.mp3").check_depth().is_ok());

        let bad: [&[&str]; 4] = [&["A"], &["A", "B", "C"], &["A", "B", "C", "D", "E"], &[]];
        for dirs in bad {
            match rel(dirs, "t.mp3").check_depth() {
                Err(RenameError::DepthMismatch { depth, expected, .. }) => {
                    assert_eq!(depth, dirs.len());
                    assert_eq!(expected, EXPECTED_DEPTH);
                }
                other => panic!("expected depth mismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_action_for() {
        assert_eq!(action_for("a.flac").unwrap(), Action::Convert);
        assert_eq!(action_for("a.ogg").unwrap(), Action::Convert);
        assert_eq!(action_for("a.mp3").unwrap(), Action::Copy);
        assert!(matches!(
            action_for("a.wav"),
            Err(RenameError::UnsupportedType(_))
        ));
        assert!(matches!(
            action_for("a.FLAC"),
            Err(RenameError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_map_path_converts_to_mp3() -> Result<()> {
        let out = TempDir::new()?;
        let (dest, action) = map_path(
            out.path(),
            &rel(&["Rock", "Beethoven", "Symphony", "No9"], "track1.flac"),
        )?;
        assert_eq!(action, Action::Convert);
        assert_eq!(dest, out.path().join("Rock/Beethoven/Symphony/No9/track1.mp3"));
        Ok(())
    }

    #[test]
    fn test_map_path_normalizes_every_level() -> Result<()> {
        let out = TempDir::new()?;
        let (dest, action) = map_path(
            out.path(),
            &rel(
                &["Rock & Roll", "Bach, J.S.", "Cantatas (Complete)", "Vol 1"],
                "01 - Intro (Live).mp3",
            ),
        )?;
        assert_eq!(action, Action::Copy);
        assert_eq!(
            dest,
            out.path().join("RockAndRoll/BachJ.S./Cantatas/Vol1/01-Intro.mp3")
        );
        Ok(())
    }

    #[test]
    fn test_map_path_skips_existing_destination() -> Result<()> {
        let out = TempDir::new()?;
        let target_dir = out.path().join("Rock/Beethoven/Symphony/No9");
        fs::create_dir_all(&target_dir)?;
        fs::write(target_dir.join("track1.mp3"), b"already here")?;

        let (dest, action) = map_path(
            out.path(),
            &rel(&["Rock", "Beethoven", "Symphony", "No9"], "track1.flac"),
        )?;
        assert_eq!(action, Action::Skip);
        assert_eq!(dest, target_dir.join("track1.mp3"));
        Ok(())
    }

    #[test]
    fn test_name_without_ascii_stem_is_rejected() {
        assert_eq!(normalized_file_name("01 - Intro.flac").unwrap(), "01-Intro.flac");
        for name in ["東京.flac", "大阪.mp3", "(Live).mp3"] {
            match map_path(Path::new("/out"), &rel(&["A", "B", "C", "D"], name)) {
                Err(RenameError::UnsupportedType(p)) => assert_eq!(p, Path::new(name)),
                other => panic!("expected unsupported type for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_map_path_rejects_unknown_type() {
        let err = map_path(Path::new("/out"), &rel(&["A", "B", "C", "D"], "notes.txt"));
        assert!(matches!(err, Err(RenameError::UnsupportedType(p)) if p == Path::new("notes.txt")));
    }
}
