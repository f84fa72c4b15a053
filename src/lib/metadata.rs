use lofty::config::WriteOptions;
use lofty::error::LoftyError;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, Tag};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::normalize;

/// Directory name meaning "nothing to say at this level"
pub const CANONICAL_EMPTY: &str = "misc";

/// Tag values derived from a file's directory levels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedTags {
    pub title: String,
    pub genre: String,
    pub artist: String,
    pub album: String,
}

/// Normalize a directory name, mapping `misc` to the empty string.
pub fn canonical_name(name: &str) -> String {
    let name = normalize(name);
    if name == CANONICAL_EMPTY {
        String::new()
    } else {
        name
    }
}

/// Derive the tags for a file from the directory levels below the input root.
///
/// Levels are GENRE/COMPOSER/TYPE/SUBTYPE with an optional fifth. The
/// GENRE level never reaches a tag:
///
/// * genre  = level 1 (COMPOSER)
/// * artist = level 2 (TYPE)
/// * album  = level 3 (SUBTYPE), plus `_<level 4>` when a fifth level exists
/// * title  = levels 1..=3 joined with `-`
///
/// `misc` levels become empty and drop out of the title and album. With a
/// `misc` SUBTYPE and a fifth level the album is just the fifth level, not
/// `_<level 4>`.
pub fn derive_tags(dirs: &[String]) -> DerivedTags {
    let level = |i: usize| dirs.get(i).map(|d| canonical_name(d)).unwrap_or_default();

    let title = (1..4)
        .map(level)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let album = [level(3), level(4)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    DerivedTags {
        title,
        genre: level(1),
        artist: level(2),
        album,
    }
}

#[derive(Error, Debug)]
pub enum TagError {
    #[error("file '{}' does not exist", .0.display())]
    Missing(PathBuf),

    #[error("could not read tags: {0}")]
    Read(#[source] LoftyError),

    #[error("could not save tags: {0}")]
    Save(#[source] LoftyError),
}

/// What a tag write ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Written,
    /// The file has no tag container and none could be created
    NoContainer,
}

/// Persists derived tags into a media file
pub trait TagWriter {
    fn write_tags(&self, path: &Path, tags: &DerivedTags) -> Result<TagOutcome, TagError>;
}

/// Tag writer backed by lofty.
pub struct LoftyTagWriter {
    /// Insert a tag of the file's primary type when the file has none
    pub create_missing: bool,
}

impl Default for LoftyTagWriter {
    fn default() -> Self {
        Self {
            create_missing: true,
        }
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, tags: &DerivedTags) -> Result<TagOutcome, TagError> {
        if !path.is_file() {
            return Err(TagError::Missing(path.to_path_buf()));
        }

        let mut tagged_file = lofty::read_from_path(path).map_err(TagError::Read)?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            if !self.create_missing || !tagged_file.supports_tag_type(tag_type) {
                warn!("No tag container in {}, leaving tags alone", path.display());
                return Ok(TagOutcome::NoContainer);
            }
            debug!("Creating {:?} tag in {}", tag_type, path.display());
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let Some(tag) = tagged_file.primary_tag_mut() else {
            return Ok(TagOutcome::NoContainer);
        };
        apply_tags(tag, tags);

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(TagError::Save)?;

        Ok(TagOutcome::Written)
    }
}

/// Set every field; an empty value removes the field.
fn apply_tags(tag: &mut Tag, tags: &DerivedTags) {
    if tags.title.is_empty() {
        tag.remove_title();
    } else {
        tag.set_title(tags.title.clone());
    }
    if tags.genre.is_empty() {
        tag.remove_genre();
    } else {
        tag.set_genre(tags.genre.clone());
    }
    if tags.artist.is_empty() {
        tag.remove_artist();
    } else {
        tag.set_artist(tags.artist.clone());
    }
    if tags.album.is_empty() {
        tag.remove_album();
    } else {
        tag.set_album(tags.album.clone());
    }
}
