//! Run configuration.
//!
//! Everything a run needs is collected here once and passed down; nothing
//! in the pipeline reads process-wide state.

use std::env;
use std::path::PathBuf;

use crate::external::{
    CommandCopier, FfmpegConverter, DEFAULT_BITRATE, DEFAULT_COPIER, DEFAULT_ENCODER,
};

/// Encoder binary override
pub const ENV_ENCODER: &str = "MUSREN_FFMPEG";
/// Encoder bitrate override
pub const ENV_BITRATE: &str = "MUSREN_BITRATE";
/// Copy binary override
pub const ENV_COPIER: &str = "MUSREN_COPY";

/// External tool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub encoder: String,
    pub bitrate: String,
    pub copier: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            encoder: DEFAULT_ENCODER.to_string(),
            bitrate: DEFAULT_BITRATE.to_string(),
            copier: DEFAULT_COPIER.to_string(),
        }
    }
}

impl ToolSettings {
    /// Read overrides from the environment. Call `dotenvy::dotenv()` first
    /// to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            encoder: get(ENV_ENCODER, DEFAULT_ENCODER),
            bitrate: get(ENV_BITRATE, DEFAULT_BITRATE),
            copier: get(ENV_COPIER, DEFAULT_COPIER),
        }
    }

    pub fn converter(&self) -> FfmpegConverter {
        FfmpegConverter {
            program: self.encoder.clone(),
            bitrate: self.bitrate.clone(),
        }
    }

    pub fn copier(&self) -> CommandCopier {
        CommandCopier {
            program: self.copier.clone(),
        }
    }
}

/// Settings for one rename run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Only rewrite tags on files already at their destination
    pub id3_only: bool,
    /// Plan and print, touch nothing
    pub dry_run: bool,
    pub tools: ToolSettings,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            id3_only: false,
            dry_run: false,
            tools: ToolSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_tool_defaults() {
        let tools = ToolSettings::from_lookup(|_| None);
        assert_eq!(tools, ToolSettings::default());
        assert_eq!(tools.converter().program, "ffmpeg");
        assert_eq!(tools.converter().bitrate, "128k");
        assert_eq!(tools.copier().program, "cp");
    }

    #[test]
    fn test_tool_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENCODER, "/usr/local/bin/ffmpeg"),
            (ENV_BITRATE, "192k"),
            (ENV_COPIER, "  "),
        ]
        .into_iter()
        .collect();
        let tools = ToolSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(tools.encoder, "/usr/local/bin/ffmpeg");
        assert_eq!(tools.bitrate, "192k");
        // blank means "use the default"
        assert_eq!(tools.copier, "cp");
    }

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::new("/in", "/out");
        assert!(!config.id3_only);
        assert!(!config.dry_run);
        assert_eq!(config.input_dir, PathBuf::from("/in"));
    }
}
