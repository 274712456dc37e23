//! Configuration: an optional `codelinks.toml` layered under command-line flags.
//!
//! ```toml
//! id_pattern = "IMPL_[0-9]+"
//! id_ref_markers = ["@need-ids:", "@implements:"]
//! strict = true
//! format = "json"
//! raw = false
//! include = ["c", "h", "rs"]
//! ```

use crate::comments;
use anyhow::{Context, Result};
use codelinks_syntax::ScanOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "codelinks.toml";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub id_pattern: Option<String>,
    pub id_ref_markers: Option<Vec<String>>,
    pub strict: Option<bool>,
    pub format: Option<String>,
    pub raw: Option<bool>,
    /// Extensions picked up when a directory is given.
    pub include: Option<Vec<String>>,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `explicit`, or `codelinks.toml` if it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
            None => return Ok(Self::default()),
        };
        debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Layer `flags` over `self`. Any value set in `flags` wins, including a
    /// switch turned off with `--no-strict` or `--no-raw`.
    pub fn merge(self, flags: Config) -> Config {
        Config {
            id_pattern: flags.id_pattern.or(self.id_pattern),
            id_ref_markers: flags.id_ref_markers.or(self.id_ref_markers),
            strict: flags.strict.or(self.strict),
            format: flags.format.or(self.format),
            raw: flags.raw.or(self.raw),
            include: flags.include.or(self.include),
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub options: ScanOptions,
    pub strict: bool,
    pub raw: bool,
    pub format: String,
    pub include: Vec<String>,
}

impl TryFrom<Config> for Settings {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self> {
        let mut options = ScanOptions::new();
        if let Some(pattern) = config.id_pattern.as_deref() {
            options = options.with_id_pattern(pattern)?;
        }
        if let Some(markers) = config.id_ref_markers {
            options = options.with_id_ref_markers(markers)?;
        }
        let include = config
            .include
            .map(|exts| {
                exts.into_iter()
                    .map(|ext| ext.trim_start_matches('.').to_string())
                    .collect()
            })
            .unwrap_or_else(comments::supported_extensions);
        Ok(Settings {
            options,
            strict: config.strict.unwrap_or(false),
            raw: config.raw.unwrap_or(false),
            format: config.format.unwrap_or_else(|| "markdown".to_string()),
            include,
        })
    }
}
