//! Curation settings read from `hpoa.toml`.
//!
//! ```toml
//! [curation]
//! curator = "jdoe"
//!
//! [filter]
//! match_mode = "prefix"
//!
//! [export]
//! format = "json"
//! include_provenance = false
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use hpoa_core::MatchMode;
use hpoa_output::{ExportFormat, ExportOptions};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "hpoa.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => Some("Check the --config path, or omit it to use ./hpoa.toml."),
            Self::Parse { .. } => Some(
                "Known keys: [curation] curator, [filter] match_mode, \
                 [export] format and include_provenance.",
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurationConfig {
    pub curation: CurationSection,
    pub filter: FilterSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurationSection {
    /// Name stamped as `HPO:<curator>[date]` on accepted suggestions.
    pub curator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub format: ExportFormat,
    pub include_provenance: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            format: ExportFormat::Tsv,
            include_provenance: true,
        }
    }
}

impl ExportSection {
    pub fn options(&self) -> ExportOptions {
        ExportOptions::new(self.format).with_provenance(self.include_provenance)
    }
}

impl CurationConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`, or `hpoa.toml` in `dir` when no path is given.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (dir.join(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(&path) {
            Ok(text) => {
                let config = Self::from_toml(&text, &path)?;
                info!(path = %path.display(), "loaded config");
                Ok(config)
            }
            Err(source) if !required && source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }
}
