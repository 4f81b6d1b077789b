//! Application configuration loaded from `config.toml`.
//!
//! ```toml
//! library_dir = "/srv/books"
//!
//! [ingest]
//! pdf_page_limit = 20
//! txt_chapter_chars = 2000
//! ```

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::IngestConfig;
use crate::toml_file::{self, TomlFileError};

/// Errors from configuration loading and saving.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(ebook::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(ebook::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(ebook::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl From<TomlFileError> for ConfigError {
    fn from(e: TomlFileError) -> Self {
        match e {
            TomlFileError::Read { path, source } => Self::Read { path, source },
            TomlFileError::Parse { path, message } => Self::Parse { path, message },
            TomlFileError::Write { path, source } => Self::Write { path, source },
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where `library.json` lives; defaults to the XDG data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_dir: Option<PathBuf>,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load from a TOML file; a missing file yields defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Ok(toml_file::load(path)?)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        Ok(toml_file::save(self, path)?)
    }
}
