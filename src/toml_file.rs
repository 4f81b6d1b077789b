//! Shared load/save for the TOML files under the config directory.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure touching a TOML file. Callers convert it into their own
/// diagnostic error so the code and help text stay specific.
#[derive(Debug)]
pub enum TomlFileError {
    Read { path: String, source: std::io::Error },
    Parse { path: String, message: String },
    Write { path: String, source: std::io::Error },
}

/// Read `path` as TOML. A missing file yields `T::default()`.
pub fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, TomlFileError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| TomlFileError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| TomlFileError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write `value` to `path` as pretty TOML, creating parent directories.
pub fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), TomlFileError> {
    let content = toml::to_string_pretty(value).map_err(|e| TomlFileError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TomlFileError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| TomlFileError::Write {
        path: path.display().to_string(),
        source: e,
    })
}
