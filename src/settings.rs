//! Reading settings: theme, font size, font family, line height.
//!
//! Stored as `settings.toml` in the config directory. A missing file means
//! defaults; an unknown value is a parse error rather than silently ignored.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::toml_file::{self, TomlFileError};

/// Errors from loading or saving reading settings.
#[derive(Debug, Error, Diagnostic)]
pub enum SettingsError {
    #[error("failed to read settings: {path}")]
    #[diagnostic(
        code(ebook::settings::read),
        help("Ensure the settings file is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {path}: {message}")]
    #[diagnostic(
        code(ebook::settings::parse),
        help(
            "Valid values: theme = light|dark|sepia, font_size = small|medium|large|extra-large, \
             font_family = inter|crimson|open-sans, line_height = normal|relaxed|loose."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write settings: {path}")]
    #[diagnostic(
        code(ebook::settings::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

impl From<TomlFileError> for SettingsError {
    fn from(e: TomlFileError) -> Self {
        match e {
            TomlFileError::Read { path, source } => Self::Read { path, source },
            TomlFileError::Parse { path, message } => Self::Parse { path, message },
            TomlFileError::Write { path, source } => Self::Write { path, source },
        }
    }
}

macro_rules! setting_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text),+
                })
            }
        }
    };
}

setting_enum!(
    /// Color scheme of the reading view.
    Theme { Light => "light", Dark => "dark", Sepia => "sepia" }
);
setting_enum!(
    FontSize { Medium => "medium", Small => "small", Large => "large", ExtraLarge => "extra-large" }
);
setting_enum!(
    FontFamily { Inter => "inter", Crimson => "crimson", OpenSans => "open-sans" }
);
setting_enum!(
    LineHeight { Normal => "normal", Relaxed => "relaxed", Loose => "loose" }
);

/// How books are presented to the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingSettings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub font_family: FontFamily,
    pub line_height: LineHeight,
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub font_family: Option<FontFamily>,
    pub line_height: Option<LineHeight>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ReadingSettings {
    /// Apply the fields set in `patch`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(family) = patch.font_family {
            self.font_family = family;
        }
        if let Some(height) = patch.line_height {
            self.line_height = height;
        }
    }

    /// Load from a TOML file; a missing file yields defaults.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        Ok(toml_file::load(path)?)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        Ok(toml_file::save(self, path)?)
    }
}
