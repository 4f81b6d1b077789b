//! XDG-compliant path resolution for ebook-reader.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(ebook::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(ebook::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Directories used by ebook-reader.
#[derive(Debug, Clone)]
pub struct ReaderPaths {
    /// `$XDG_CONFIG_HOME/ebook-reader/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/ebook-reader/`
    pub data_dir: PathBuf,
}

impl ReaderPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("ebook-reader");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("ebook-reader");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Paths rooted at explicit directories.
    pub fn at(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Create the base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// `config_dir/config.toml`
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// `config_dir/settings.toml`
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }
}

type Resolver = fn() -> PathResult<ReaderPaths>;

/// [`ReaderPaths`] looked up on first use.
///
/// Explicit locations (command-line flags, `library_dir` in the config)
/// bypass the XDG lookup, so a missing `HOME` only matters when a default
/// is actually needed.
pub struct LazyPaths<F = Resolver> {
    resolve: F,
    cached: Option<ReaderPaths>,
}

impl LazyPaths {
    pub fn new() -> Self {
        Self::with(ReaderPaths::resolve as Resolver)
    }
}

impl Default for LazyPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut() -> PathResult<ReaderPaths>> LazyPaths<F> {
    /// Use `resolve` instead of the environment lookup.
    pub fn with(resolve: F) -> Self {
        Self {
            resolve,
            cached: None,
        }
    }

    /// The resolved directories. Resolution runs at most once on success.
    pub fn get(&mut self) -> PathResult<&ReaderPaths> {
        let paths = match self.cached.take() {
            Some(paths) => paths,
            None => (self.resolve)()?,
        };
        Ok(&*self.cached.insert(paths))
    }

    /// `explicit`, or the default `config.toml`.
    pub fn config_file_or(&mut self, explicit: Option<PathBuf>) -> PathResult<PathBuf> {
        match explicit {
            Some(path) => Ok(path),
            None => Ok(self.get()?.config_file()),
        }
    }

    /// `explicit`, or the default data directory.
    pub fn data_dir_or(&mut self, explicit: Option<PathBuf>) -> PathResult<PathBuf> {
        match explicit {
            Some(path) => Ok(path),
            None => Ok(self.get()?.data_dir.clone()),
        }
    }
}
