//! Persistence for the library state.
//!
//! The library never touches storage directly; it is handed a
//! [`LibraryRepository`]. The JSON implementation keeps everything in
//! `{dir}/library.json`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingest::model::Book;
use crate::library::error::{LibraryError, LibraryResult};

/// Everything the library persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryState {
    pub books: Vec<Book>,
}

/// Load/save interface injected into [`Library`](super::Library).
pub trait LibraryRepository {
    fn load(&self) -> LibraryResult<LibraryState>;

    fn save(&self, state: &LibraryState) -> LibraryResult<()>;
}

/// Repository backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Store the library at `{dir}/library.json`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("library.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LibraryRepository for JsonFileRepository {
    /// A missing file is an empty library.
    fn load(&self) -> LibraryResult<LibraryState> {
        if !self.path.exists() {
            return Ok(LibraryState::default());
        }
        let data = std::fs::read_to_string(&self.path).map_err(|e| LibraryError::StoreIo {
            message: format!("read {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&data).map_err(|e| LibraryError::StoreIo {
            message: format!("parse {}: {e}", self.path.display()),
        })
    }

    fn save(&self, state: &LibraryState) -> LibraryResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LibraryError::StoreIo {
                message: format!("create dir {}: {e}", parent.display()),
            })?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| LibraryError::StoreIo {
            message: format!("serialize library: {e}"),
        })?;
        std::fs::write(&self.path, json).map_err(|e| LibraryError::StoreIo {
            message: format!("write {}: {e}", self.path.display()),
        })
    }
}

/// In-process repository, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RefCell<LibraryState>,
    saves: RefCell<usize>,
}

impl MemoryRepository {
    pub fn new(state: LibraryState) -> Self {
        Self {
            state: RefCell::new(state),
            saves: RefCell::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    /// A copy of the last saved state.
    pub fn snapshot(&self) -> LibraryState {
        self.state.borrow().clone()
    }
}

impl LibraryRepository for MemoryRepository {
    fn load(&self) -> LibraryResult<LibraryState> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &LibraryState) -> LibraryResult<()> {
        *self.state.borrow_mut() = state.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
