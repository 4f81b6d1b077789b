//! The reader's book library.
//!
//! Ingested books are kept in a [`Library`] together with reading progress
//! and bookmarks. Persistence goes through a [`LibraryRepository`]; the
//! default one writes `library.json` in the data directory.

pub mod error;
pub mod repository;
pub mod search;
pub mod state;

pub use error::{LibraryError, LibraryResult};
pub use repository::{JsonFileRepository, LibraryRepository, LibraryState, MemoryRepository};
pub use search::{SearchHit, search_book};
pub use state::Library;
