// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ebook-reader
//!
//! Converts EPUB, PDF, and plain-text files into a normalized, paginated
//! [`Book`](ingest::Book) and keeps them in a persistent library with
//! reading progress and bookmarks.
//!
//! ## Architecture
//!
//! - **Ingestion** (`ingest`): format detection, per-format converters, normalization
//! - **Library** (`library`): repository-backed book store, bookmarks, in-book search
//! - **Settings** (`settings`): reading theme and typography preferences
//! - **Config** (`config`, `paths`): `config.toml` and XDG directories
//!
//! ## Library usage
//!
//! ```no_run
//! use ebook_reader::ingest::IngestConfig;
//! use ebook_reader::library::{JsonFileRepository, Library};
//!
//! let repo = JsonFileRepository::new(std::path::Path::new("/tmp/books"));
//! let mut library = Library::open(repo).unwrap();
//! let report = library.import(&["novel.epub", "notes.txt"], &IngestConfig::default()).unwrap();
//! for book in &report.books {
//!     println!("{} ({} pages)", book.title, book.total_pages);
//! }
//! ```

pub mod config;
pub mod ingest;
pub mod library;
pub mod paths;
pub mod settings;
mod toml_file;
