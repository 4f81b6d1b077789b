//! Rich diagnostic error types for the book library.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from library operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("book not found: \"{id}\"")]
    #[diagnostic(
        code(ebook::library::not_found),
        help(
            "No book with this ID or title exists in the library. \
             List available books with `ebook-reader list`."
        )
    )]
    BookNotFound { id: String },

    #[error("\"{query}\" matches {count} books")]
    #[diagnostic(
        code(ebook::library::ambiguous),
        help("Use more characters of the book ID to pick exactly one book.")
    )]
    AmbiguousBook { query: String, count: usize },

    #[error("book already exists: \"{id}\"")]
    #[diagnostic(
        code(ebook::library::duplicate),
        help("A book with this ID is already in the library.")
    )]
    Duplicate { id: String },

    #[error("bookmark not found: \"{id}\"")]
    #[diagnostic(
        code(ebook::library::bookmark_not_found),
        help("List bookmarks with `ebook-reader bookmark list <BOOK>`.")
    )]
    BookmarkNotFound { id: String },

    #[error("page {page} is out of range: \"{title}\" has {total} pages")]
    #[diagnostic(
        code(ebook::library::page_out_of_range),
        help("Pages are numbered from 1.")
    )]
    PageOutOfRange {
        title: String,
        page: usize,
        total: usize,
    },

    #[error("library store I/O error: {message}")]
    #[diagnostic(
        code(ebook::library::store_io),
        help(
            "Failed to read or write the library file. Check that the data \
             directory exists and has correct permissions."
        )
    )]
    StoreIo { message: String },
}

/// Convenience alias for library operation results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
