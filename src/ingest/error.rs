//! Rich diagnostic error types for the ingestion pipeline.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from converting an uploaded file into a [`Book`](super::model::Book).
///
/// Only `UnsupportedFormat` and an EPUB `DocumentOpen` ever leave
/// [`process_file`](super::process_file). Section and page failures are
/// logged and the unit is skipped.
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("unsupported file type: \"{extension}\"")]
    #[diagnostic(
        code(ebook::ingest::unsupported_format),
        help(
            "Supported formats are: epub, pdf, and txt. \
             Rename the file with the correct extension or convert it first."
        )
    )]
    UnsupportedFormat { extension: String },

    #[error("failed to open {format} document \"{file}\": {message}")]
    #[diagnostic(
        code(ebook::ingest::document_open),
        help(
            "The file could not be opened as {format}. Verify the file is valid \
             and not corrupted or DRM-protected."
        )
    )]
    DocumentOpen {
        format: String,
        file: String,
        message: String,
    },

    #[error("failed to load section \"{href}\": {message}")]
    #[diagnostic(
        code(ebook::ingest::section_load),
        help("The navigation entry points at a section missing from the package.")
    )]
    SectionLoad { href: String, message: String },

    #[error("failed to extract text from page {page}: {message}")]
    #[diagnostic(
        code(ebook::ingest::page_extract),
        help("The page content stream could not be decoded; the page is skipped.")
    )]
    PageExtract { page: u32, message: String },

    #[error("I/O error reading \"{path}\": {source}")]
    #[diagnostic(
        code(ebook::ingest::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// A [`Book`](super::model::Book) that breaks the pagination invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InvalidBook {
    #[error("book has no chapters")]
    #[diagnostic(code(ebook::book::no_chapters))]
    NoChapters,

    #[error("totalPages is {total_pages} but there are {chapters} chapters")]
    #[diagnostic(code(ebook::book::page_count))]
    PageCountMismatch { total_pages: usize, chapters: usize },

    #[error("chapter at index {index} has pageNumber {found} (expected {expected})")]
    #[diagnostic(
        code(ebook::book::page_gap),
        help("Page numbers must run 1..=totalPages with no gaps.")
    )]
    PageGap {
        index: usize,
        found: usize,
        expected: usize,
    },
}
