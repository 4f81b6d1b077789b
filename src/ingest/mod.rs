//! File ingestion pipeline.
//!
//! Orchestrates: extension sniffing → format converter → normalized
//! [`Book`]. EPUB, PDF, and TXT are supported. Converters extract plain text
//! and segment it naively into pages; no layout, images, or styling.
//!
//! Batches are processed strictly one file at a time, in input order, and a
//! failing file never stops the rest.

pub mod error;
pub mod markup;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod source;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use error::{IngestError, IngestResult, InvalidBook};
pub use model::{Book, BookFormat, BookId, Bookmark, BookmarkId, Chapter, ChapterId};
pub use source::SourceFile;

/// Limits and thresholds applied by the converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Only the first N physical PDF pages are read.
    pub pdf_page_limit: u32,
    /// PDF pages need strictly more than this many characters to be kept.
    pub pdf_min_page_chars: usize,
    /// Spine items considered when an EPUB has no navigation.
    pub epub_spine_limit: usize,
    /// Spine items need strictly more than this many characters to be kept.
    pub epub_min_spine_chars: usize,
    /// Character budget of a plain-text chapter.
    pub txt_chapter_chars: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            pdf_page_limit: 20,
            pdf_min_page_chars: 50,
            epub_spine_limit: 10,
            epub_min_spine_chars: 100,
            txt_chapter_chars: 2000,
        }
    }
}

/// A file that could not be turned into a book.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: IngestError,
}

/// Outcome of a batch: books in input order, plus per-file failures.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub books: Vec<Book>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Convert one uploaded file into a book.
///
/// Fails with [`IngestError::UnsupportedFormat`] for anything but `epub`,
/// `pdf`, or `txt`, and with [`IngestError::DocumentOpen`] when an EPUB
/// package cannot be opened. Every other problem degrades into a valid book.
pub fn process_file(source: &SourceFile, config: &IngestConfig) -> IngestResult<Book> {
    let extension = source.extension().unwrap_or_default();
    let format = BookFormat::from_extension(&extension)
        .ok_or(IngestError::UnsupportedFormat { extension })?;

    let converter = parser::converter_for(format);
    let book = converter.convert(source, config)?;
    info!(
        file = source.name(),
        format = %format,
        id = %book.id,
        pages = book.total_pages,
        size = %book.file_size,
        "Ingested book"
    );
    Ok(book)
}

/// Read a file from disk and convert it.
pub fn process_path(path: &Path, config: &IngestConfig) -> IngestResult<Book> {
    let source = SourceFile::read(path)?;
    process_file(&source, config)
}

/// Convert files one after another, collecting failures instead of stopping.
pub fn process_batch<'a, I>(files: I, config: &IngestConfig) -> BatchReport
where
    I: IntoIterator<Item = &'a SourceFile>,
{
    let mut report = BatchReport::default();
    for file in files {
        record(&mut report, file.name(), process_file(file, config));
    }
    report
}

/// Read and convert paths one after another, collecting failures.
pub fn process_paths<P: AsRef<Path>>(paths: &[P], config: &IngestConfig) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        record(&mut report, &name, process_path(path, config));
    }
    report
}

fn record(report: &mut BatchReport, file_name: &str, result: IngestResult<Book>) {
    match result {
        Ok(book) => report.books.push(book),
        Err(error) => {
            warn!(file = file_name, "Error processing file: {error}");
            report.failures.push(FileFailure {
                file_name: file_name.to_string(),
                error,
            });
        }
    }
}
