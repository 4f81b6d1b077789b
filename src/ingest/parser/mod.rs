//! Converter trait and format detection.
//!
//! Each supported format (EPUB, PDF, plain text) implements `BookConverter`.
//! The `converter_for()` factory returns the correct converter for a format.

pub mod epub;
pub mod pdf;
pub mod text;

use crate::ingest::IngestConfig;
use crate::ingest::error::IngestResult;
use crate::ingest::model::{Book, BookFormat};
use crate::ingest::source::SourceFile;

/// Trait for format-specific converters.
pub trait BookConverter {
    /// Convert an uploaded file into a normalized book.
    ///
    /// Implementations degrade to a placeholder chapter rather than fail when
    /// nothing readable is found.
    fn convert(&self, source: &SourceFile, config: &IngestConfig) -> IngestResult<Book>;

    /// The format this converter handles.
    fn format(&self) -> BookFormat;
}

/// Get the converter for a book format.
pub fn converter_for(format: BookFormat) -> Box<dyn BookConverter> {
    match format {
        BookFormat::Epub => Box::new(epub::EpubConverter),
        BookFormat::Pdf => Box::new(pdf::PdfConverter),
        BookFormat::Txt => Box::new(text::TextConverter),
    }
}

/// The lower-cased suffix after the final `.` of a file name.
///
/// Returns `None` when the name has no dot at all; `"book."` yields `Some("")`.
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// Detect the book format from a file name.
pub fn detect_format(name: &str) -> Option<BookFormat> {
    file_extension(name).and_then(|ext| BookFormat::from_extension(&ext))
}
