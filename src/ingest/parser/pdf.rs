//! PDF converter using the `lopdf` crate.
//!
//! Each physical page becomes a chapter titled `"Page N"`, for the first
//! `IngestConfig::pdf_page_limit` pages. Pages with too little text are
//! skipped, so titles keep the physical page number while `page_number`
//! follows the position in the book.
//!
//! This converter never fails: an unreadable document turns into a
//! single-chapter book explaining the error.

use lopdf::Document;
use tracing::{debug, error, info, warn};

use crate::ingest::IngestConfig;
use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::model::{Book, BookFormat};
use crate::ingest::normalize::BookBuilder;
use crate::ingest::parser::BookConverter;
use crate::ingest::source::SourceFile;

/// Body of the placeholder chapter when no page had enough text.
pub const NO_READABLE_CONTENT: &str = "Unable to extract readable content from this PDF file.";

/// Title of the chapter reporting a document that could not be opened.
pub const ERROR_TITLE: &str = "Error";

/// One positioned run of text on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
}

/// Read access to an opened, paged document.
pub trait PagedDocument {
    /// Number of physical pages.
    fn page_count(&self) -> u32;

    /// Text items of a 1-based page, in content-stream order.
    fn page_text_items(&self, page: u32) -> IngestResult<Vec<TextItem>>;
}

/// PDF converter.
pub struct PdfConverter;

impl BookConverter for PdfConverter {
    fn format(&self) -> BookFormat {
        BookFormat::Pdf
    }

    fn convert(&self, source: &SourceFile, config: &IngestConfig) -> IngestResult<Book> {
        match PdfFile::open(source) {
            Ok(document) => Ok(convert_document(&document, source, config)),
            Err(e) => {
                error!(file = source.name(), "PDF processing error: {e}");
                Ok(error_book(source, &e))
            }
        }
    }
}

/// Build a book from an opened document.
pub fn convert_document<D: PagedDocument>(
    document: &D,
    source: &SourceFile,
    config: &IngestConfig,
) -> Book {
    let mut builder = BookBuilder::new(source, BookFormat::Pdf);
    let last_page = document.page_count().min(config.pdf_page_limit);

    for page in 1..=last_page {
        let items = match document.page_text_items(page) {
            Ok(items) => items,
            Err(e) => {
                warn!(page, "Error processing PDF page: {e}");
                continue;
            }
        };

        let text = join_items(&items);
        if text.chars().count() > config.pdf_min_page_chars {
            debug!(page, chars = text.len(), "Parsed page");
            builder.push_chapter(format!("Page {page}"), text);
        }
    }

    let book = builder.build(NO_READABLE_CONTENT);
    info!(
        file = source.name(),
        pages = book.total_pages,
        scanned = last_page,
        "Converted PDF"
    );
    book
}

/// A book whose only chapter reports why the document could not be read.
fn error_book(source: &SourceFile, err: &IngestError) -> Book {
    let description = match err {
        IngestError::DocumentOpen { message, .. } => message.clone(),
        other => other.to_string(),
    };
    let mut builder = BookBuilder::new(source, BookFormat::Pdf);
    builder.push_chapter(ERROR_TITLE, format!("Failed to process PDF: {description}"));
    builder.build(NO_READABLE_CONTENT)
}

/// Items joined by single spaces, trimmed.
fn join_items(items: &[TextItem]) -> String {
    items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// [`PagedDocument`] backed by `lopdf` over the uploaded bytes.
pub struct PdfFile {
    document: Document,
    pages: Vec<u32>,
}

impl PdfFile {
    pub fn open(source: &SourceFile) -> IngestResult<Self> {
        let document =
            Document::load_mem(source.bytes()).map_err(|e| IngestError::DocumentOpen {
                format: BookFormat::Pdf.to_string(),
                file: source.name().to_string(),
                message: e.to_string(),
            })?;
        let pages = document.get_pages().keys().copied().collect();
        Ok(Self { document, pages })
    }
}

impl PagedDocument for PdfFile {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text_items(&self, page: u32) -> IngestResult<Vec<TextItem>> {
        let page_number = (page as usize)
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .copied()
            .ok_or_else(|| IngestError::PageExtract {
                page,
                message: "page out of range".into(),
            })?;

        let text = self
            .document
            .extract_text(&[page_number])
            .map_err(|e| IngestError::PageExtract {
                page,
                message: e.to_string(),
            })?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| TextItem {
                text: line.to_string(),
            })
            .collect())
    }
}
