//! EPUB converter using the `epub` crate.
//!
//! Navigation (TOC) entries become chapters. When the package declares no
//! navigation, the first spine items with substantial text are used instead.
//! Section XHTML is reduced to plain text with `scraper` (see
//! [`markup`](crate::ingest::markup)).
//!
//! The package is reached through the [`EpubPackage`] trait so the chapter
//! logic does not depend on how the archive is read.

use std::io::Cursor;

use epub::doc::EpubDoc;
use tracing::{debug, info, warn};

use crate::ingest::IngestConfig;
use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::markup;
use crate::ingest::model::{Book, BookFormat};
use crate::ingest::normalize::BookBuilder;
use crate::ingest::parser::BookConverter;
use crate::ingest::source::SourceFile;

/// Body of the placeholder chapter when nothing readable was found.
pub const NO_READABLE_CONTENT: &str = "Unable to extract readable content from this EPUB file.";

/// A top-level navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Package path of the section, fragment stripped.
    pub href: String,
    pub label: Option<String>,
}

/// An item in the linear reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    pub href: String,
}

/// Read access to an opened EPUB package.
pub trait EpubPackage {
    fn title(&self) -> Option<String>;

    fn creator(&self) -> Option<String>;

    /// Top-level navigation entries in document order.
    fn toc(&self) -> Vec<NavEntry>;

    /// Spine items in reading order.
    fn spine(&mut self) -> Vec<SpineEntry>;

    /// Raw XHTML of the section at `href`.
    fn load_section(&mut self, href: &str) -> IngestResult<String>;
}

/// EPUB converter. Propagates only a failure to open the package.
pub struct EpubConverter;

impl BookConverter for EpubConverter {
    fn format(&self) -> BookFormat {
        BookFormat::Epub
    }

    fn convert(&self, source: &SourceFile, config: &IngestConfig) -> IngestResult<Book> {
        let mut package = EpubArchive::open(source)?;
        Ok(convert_package(&mut package, source, config))
    }
}

/// Build a book from an opened package.
pub fn convert_package<P: EpubPackage>(
    package: &mut P,
    source: &SourceFile,
    config: &IngestConfig,
) -> Book {
    let mut builder = BookBuilder::new(source, BookFormat::Epub)
        .title(package.title())
        .author(package.creator());

    for entry in package.toc() {
        let text = match package.load_section(&entry.href) {
            Ok(xhtml) => markup::section_text(&xhtml),
            Err(e) => {
                warn!(href = %entry.href, "Error loading section: {e}");
                continue;
            }
        };

        let title = entry
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("Chapter {}", builder.next_page()));
        debug!(page = builder.next_page(), %title, "Parsed section");
        builder.push_chapter(title, text);
    }

    if builder.chapter_count() == 0 {
        debug!("No navigation chapters, falling back to spine order");
        let spine = package.spine();
        for item in spine.into_iter().take(config.epub_spine_limit) {
            let text = match package.load_section(&item.href) {
                Ok(xhtml) => markup::section_text(&xhtml),
                Err(e) => {
                    warn!(href = %item.href, "Error loading spine item: {e}");
                    continue;
                }
            };

            let text = text.trim();
            if text.chars().count() > config.epub_min_spine_chars {
                let title = format!("Chapter {}", builder.next_page());
                builder.push_chapter(title, text);
            }
        }
    }

    let book = builder.build(NO_READABLE_CONTENT);
    info!(
        file = source.name(),
        title = %book.title,
        pages = book.total_pages,
        "Converted EPUB"
    );
    book
}

/// [`EpubPackage`] backed by the `epub` crate over the uploaded bytes.
pub struct EpubArchive {
    doc: EpubDoc<Cursor<Vec<u8>>>,
}

impl EpubArchive {
    pub fn open(source: &SourceFile) -> IngestResult<Self> {
        let cursor = Cursor::new(source.bytes().to_vec());
        let doc = EpubDoc::from_reader(cursor).map_err(|e| IngestError::DocumentOpen {
            format: BookFormat::Epub.to_string(),
            file: source.name().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { doc })
    }
}

impl EpubPackage for EpubArchive {
    fn title(&self) -> Option<String> {
        self.doc.mdata("title").map(|m| m.value.clone())
    }

    fn creator(&self) -> Option<String> {
        self.doc.mdata("creator").map(|m| m.value.clone())
    }

    fn toc(&self) -> Vec<NavEntry> {
        self.doc
            .toc
            .iter()
            .map(|nav| NavEntry {
                href: strip_fragment(&nav.content.to_string_lossy()).to_string(),
                label: Some(nav.label.clone()),
            })
            .collect()
    }

    fn spine(&mut self) -> Vec<SpineEntry> {
        let mut entries = Vec::new();
        for idx in 0..self.doc.get_num_chapters() {
            self.doc.set_current_chapter(idx);
            if let Some(path) = self.doc.get_current_path() {
                entries.push(SpineEntry {
                    href: path.to_string_lossy().into_owned(),
                });
            }
        }
        entries
    }

    fn load_section(&mut self, href: &str) -> IngestResult<String> {
        self.doc
            .get_resource_str_by_path(href)
            .ok_or_else(|| IngestError::SectionLoad {
                href: href.to_string(),
                message: "resource not found in package".into(),
            })
    }
}

/// Drop a `#fragment` from a package path.
fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(path, _)| path)
}
