//! Book normalization shared by every converter.
//!
//! Converters push chapters in reading order; the builder assigns page
//! numbers, fills in title/author fallbacks, formats the file size, and
//! substitutes a placeholder chapter when nothing was extracted.

use chrono::Utc;

use crate::ingest::model::{Book, BookFormat, BookId, Chapter, ChapterId};
use crate::ingest::source::SourceFile;

/// Title of the chapter substituted when extraction yields nothing.
pub const PLACEHOLDER_TITLE: &str = "Content";

/// Author used when the document declares none.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

const BYTES_PER_MB: u128 = 1024 * 1024;

/// Format a byte count as megabytes with one decimal place, e.g. `"2.0 MB"`.
///
/// Ties round away from zero (`262_144` bytes is `"0.3 MB"`).
pub fn format_file_size(bytes: u64) -> String {
    let scaled = u128::from(bytes) * 10;
    let tenths = (scaled * 2 + BYTES_PER_MB) / (2 * BYTES_PER_MB);
    format!("{}.{} MB", tenths / 10, tenths % 10)
}

/// Strip a trailing `.{extension}` (case-insensitive) from a file name.
///
/// Only the given extension is removed; other suffixes are left alone.
pub fn title_from_filename(name: &str, extension: &str) -> String {
    let suffix_len = extension.len() + 1;
    if name.len() >= suffix_len {
        let split = name.len() - suffix_len;
        if let (Some(stem), Some(suffix)) = (name.get(..split), name.get(split..)) {
            if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension) {
                return stem.to_string();
            }
        }
    }
    name.to_string()
}

/// Accumulates chapters and produces a [`Book`] that satisfies the
/// pagination invariants.
#[derive(Debug)]
pub struct BookBuilder {
    title: String,
    author: String,
    file_size: String,
    format: BookFormat,
    chapters: Vec<Chapter>,
}

impl BookBuilder {
    /// Start a book for `source` with filename-derived defaults.
    pub fn new(source: &SourceFile, format: BookFormat) -> Self {
        Self {
            title: title_from_filename(source.name(), format.as_str()),
            author: UNKNOWN_AUTHOR.to_string(),
            file_size: format_file_size(source.size()),
            format,
            chapters: Vec::new(),
        }
    }

    /// Use an in-document title, if present and not blank.
    pub fn title(mut self, title: Option<String>) -> Self {
        if let Some(title) = non_blank(title) {
            self.title = title;
        }
        self
    }

    /// Use an in-document author, if present and not blank.
    pub fn author(mut self, author: Option<String>) -> Self {
        if let Some(author) = non_blank(author) {
            self.author = author;
        }
        self
    }

    /// Append a chapter; its page number is its position in the book.
    pub fn push_chapter(&mut self, title: impl Into<String>, content: impl AsRef<str>) {
        let page_number = self.chapters.len() + 1;
        self.chapters.push(Chapter {
            id: ChapterId::new(),
            chapter_title: title.into(),
            content: content.as_ref().trim().to_string(),
            page_number,
        });
    }

    /// The page number the next pushed chapter will receive.
    pub fn next_page(&self) -> usize {
        self.chapters.len() + 1
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Finish the book. With no chapters, a single placeholder chapter
    /// carrying `placeholder` is substituted.
    pub fn build(mut self, placeholder: impl AsRef<str>) -> Book {
        if self.chapters.is_empty() {
            self.push_chapter(PLACEHOLDER_TITLE, placeholder);
        }
        Book {
            id: BookId::new(),
            title: self.title,
            author: self.author,
            total_pages: self.chapters.len(),
            content: self.chapters,
            last_read_position: 0,
            bookmarks: Vec::new(),
            date_added: Utc::now(),
            file_size: self.file_size,
            format: self.format,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
