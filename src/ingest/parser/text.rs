//! Plain-text converter: paragraphs regrouped into fixed-budget chapters.
//!
//! Paragraphs are separated by blank lines. They are accumulated greedily
//! into a chapter until the next one would push it past
//! `IngestConfig::txt_chapter_chars`; a single oversized paragraph is never
//! split.

use tracing::{debug, info};

use crate::ingest::IngestConfig;
use crate::ingest::error::IngestResult;
use crate::ingest::model::{Book, BookFormat};
use crate::ingest::normalize::BookBuilder;
use crate::ingest::parser::BookConverter;
use crate::ingest::source::SourceFile;

/// Body of the placeholder chapter for an empty file.
pub const EMPTY_FILE: &str = "Empty file.";

const PARAGRAPH_BREAK: &str = "\n\n";

/// Plain-text converter. Never fails.
pub struct TextConverter;

impl BookConverter for TextConverter {
    fn format(&self) -> BookFormat {
        BookFormat::Txt
    }

    fn convert(&self, source: &SourceFile, config: &IngestConfig) -> IngestResult<Book> {
        let text = source.text();
        let mut builder = BookBuilder::new(source, BookFormat::Txt);

        for chapter in split_chapters(&text, config.txt_chapter_chars) {
            let title = format!("Chapter {}", builder.next_page());
            builder.push_chapter(title, chapter);
        }
        debug!(chapters = builder.chapter_count(), "Segmented text");

        let trimmed = text.trim();
        let placeholder = if trimmed.is_empty() { EMPTY_FILE } else { trimmed };
        let book = builder.build(placeholder);

        info!(
            file = source.name(),
            pages = book.total_pages,
            "Converted text file"
        );
        Ok(book)
    }
}

/// Split `text` into chapter bodies of roughly `budget` characters.
///
/// Lengths are counted in characters. A paragraph starts a new chapter only
/// when appending it would exceed the budget *and* the current chapter
/// already holds something.
pub fn split_chapters(text: &str, budget: usize) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");

    let mut chapters = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for paragraph in normalized
        .split(PARAGRAPH_BREAK)
        .filter(|p| !p.trim().is_empty())
    {
        let paragraph_len = paragraph.chars().count();

        if current_len + paragraph_len > budget && current_len > 0 {
            chapters.push(current.trim().to_string());
            current = paragraph.to_string();
            current_len = paragraph_len;
        } else {
            if current_len > 0 {
                current.push_str(PARAGRAPH_BREAK);
                current_len += PARAGRAPH_BREAK.len();
            }
            current.push_str(paragraph);
            current_len += paragraph_len;
        }
    }

    if !current.trim().is_empty() {
        chapters.push(current.trim().to_string());
    }

    chapters
}
