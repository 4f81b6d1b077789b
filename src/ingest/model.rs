//! Core data types for ingested books.
//!
//! A [`Book`] is the normalized, paginated result of converting one uploaded
//! file. Its chapters are ordered, numbered from 1 without gaps, and never
//! empty. Field names serialize in camelCase so the persisted library keeps
//! the reader's JSON shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::error::InvalidBook;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Epub,
    Pdf,
    Txt,
}

impl BookFormat {
    /// The file extension (and diagnostic name) for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }

    /// Match an already lower-cased extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "epub" => Some(Self::Epub),
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of a book in the library.
    BookId
);
uuid_id!(
    /// Unique identifier of a chapter.
    ChapterId
);
uuid_id!(
    /// Unique identifier of a bookmark.
    BookmarkId
);

/// One page-aligned unit of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub chapter_title: String,
    /// Plain text, trimmed.
    pub content: String,
    /// 1-based position in [`Book::content`].
    pub page_number: usize,
}

/// A saved reading position inside a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub book_id: BookId,
    pub page_number: usize,
    /// Character offset within the page.
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date_created: DateTime<Utc>,
}

/// One ingested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub content: Vec<Chapter>,
    /// Always equal to `content.len()`.
    pub total_pages: usize,
    /// Page the reader last opened; 0 until the book is first read.
    pub last_read_position: usize,
    pub bookmarks: Vec<Bookmark>,
    pub date_added: DateTime<Utc>,
    /// Human-readable size, e.g. `"2.0 MB"`.
    pub file_size: String,
    pub format: BookFormat,
}

impl Book {
    /// Chapter shown on a 1-based page.
    pub fn chapter(&self, page: usize) -> Option<&Chapter> {
        page.checked_sub(1).and_then(|i| self.content.get(i))
    }

    /// `(page_number, chapter_title)` pairs in reading order.
    pub fn table_of_contents(&self) -> Vec<(usize, &str)> {
        self.content
            .iter()
            .map(|c| (c.page_number, c.chapter_title.as_str()))
            .collect()
    }

    /// Reading progress through the book for a given page, 0–100.
    pub fn progress_percent(&self, page: usize) -> u8 {
        if self.total_pages == 0 {
            return 0;
        }
        let page = page.min(self.total_pages);
        ((page * 100) / self.total_pages) as u8
    }

    /// Check the pagination invariants.
    ///
    /// Books produced by the converters satisfy these by construction; this
    /// guards books loaded from storage.
    pub fn validate(&self) -> Result<(), InvalidBook> {
        if self.content.is_empty() {
            return Err(InvalidBook::NoChapters);
        }
        if self.total_pages != self.content.len() {
            return Err(InvalidBook::PageCountMismatch {
                total_pages: self.total_pages,
                chapters: self.content.len(),
            });
        }
        for (i, chapter) in self.content.iter().enumerate() {
            if chapter.page_number != i + 1 {
                return Err(InvalidBook::PageGap {
                    index: i,
                    found: chapter.page_number,
                    expected: i + 1,
                });
            }
        }
        Ok(())
    }
}
