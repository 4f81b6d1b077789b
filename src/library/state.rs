//! The book library: ingested books, reading progress, and bookmarks.
//!
//! Every mutation is persisted through the injected repository before it
//! becomes visible. If saving fails the in-memory state is rolled back, so
//! callers never observe a half-applied change.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::ingest::model::{Book, BookId, Bookmark, BookmarkId};
use crate::ingest::{BatchReport, IngestConfig, process_paths};
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::repository::{LibraryRepository, LibraryState};

/// Books owned by the reader, persisted through `R`.
pub struct Library<R: LibraryRepository> {
    repo: R,
    state: LibraryState,
}

impl<R: LibraryRepository> Library<R> {
    /// Load the library from its repository.
    ///
    /// Stored books that break the pagination invariants are dropped with a
    /// warning instead of failing the whole library.
    pub fn open(repo: R) -> LibraryResult<Self> {
        let mut state = repo.load()?;
        state.books.retain(|book| match book.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!(id = %book.id, title = %book.title, "Dropping invalid stored book: {reason}");
                false
            }
        });
        info!(books = state.books.len(), "Opened library");
        Ok(Self { repo, state })
    }

    /// Apply `change` and persist; restore the previous state if either fails.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut LibraryState) -> LibraryResult<T>,
    ) -> LibraryResult<T> {
        let previous = self.state.clone();
        let result = change(&mut self.state).and_then(|value| {
            self.repo.save(&self.state)?;
            Ok(value)
        });
        if result.is_err() {
            self.state = previous;
        }
        result
    }

    /// Append a book. Its ID must not already be present.
    pub fn add_book(&mut self, book: Book) -> LibraryResult<BookId> {
        let id = book.id;
        self.commit(|state| {
            if state.books.iter().any(|b| b.id == id) {
                return Err(LibraryError::Duplicate { id: id.to_string() });
            }
            state.books.push(book);
            Ok(id)
        })
    }

    /// Ingest files from disk and add every book that converted.
    ///
    /// Conversion failures are reported, not raised. A store failure stops
    /// the import; books already added stay.
    pub fn import<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        config: &IngestConfig,
    ) -> LibraryResult<BatchReport> {
        let report = process_paths(paths, config);
        for book in &report.books {
            self.add_book(book.clone())?;
        }
        info!(
            added = report.books.len(),
            failed = report.failures.len(),
            "Import finished"
        );
        Ok(report)
    }

    /// All books in the order they were added.
    pub fn books(&self) -> &[Book] {
        &self.state.books
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.state.books.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.state.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.books.is_empty()
    }

    /// Find a book by full ID, unique ID prefix, or exact title (case-insensitive).
    pub fn resolve(&self, query: &str) -> LibraryResult<&Book> {
        let query = query.trim();
        if let Ok(id) = query.parse::<BookId>() {
            return self.get(id).ok_or_else(|| LibraryError::BookNotFound {
                id: query.to_string(),
            });
        }

        let lowered = query.to_lowercase();
        let mut matches: Vec<&Book> = self
            .state
            .books
            .iter()
            .filter(|b| !query.is_empty() && b.id.to_string().starts_with(&lowered))
            .collect();
        if matches.is_empty() {
            matches = self
                .state
                .books
                .iter()
                .filter(|b| b.title.to_lowercase() == lowered)
                .collect();
        }

        match matches.as_slice() {
            [book] => Ok(book),
            [] => Err(LibraryError::BookNotFound {
                id: query.to_string(),
            }),
            many => Err(LibraryError::AmbiguousBook {
                query: query.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Books whose title or author contains `term`, ignoring case.
    /// A blank term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&Book> {
        let term = term.trim().to_lowercase();
        self.state
            .books
            .iter()
            .filter(|b| {
                term.is_empty()
                    || b.title.to_lowercase().contains(&term)
                    || b.author.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Remove a book and its bookmarks.
    pub fn remove(&mut self, id: BookId) -> LibraryResult<Book> {
        self.commit(|state| {
            let pos = state
                .books
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| LibraryError::BookNotFound { id: id.to_string() })?;
            Ok(state.books.remove(pos))
        })
    }

    /// Record the page the reader is on.
    pub fn set_progress(&mut self, id: BookId, page: usize) -> LibraryResult<()> {
        self.commit(|state| {
            let book = find_mut(state, id)?;
            check_page(book, page)?;
            book.last_read_position = page;
            Ok(())
        })
    }

    /// Save a position on a page, optionally with a note.
    pub fn add_bookmark(
        &mut self,
        id: BookId,
        page: usize,
        position: usize,
        note: Option<String>,
    ) -> LibraryResult<BookmarkId> {
        self.commit(|state| {
            let book = find_mut(state, id)?;
            check_page(book, page)?;
            let bookmark = Bookmark {
                id: BookmarkId::new(),
                book_id: id,
                page_number: page,
                position,
                note: note
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                date_created: Utc::now(),
            };
            let bookmark_id = bookmark.id;
            book.bookmarks.push(bookmark);
            Ok(bookmark_id)
        })
    }

    /// Delete a bookmark from whichever book holds it.
    pub fn remove_bookmark(&mut self, bookmark_id: BookmarkId) -> LibraryResult<Bookmark> {
        self.commit(|state| {
            for book in &mut state.books {
                if let Some(pos) = book.bookmarks.iter().position(|m| m.id == bookmark_id) {
                    return Ok(book.bookmarks.remove(pos));
                }
            }
            Err(LibraryError::BookmarkNotFound {
                id: bookmark_id.to_string(),
            })
        })
    }

    /// Bookmarks of a book, ordered by page then creation time.
    pub fn bookmarks(&self, id: BookId) -> LibraryResult<Vec<&Bookmark>> {
        let book = self
            .get(id)
            .ok_or_else(|| LibraryError::BookNotFound { id: id.to_string() })?;
        let mut marks: Vec<&Bookmark> = book.bookmarks.iter().collect();
        marks.sort_by_key(|m| (m.page_number, m.date_created));
        Ok(marks)
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

fn find_mut(state: &mut LibraryState, id: BookId) -> LibraryResult<&mut Book> {
    state
        .books
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| LibraryError::BookNotFound { id: id.to_string() })
}

fn check_page(book: &Book, page: usize) -> LibraryResult<()> {
    if page == 0 || page > book.total_pages {
        return Err(LibraryError::PageOutOfRange {
            title: book.title.clone(),
            page,
            total: book.total_pages,
        });
    }
    Ok(())
}
