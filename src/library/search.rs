//! Full-text search inside one book.

use crate::ingest::model::Book;

/// Characters of context kept on each side of a match.
pub const SNIPPET_CONTEXT: usize = 50;

/// A page that matched a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub page_number: usize,
    pub chapter_title: String,
    /// Text around the first match in the page, empty when only the title matched.
    pub snippet: String,
}

/// Pages whose text or title contains `term`, ignoring case, in page order.
pub fn search_book(book: &Book, term: &str) -> Vec<SearchHit> {
    let needle: Vec<char> = term.trim().chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    book.content
        .iter()
        .filter_map(|chapter| {
            let text: Vec<char> = chapter.content.chars().collect();
            let snippet = match find_ignore_case(&text, &needle) {
                Some(at) => {
                    let start = at.saturating_sub(SNIPPET_CONTEXT);
                    let end = (at + needle.len() + SNIPPET_CONTEXT).min(text.len());
                    text[start..end].iter().collect()
                }
                None => {
                    let title: Vec<char> = chapter.chapter_title.chars().collect();
                    find_ignore_case(&title, &needle)?;
                    String::new()
                }
            };
            Some(SearchHit {
                page_number: chapter.page_number,
                chapter_title: chapter.chapter_title.clone(),
                snippet,
            })
        })
        .collect()
}

/// Char index of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    })
}
