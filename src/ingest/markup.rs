//! XHTML section text extraction using the `scraper` crate.
//!
//! Produces the concatenated text nodes of a section, the way a DOM's
//! `textContent` reads, without the markup. Script and style bodies are
//! dropped.

use scraper::{ElementRef, Html, Selector};

/// Plain text of an XHTML/HTML section.
///
/// Text is taken from `<body>` when present, otherwise from the whole
/// document. The result is not trimmed.
pub fn section_text(markup: &str) -> String {
    let document = Html::parse_document(markup);

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next());

    let mut out = String::new();
    match body {
        Some(body) => collect_text(body, &mut out),
        None => collect_text(document.root_element(), &mut out),
    }
    out
}

fn collect_text(root: ElementRef<'_>, out: &mut String) {
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| matches!(name, "script" | "style"));
        if !hidden {
            out.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Loomings</title><style>p { color: red; }</style></head>
<body>
  <h1>Chapter 1. Loomings</h1>
  <p>Call me <em>Ishmael</em>.</p>
  <script>var x = 1;</script>
</body>
</html>"#;

    #[test]
    fn extracts_body_text() {
        let text = section_text(SECTION);
        assert!(text.contains("Chapter 1. Loomings"));
        assert!(text.contains("Call me Ishmael."));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("var x"));
        // <head><title> belongs to the head, not the body.
        assert_eq!(text.matches("Loomings").count(), 1);
    }

    #[test]
    fn fragment_without_body_still_has_text() {
        let text = section_text("<p>just a fragment</p>");
        assert_eq!(text.trim(), "just a fragment");
    }
}
