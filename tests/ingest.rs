//! End-to-end ingestion tests: files on disk through `process_path` and
//! `process_paths` into normalized books.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use ebook_reader::ingest::parser::pdf::{PagedDocument, PdfFile};
use ebook_reader::ingest::{
    BookFormat, IngestConfig, IngestError, SourceFile, process_batch, process_path, process_paths,
};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// A PDF whose pages each show one line of text in Courier.
fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// One XHTML section whose body is a single paragraph.
fn xhtml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body><p>{body}</p></body></html>"#
    )
}

/// An EPUB 2 package under `OEBPS/`. `sections` are `(href, body)` pairs in
/// spine order; `nav` entries are `(label, src)` and produce an NCX when
/// non-empty.
fn epub_package(sections: &[(&str, String)], nav: &[(&str, &str)]) -> Vec<u8> {
    let mut manifest = String::new();
    let mut spine = String::new();
    for (i, (href, _)) in sections.iter().enumerate() {
        manifest.push_str(&format!(
            r#"<item id="s{i}" href="{href}" media-type="application/xhtml+xml"/>"#
        ));
        spine.push_str(&format!(r#"<itemref idref="s{i}"/>"#));
    }

    let toc_attr = if nav.is_empty() {
        ""
    } else {
        manifest.push_str(r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#);
        r#" toc="ncx""#
    };

    let opf = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="id"><metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Test Book</dc:title><dc:creator>Ann Author</dc:creator><dc:identifier id="id">urn:test:1</dc:identifier></metadata><manifest>{manifest}</manifest><spine{toc_attr}>{spine}</spine></package>"#
    );

    let points: String = nav
        .iter()
        .enumerate()
        .map(|(i, (label, src))| {
            format!(
                r#"<navPoint id="n{i}" playOrder="{}"><navLabel><text>{label}</text></navLabel><content src="{src}"/></navPoint>"#,
                i + 1
            )
        })
        .collect();
    let ncx = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1"><navMap>{points}</navMap></ncx>"#
    );

    let container = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container"><rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles></container>"#;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut add = |name: &str, body: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };
    add("mimetype", "application/epub+zip");
    add("META-INF/container.xml", container);
    add("OEBPS/content.opf", opf.as_str());
    if !nav.is_empty() {
        add("OEBPS/toc.ncx", ncx.as_str());
    }
    for (href, body) in sections {
        add(format!("OEBPS/{href}").as_str(), body.as_str());
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn epub_navigation_labels_become_chapters() {
    let sections = [
        ("ch0.xhtml", xhtml("  Alpha text  ")),
        ("ch1.xhtml", xhtml("\n  Beta text\n")),
    ];
    let bytes = epub_package(
        &sections,
        &[("Label 0", "ch0.xhtml#start"), ("Label 1", "ch1.xhtml")],
    );
    let source = SourceFile::new("fallback-name.epub", bytes);

    let report = process_batch([&source], &IngestConfig::default());
    assert!(report.is_clean());
    let book = &report.books[0];
    assert_eq!(book.format, BookFormat::Epub);
    assert_eq!(book.title, "Test Book");
    assert_eq!(book.author, "Ann Author");

    let chapters: Vec<(&str, &str, usize)> = book
        .content
        .iter()
        .map(|c| (c.chapter_title.as_str(), c.content.as_str(), c.page_number))
        .collect();
    assert_eq!(
        chapters,
        vec![("Label 0", "Alpha text", 1), ("Label 1", "Beta text", 2)]
    );
    assert!(book.validate().is_ok());
}

#[test]
fn epub_without_navigation_reads_capped_spine() {
    let long = |i: usize| format!("Section {i} {}", "lorem ipsum ".repeat(12));
    let sections: Vec<(String, String)> = (0..12)
        .map(|i| {
            let body = if i == 3 { "Too short.".to_string() } else { long(i) };
            (format!("part{i}.xhtml"), xhtml(&body))
        })
        .collect();
    let refs: Vec<(&str, String)> = sections
        .iter()
        .map(|(href, body)| (href.as_str(), body.clone()))
        .collect();
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "Spine Only.epub", &epub_package(&refs, &[]));

    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(book.title, "Test Book");
    // Ten spine items are read; the short one is dropped.
    assert_eq!(book.total_pages, 9);
    for (i, chapter) in book.content.iter().enumerate() {
        assert_eq!(chapter.chapter_title, format!("Chapter {}", i + 1));
        assert!(chapter.content.chars().count() > 100);
    }
    let bodies: Vec<&str> = book.content.iter().map(|c| c.content.as_str()).collect();
    assert!(bodies[0].starts_with("Section 0 "));
    assert!(bodies[3].starts_with("Section 4 "));
    assert!(bodies[8].starts_with("Section 9 "));
    assert!(!bodies.iter().any(|b| b.starts_with("Section 10 ")));
}

#[test]
fn text_file_is_paginated_by_paragraph_budget() {
    let dir = tempfile::TempDir::new().unwrap();
    let paragraph = "a".repeat(1500);
    let text = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");
    let path = write(dir.path(), "Three Parts.txt", text.as_bytes());

    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(book.format, BookFormat::Txt);
    assert_eq!(book.title, "Three Parts");
    assert_eq!(book.author, "Unknown Author");
    assert_eq!(book.total_pages, 3);
    for (i, chapter) in book.content.iter().enumerate() {
        assert_eq!(chapter.page_number, i + 1);
        assert_eq!(chapter.chapter_title, format!("Chapter {}", i + 1));
        assert_eq!(chapter.content, paragraph);
    }
    assert!(book.validate().is_ok());
}

#[test]
fn empty_text_file_gets_placeholder() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "blank.txt", b"  \n\n  ");

    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(book.total_pages, 1);
    assert_eq!(book.content[0].chapter_title, "Content");
    assert_eq!(book.content[0].content, "Empty file.");
    assert_eq!(book.file_size, "0.0 MB");
}

#[test]
fn converted_books_always_satisfy_pagination_invariants() {
    let inputs: Vec<SourceFile> = vec![
        SourceFile::new("a.txt", b"".to_vec()),
        SourceFile::new("b.txt", "para\n\n".repeat(2000).into_bytes()),
        SourceFile::new("c.pdf", b"%PDF-1.4 truncated".to_vec()),
    ];
    let report = process_batch(&inputs, &IngestConfig::default());
    assert!(report.is_clean());
    for book in &report.books {
        assert!(book.total_pages >= 1);
        assert_eq!(book.total_pages, book.content.len());
        assert!(book.validate().is_ok(), "{}", book.title);
    }
}

#[test]
fn unsupported_and_unopenable_files_fail() {
    let dir = tempfile::TempDir::new().unwrap();
    let mobi = write(dir.path(), "old.mobi", b"binary");
    let epub = write(dir.path(), "broken.epub", b"not a zip archive");

    let err = process_path(&mobi, &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { ref extension } if extension == "mobi"));

    let err = process_path(&epub, &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, IngestError::DocumentOpen { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = process_path(&dir.path().join("nope.txt"), &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[test]
fn batch_keeps_input_order_and_reports_failures() {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = vec![
        write(dir.path(), "first.txt", b"one"),
        write(dir.path(), "second.doc", b"two"),
        write(dir.path(), "third.pdf", b"garbage"),
        write(dir.path(), "fourth.txt", b"four"),
    ];

    let report = process_paths(&paths, &IngestConfig::default());
    let titles: Vec<&str> = report.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "third", "fourth"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "second.doc");

    let pdf = &report.books[1];
    assert_eq!(pdf.format, BookFormat::Pdf);
    assert_eq!(pdf.content[0].chapter_title, "Error");
    assert!(pdf.content[0].content.starts_with("Failed to process PDF: "));
}

#[test]
fn pdf_pages_become_chapters() {
    let dir = tempfile::TempDir::new().unwrap();
    let long = "The quick brown fox jumps over the lazy dog near the riverbank.";
    let bytes = pdf_with_pages(&["Too short.", long]);
    let path = write(dir.path(), "Fox Story.pdf", &bytes);

    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(book.format, BookFormat::Pdf);
    assert_eq!(book.title, "Fox Story");
    assert_eq!(book.total_pages, 1);
    assert_eq!(book.content[0].chapter_title, "Page 2");
    assert_eq!(book.content[0].page_number, 1);
    assert!(book.content[0].content.contains("quick brown fox"));
}

#[test]
fn pdf_page_numbers_outside_document_are_extract_errors() {
    let source = SourceFile::new("two.pdf", pdf_with_pages(&["first", "second"]));
    let pdf = PdfFile::open(&source).unwrap();
    assert_eq!(pdf.page_count(), 2);
    assert!(pdf.page_text_items(1).is_ok());

    for page in [0, 3] {
        let err = pdf.page_text_items(page).unwrap_err();
        assert!(
            matches!(err, IngestError::PageExtract { page: p, .. } if p == page),
            "page {page}: {err}"
        );
    }
}

#[test]
fn byte_order_mark_is_stripped_from_text_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "bom.txt", b"\xef\xbb\xbfHello, reader.\n\nMore.");
    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert!(book.content[0].content.starts_with("Hello"));

    let path = write(dir.path(), "only-bom.txt", b"\xef\xbb\xbf");
    let book = process_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(book.total_pages, 1);
    assert_eq!(book.content[0].content, "Empty file.");
}

#[test]
fn pdf_page_limit_is_configurable() {
    let long = "Every page of this document carries a full sentence of text.";
    let bytes = pdf_with_pages(&[long; 6]);
    let source = SourceFile::new("pages.pdf", bytes);
    let config = IngestConfig {
        pdf_page_limit: 4,
        ..Default::default()
    };

    let report = process_batch([&source], &config);
    let book = &report.books[0];
    assert_eq!(book.total_pages, 4);
    assert_eq!(book.content[3].chapter_title, "Page 4");
}
