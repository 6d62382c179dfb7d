//! These tests need the PDFium shared library (see `DOCMARK_PDFIUM_DIR`).
//! Run with: cargo test -p docmark-pdf -- --ignored

use docmark_pdf::PdfEngine;
use docmark_types::{PageSurface, PaginatedDocument, Rect, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

fn show(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn helvetica() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    }
}

/// One page per operation list, all sharing font `F1`, on A4 paper.
fn build_pdf(font: Dictionary, pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(font);
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn path_objects(pdf: &[u8], page: u32) -> usize {
    let doc = Document::load_mem(pdf).unwrap();
    let id = doc.get_pages()[&page];
    let content = doc.get_page_content(id).unwrap();
    Content::decode(&content)
        .unwrap()
        .operations
        .iter()
        .filter(|op| op.operator == "re" || op.operator == "f")
        .count()
}

#[test]
#[ignore]
fn finds_substrings_in_page_space() {
    let bytes = build_pdf(
        helvetica(),
        vec![
            show("F1", 12, 72, 700, "Hello World"),
            show("F1", 12, 72, 400, "Worldwide"),
        ],
    );
    let engine = PdfEngine::bind().unwrap();
    let doc = engine.load(&bytes).unwrap();
    assert_eq!(doc.pages().len(), 2);
    assert!(doc.pages()[0].text().unwrap().contains("Hello World"));

    let hits = doc.pages()[0].find_text("Wor").unwrap();
    assert_eq!(hits.len(), 1);
    let hit = hits[0];
    // Baseline at y=700 on an 842pt page: the glyph box straddles y=142.
    assert!(hit.x > 72.0);
    assert!(hit.y < 142.0 && hit.bottom() > 130.0, "{hit:?}");
    assert!(hit.width > 0.0 && hit.height > 0.0);

    assert!(doc.pages()[0].find_text("wor").unwrap().is_empty());
    assert_eq!(doc.pages()[1].find_text("World").unwrap().len(), 1);
    assert!(doc.pages()[0].find_text("").is_err());
}

#[test]
#[ignore]
fn drawn_marks_survive_saving() {
    let bytes = build_pdf(
        helvetica(),
        vec![
            show("F1", 12, 72, 700, "Coursework"),
            show("F1", 12, 72, 700, "untouched"),
        ],
    );
    let engine = PdfEngine::bind().unwrap();
    let mut doc = engine.load(&bytes).unwrap();
    {
        let page = &mut doc.pages_mut()[0];
        let hit = page.find_text("Course").unwrap()[0];
        page.draw_rect(
            Rect::new(hit.x, hit.bottom() - 3.0, hit.width, 3.0),
            Rgb::RED,
        );
        assert_eq!(page.marks().len(), 1);
    }
    let out = doc.into_bytes().unwrap();

    assert!(path_objects(&out, 1) > 0);
    assert_eq!(path_objects(&out, 2), 0);

    let reloaded = engine.load(&out).unwrap();
    assert!(reloaded.pages()[0].text().unwrap().contains("Coursework"));
}

#[test]
#[ignore]
fn extreme_font_metrics_do_not_panic() {
    let simple = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "FirstChar" => 4_294_967_295_i64,
        "LastChar" => 4_294_967_296_i64,
        "Widths" => vec![500.into(), 500.into()],
    };
    let cid = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Helvetica",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => "Helvetica",
            "W" => vec![Object::Real(5e9), vec![600.into(), 700.into()].into()],
        })],
    };
    let engine = PdfEngine::bind().unwrap();
    for font in [simple, cid] {
        let bytes = build_pdf(font, vec![show("F1", 12, 72, 700, "abc")]);
        let mut doc = engine.load(&bytes).unwrap();
        for page in doc.pages_mut() {
            let _ = page.find_text("abc");
        }
        assert!(!doc.into_bytes().unwrap().is_empty());
    }
}

#[test]
#[ignore]
fn garbage_is_a_load_error() {
    let engine = PdfEngine::bind().unwrap();
    assert!(engine.load(b"definitely not a pdf").is_err());
}
