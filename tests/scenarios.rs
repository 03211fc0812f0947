//! # End-to-End Tests
//!
//! Whole streams through the interpreter, checked at the page buffer and at
//! the serialized PDF.

use impacto::engine::NoWear;
use impacto::interpreter::{Interpreter, Signal};
use impacto::output::pdf::to_pdf_bytes;
use impacto::output::{FontResource, PdfOptions, PdfWriter};
use impacto::page::{Decorations, DrawOp, GuideBands};
use impacto::printer::{PrinterConfig, WrapPolicy};
use impacto::protocol::{commands, text};
use pretty_assertions::assert_eq;

fn interpreter(config: PrinterConfig) -> Interpreter {
    Interpreter::new(config, Decorations::default(), NoWear)
}

fn content_len(interpreter: &Interpreter) -> usize {
    interpreter
        .carriage()
        .pages
        .pages()
        .last()
        .map(|page| page.content().len())
        .unwrap_or(0)
}

/// Feed `bytes` to the end.
fn feed(interpreter: &mut Interpreter, bytes: &[u8]) {
    let mut source = bytes.iter().copied();
    while interpreter.step(&mut source) == Signal::Continue {}
}

// ============================================================================
// FORM FEED
// ============================================================================

#[test]
fn test_two_glyphs_then_form_feed() {
    let document = impacto::interpret(
        PrinterConfig::IBM1403,
        Decorations::default(),
        NoWear,
        b"AB\x0C".to_vec(),
    );

    assert_eq!(document.pages().len(), 2);
    assert_eq!(document.pages()[0].glyph_count(), 2);
    assert_eq!(document.pages()[0].content().len(), 2);
    assert!(document.pages()[1].content().is_empty());
}

#[test]
fn test_form_feed_on_dot_matrix() {
    let document = impacto::interpret(
        PrinterConfig::LX80,
        Decorations::default(),
        NoWear,
        b"AB\x0C".to_vec(),
    );

    assert_eq!(document.pages().len(), 2);
    assert!(document.pages()[0].dot_count() > 0);
    assert_eq!(document.pages()[0].glyph_count(), 0);
    assert!(document.pages()[1].content().is_empty());
}

#[test]
fn test_decoration_on_every_page() {
    let decorations = Decorations {
        guide_bands: Some(GuideBands::default()),
        tractor_edges: true,
    };
    let document = impacto::interpret(PrinterConfig::LX80, decorations, NoWear, b"A\x0CB".to_vec());

    let first = document.pages()[0].ops().len() - document.pages()[0].content().len();
    let second = document.pages()[1].ops().len() - document.pages()[1].content().len();
    assert!(first > 0);
    assert_eq!(first, second);
    assert!(matches!(document.pages()[1].ops()[0], DrawOp::Rect { .. }));
}

// ============================================================================
// BOLD
// ============================================================================

#[test]
fn test_bold_strikes_twice_without_extra_advance() {
    let config = PrinterConfig::LX80;

    let mut plain = interpreter(config);
    feed(&mut plain, b"X");
    let plain_dots = content_len(&plain);

    let mut bold = interpreter(config);
    let cell = bold.head().cell_width(&bold.carriage().modes);

    feed(&mut bold, &text::bold_on());
    let start_x = bold.carriage().cursor.x;
    feed(&mut bold, b"X");
    let bold_dots = content_len(&bold);
    feed(&mut bold, &text::bold_off());
    let y_start = bold.carriage().cursor.x;
    feed(&mut bold, b"Y");

    assert_eq!(bold_dots, plain_dots * 2);
    assert_eq!(start_x, 0.0);
    assert!((y_start - (start_x + cell)).abs() < 1e-6);
}

#[test]
fn test_bold_glyph_strikes_twice() {
    let mut stream = text::bold_on();
    stream.push(b'X');
    stream.extend(text::bold_off());
    stream.push(b'Y');

    let document = impacto::interpret(PrinterConfig::IBM1403, Decorations::default(), NoWear, stream);
    let codes: Vec<u8> = document.pages()[0]
        .content()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Glyph { code, .. } => Some(*code),
            _ => None,
        })
        .collect();
    assert_eq!(codes, vec![b'X', b'X', b'Y']);

    let xs: Vec<f32> = document.pages()[0]
        .content()
        .iter()
        .map(|op| match op {
            DrawOp::Glyph { x, .. } => *x,
            _ => f32::NAN,
        })
        .collect();
    // Restrike one column step right, next character one cell right
    assert!((xs[1] - xs[0] - 1.0 / 120.0).abs() < 1e-6);
    assert!((xs[2] - xs[0] - 0.1).abs() < 1e-6);
}

// ============================================================================
// TABS
// ============================================================================

#[test]
fn test_tab_on_empty_line() {
    let config = PrinterConfig::LX80.with_tab_interval(8);
    let mut interpreter = interpreter(config);
    let cell = interpreter.head().cell_width(&interpreter.carriage().modes);

    feed(&mut interpreter, b"\t");
    assert!((interpreter.carriage().cursor.x - 8.0 * cell).abs() < 1e-5);

    feed(&mut interpreter, b"AB\t");
    assert!((interpreter.carriage().cursor.x - 16.0 * cell).abs() < 1e-5);
}

#[test]
fn test_tab_never_passes_right_edge() {
    for wrap in [WrapPolicy::Discard, WrapPolicy::Wrap] {
        let config = PrinterConfig::IBM1403.with_tab_interval(8).with_wrap(wrap);
        let mut interpreter = interpreter(config);
        let right = interpreter.carriage().geometry.right_edge();

        feed(&mut interpreter, &[b'\t'; 20]);
        let cursor = interpreter.carriage().cursor;
        assert!(cursor.x <= right + 1e-4);

        match wrap {
            WrapPolicy::Discard => assert_eq!(cursor.line_count, 0),
            WrapPolicy::Wrap => assert!(cursor.line_count > 0),
        }
    }
}

// ============================================================================
// BIT IMAGE
// ============================================================================

#[test]
fn test_bit_image_top_pin() {
    let mut interpreter = interpreter(PrinterConfig::LX80);
    feed(&mut interpreter, &commands::bit_image_single(&[0b1000_0000]));

    let document = interpreter.finish();
    let dots: Vec<&DrawOp> = document.pages()[0].content().iter().collect();
    assert_eq!(dots.len(), 1);
    match dots[0] {
        DrawOp::Dot { y, .. } => {
            let top = PrinterConfig::LX80.top_margin + 0.5 / 72.0;
            assert!((y - top).abs() < 1e-6);
        }
        other => panic!("expected a dot, got {:?}", other),
    }
}

// ============================================================================
// PDF
// ============================================================================

/// Check every xref entry against the position of its `N 0 obj` line.
fn assert_xref_matches(pdf: &[u8]) {
    let find = |needle: &[u8]| pdf.windows(needle.len()).rposition(|w| w == needle);

    let startxref = find(b"startxref\n").expect("startxref");
    let tail = String::from_utf8_lossy(&pdf[startxref + 10..]);
    let xref_offset: usize = tail.lines().next().unwrap().parse().unwrap();
    assert!(pdf[xref_offset..].starts_with(b"xref\n"));

    let table = String::from_utf8_lossy(&pdf[xref_offset..startxref]).into_owned();
    let mut lines = table.lines().skip(1);
    let count: usize = lines
        .next()
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(lines.next(), Some("0000000000 65535 f "));

    for id in 1..count {
        let entry = lines.next().unwrap();
        assert!(entry.ends_with(" 00000 n "), "bad entry {:?}", entry);
        let offset: usize = entry[..10].parse().unwrap();
        let header = format!("{} 0 obj\n", id);
        assert!(
            pdf[offset..].starts_with(header.as_bytes()),
            "object {} not at {}",
            id,
            offset
        );
    }

    let trailer = format!("/Size {} /Root 1 0 R", count);
    assert!(find(trailer.as_bytes()).is_some());
}

fn busy_document() -> impacto::Document {
    let mut stream = Vec::new();
    stream.extend(b"LISTING (1 of 2)\r\n");
    stream.extend(text::underline_on());
    stream.extend(b"total\\sum");
    stream.extend(text::underline_off());
    stream.extend(commands::form_feed());
    stream.extend(commands::bit_image_double(&[0xFF, 0x81, 0xFF]));
    stream.extend(commands::form_feed());
    stream.extend(b"end");

    let decorations = Decorations {
        guide_bands: Some(GuideBands::default()),
        tractor_edges: true,
    };
    impacto::interpret(PrinterConfig::IBM1403, decorations, NoWear, stream)
}

#[test]
fn test_xref_offsets_match_objects() {
    let document = busy_document();
    assert_eq!(document.pages().len(), 3);

    let pdf = to_pdf_bytes(&document, &FontResource::Builtin).unwrap();
    assert_xref_matches(&pdf);

    let mut compressed = Vec::new();
    PdfWriter::new(&document, &FontResource::Builtin)
        .with_options(PdfOptions { compress: true })
        .write(&mut compressed)
        .unwrap();
    assert_xref_matches(&compressed);
    assert!(compressed.len() < pdf.len());
}

#[test]
fn test_xref_without_glyphs() {
    let document = impacto::interpret(
        PrinterConfig::LX80,
        Decorations::default(),
        NoWear,
        b"dots only\x0C".to_vec(),
    );
    let pdf = to_pdf_bytes(&document, &FontResource::Builtin).unwrap();
    assert_xref_matches(&pdf);
    assert!(!String::from_utf8_lossy(&pdf).contains("/Font"));
}

#[test]
fn test_media_box_includes_tractor_strips() {
    let pdf = to_pdf_bytes(&busy_document(), &FontResource::Builtin).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert_eq!(text.matches("/MediaBox [0 0 684.000 792.000]").count(), 3);
}

#[test]
fn test_json_dump_lists_pages() {
    let json = busy_document().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"].as_array().map(Vec::len), Some(3));
}
