//! # SVG Serializer
//!
//! Renders pages as SVG text. Units are points and y grows downward, the
//! same as paper space, so ops map over with a single scale.
//!
//! Two layouts:
//!
//! - [`pages_svg`]: one standalone document per sheet
//! - [`concatenated_svg`]: every sheet in one document, stacked top to bottom

use super::font::FontResource;
use super::{GLYPH_SIZE_PT, POINTS_PER_INCH, hex_color, media_size_pt};
use crate::page::{Color, Document, DrawOp, Page};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

fn open_svg(out: &mut String, width: f32, height: f32) {
    out.push_str(XML_DECLARATION);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.3}pt\" height=\"{h:.3}pt\" \
         viewBox=\"0 0 {w:.3} {h:.3}\">\n",
        w = width,
        h = height
    ));
}

/// One page as a standalone SVG document.
///
/// Returns `None` if `index` is out of range.
pub fn page_svg(document: &Document, index: usize, font: &FontResource) -> Option<String> {
    let page = document.pages().get(index)?;
    let (width, height) = media_size_pt(document);

    let mut out = String::new();
    open_svg(&mut out, width, height);
    page_body(&mut out, page, width, height, font);
    out.push_str("</svg>\n");
    Some(out)
}

/// Every page as its own SVG document, in page order.
pub fn pages_svg(document: &Document, font: &FontResource) -> Vec<String> {
    (0..document.pages().len())
        .filter_map(|index| page_svg(document, index, font))
        .collect()
}

/// All pages in one SVG document, each translated below the previous one.
pub fn concatenated_svg(document: &Document, font: &FontResource) -> String {
    let (width, height) = media_size_pt(document);
    let total = height * document.pages().len() as f32;

    let mut out = String::new();
    open_svg(&mut out, width, total);
    for (index, page) in document.pages().iter().enumerate() {
        out.push_str(&format!(
            "<g transform=\"translate(0 {:.3})\">\n",
            height * index as f32
        ));
        page_body(&mut out, page, width, height, font);
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}

fn page_body(out: &mut String, page: &Page, width: f32, height: f32, font: &FontResource) {
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{:.3}\" height=\"{:.3}\" fill=\"#ffffff\"/>\n",
        width, height
    ));

    for op in page.ops() {
        match *op {
            DrawOp::Dot {
                x,
                y,
                radius,
                intensity,
            } => {
                out.push_str(&format!(
                    "<circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\" fill=\"{}\"/>\n",
                    x * POINTS_PER_INCH,
                    y * POINTS_PER_INCH,
                    radius,
                    hex_color(Color::ink(intensity))
                ));
            }
            DrawOp::Glyph {
                x,
                y,
                code,
                intensity,
                ..
            } => {
                out.push_str(&format!(
                    "<text x=\"{:.3}\" y=\"{:.3}\" font-family=\"{}, Courier, monospace\" \
                     font-size=\"{}\" fill=\"{}\">",
                    x * POINTS_PER_INCH,
                    y * POINTS_PER_INCH + GLYPH_SIZE_PT,
                    font.name(),
                    GLYPH_SIZE_PT,
                    hex_color(Color::ink(intensity))
                ));
                escape_into(out, char::from(code));
                out.push_str("</text>\n");
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                out.push_str(&format!(
                    "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\"/>\n",
                    x * POINTS_PER_INCH,
                    y * POINTS_PER_INCH,
                    width * POINTS_PER_INCH,
                    height * POINTS_PER_INCH,
                    hex_color(color)
                ));
            }
        }
    }
}

fn escape_into(out: &mut String, c: char) {
    match c {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(c),
    }
}
