//! # PDF Serializer
//!
//! Writes a [`Document`] as a PDF 1.4 file with one content stream per page.
//!
//! ## Object Layout
//!
//! Object numbers are assigned once, up front, by [`ObjectPlan`]. The
//! writer then emits objects in that order and records each one's offset as
//! it starts, so the cross-reference table can never disagree with the file.
//!
//! ```text
//! 1        Catalog
//! 2        Pages
//! 3..      font objects (none, Courier dict, or TrueType dict + descriptor + file)
//! then     Page, Content, Page, Content, ...
//! xref     one entry per object, plus the free entry for object 0
//! trailer  /Size /Root, startxref, %%EOF
//! ```
//!
//! ## Coordinates
//!
//! Paper-space inches with y down become points with y up:
//!
//! ```text
//! x_pt = x × 72
//! y_pt = height_pt − y × 72
//! ```

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use super::font::{FIRST_CHAR, FontResource, LAST_CHAR};
use super::{GLYPH_SIZE_PT, OffsetWriter, POINTS_PER_INCH, media_size_pt};
use crate::error::ImpactoError;
use crate::page::{Color, Document, DrawOp, Page};

const HEADER: &[u8] = b"%PDF-1.4\n%\xFF\xFF\xFF\xFF\n";

/// Bézier control distance for a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Serializer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfOptions {
    /// Deflate page content streams
    pub compress: bool,
}

/// One indirect object of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PdfObject {
    Catalog,
    Pages,
    Font,
    FontDescriptor,
    FontFile,
    Page(usize),
    Content(usize),
}

/// Object numbering, computed before anything is written.
#[derive(Debug)]
struct ObjectPlan {
    objects: Vec<PdfObject>,
    pages_root: usize,
    font: Option<usize>,
    descriptor: Option<usize>,
    font_file: Option<usize>,
    /// (page object, content object) per page
    pages: Vec<(usize, usize)>,
}

impl ObjectPlan {
    fn new(document: &Document, font: &FontResource) -> Self {
        let mut plan = Self {
            objects: Vec::new(),
            pages_root: 0,
            font: None,
            descriptor: None,
            font_file: None,
            pages: Vec::with_capacity(document.pages().len()),
        };

        plan.push(PdfObject::Catalog);
        plan.pages_root = plan.push(PdfObject::Pages);

        if document.needs_font() {
            plan.font = Some(plan.push(PdfObject::Font));
            if font.is_embedded() {
                plan.descriptor = Some(plan.push(PdfObject::FontDescriptor));
                plan.font_file = Some(plan.push(PdfObject::FontFile));
            }
        }

        for index in 0..document.pages().len() {
            let page = plan.push(PdfObject::Page(index));
            let content = plan.push(PdfObject::Content(index));
            plan.pages.push((page, content));
        }
        plan
    }

    /// Append an object and return its number.
    fn push(&mut self, object: PdfObject) -> usize {
        self.objects.push(object);
        self.objects.len()
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}

/// # PDF Writer
///
/// ## Example
///
/// ```
/// use impacto::engine::NoWear;
/// use impacto::interpreter::Interpreter;
/// use impacto::output::{FontResource, PdfWriter};
/// use impacto::page::Decorations;
/// use impacto::printer::PrinterConfig;
///
/// let mut interpreter = Interpreter::new(PrinterConfig::IBM1403, Decorations::default(), NoWear);
/// interpreter.run(&mut b"HELLO".iter().copied());
/// let document = interpreter.finish();
///
/// let mut out = Vec::new();
/// PdfWriter::new(&document, &FontResource::Builtin).write(&mut out).unwrap();
/// assert!(out.starts_with(b"%PDF-1.4"));
/// ```
pub struct PdfWriter<'a> {
    document: &'a Document,
    font: &'a FontResource,
    options: PdfOptions,
}

impl<'a> PdfWriter<'a> {
    pub fn new(document: &'a Document, font: &'a FontResource) -> Self {
        Self {
            document,
            font,
            options: PdfOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PdfOptions) -> Self {
        self.options = options;
        self
    }

    /// Write the whole file to `sink`, returning the number of bytes written.
    pub fn write<W: Write>(&self, sink: W) -> Result<u64, ImpactoError> {
        let plan = ObjectPlan::new(self.document, self.font);
        let mut out = OffsetWriter::new(sink);
        let mut offsets = vec![0u64; plan.len() + 1];

        out.write_all(HEADER)?;
        for (index, object) in plan.objects.iter().enumerate() {
            let id = index + 1;
            offsets[id] = out.offset();
            writeln!(out, "{} 0 obj", id)?;
            self.write_body(&mut out, &plan, *object)?;
            out.write_all(b"\nendobj\n")?;
        }

        let xref = out.offset();
        write!(out, "xref\n0 {}\n0000000000 65535 f \n", plan.len() + 1)?;
        for offset in &offsets[1..] {
            writeln!(out, "{:010} 00000 n ", offset)?;
        }
        write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            plan.len() + 1,
            xref
        )?;
        out.flush()?;

        log::debug!(
            "wrote {} pages, {} objects, {} bytes",
            self.document.pages().len(),
            plan.len(),
            out.offset()
        );
        Ok(out.offset())
    }

    fn write_body<W: Write>(
        &self,
        out: &mut OffsetWriter<W>,
        plan: &ObjectPlan,
        object: PdfObject,
    ) -> Result<(), ImpactoError> {
        match object {
            PdfObject::Catalog => {
                write!(out, "<< /Type /Catalog /Pages {} 0 R >>", plan.pages_root)?;
            }
            PdfObject::Pages => {
                let kids: Vec<String> = plan
                    .pages
                    .iter()
                    .map(|(page, _)| format!("{} 0 R", page))
                    .collect();
                write!(
                    out,
                    "<< /Type /Pages /Kids [{}] /Count {} >>",
                    kids.join(" "),
                    plan.pages.len()
                )?;
            }
            PdfObject::Font => match plan.descriptor {
                None => write!(out, "<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>")?,
                Some(descriptor) => {
                    let widths: Vec<String> = self
                        .font
                        .metrics()
                        .widths
                        .iter()
                        .map(u16::to_string)
                        .collect();
                    write!(
                        out,
                        "<< /Type /Font /Subtype /TrueType /BaseFont /{} /FirstChar {} /LastChar {} \
                         /Widths [{}] /FontDescriptor {} 0 R /Encoding /WinAnsiEncoding >>",
                        self.font.name(),
                        FIRST_CHAR,
                        LAST_CHAR,
                        widths.join(" "),
                        descriptor
                    )?;
                }
            },
            PdfObject::FontDescriptor => {
                let metrics = self.font.metrics();
                let Some(file) = plan.font_file else {
                    return Err(ImpactoError::Font(
                        "font descriptor planned without an embedded font file".to_string(),
                    ));
                };
                write!(
                    out,
                    "<< /Type /FontDescriptor /FontName /{} /Flags 32 /FontBBox [-100 -200 1000 900] \
                     /ItalicAngle 0 /Ascent {} /Descent {} /CapHeight 700 /StemV 80 /FontFile2 {} 0 R >>",
                    self.font.name(),
                    metrics.ascent,
                    metrics.descent,
                    file
                )?;
            }
            PdfObject::FontFile => {
                let data = self.font.data();
                write!(out, "<< /Length {} /Length1 {} >>\nstream\n", data.len(), data.len())?;
                out.write_all(data)?;
                out.write_all(b"\nendstream")?;
            }
            PdfObject::Page(index) => {
                let (_, content) = plan.pages[index];
                let (width, height) = media_size_pt(self.document);
                let resources = match plan.font {
                    Some(font) => format!("<< /Font << /F1 {} 0 R >> >>", font),
                    None => "<< >>".to_string(),
                };
                write!(
                    out,
                    "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.3} {:.3}] /Contents {} 0 R /Resources {} >>",
                    plan.pages_root, width, height, content, resources
                )?;
            }
            PdfObject::Content(index) => {
                let (_, height) = media_size_pt(self.document);
                let stream = content_stream(&self.document.pages()[index], height)?;
                if self.options.compress {
                    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&stream)?;
                    let deflated = encoder.finish()?;
                    write!(out, "<< /Length {} /Filter /FlateDecode >>\nstream\n", deflated.len())?;
                    out.write_all(&deflated)?;
                } else {
                    write!(out, "<< /Length {} >>\nstream\n", stream.len())?;
                    out.write_all(&stream)?;
                }
                out.write_all(b"\nendstream")?;
            }
        }
        Ok(())
    }
}

/// Serialize `document` into a byte vector.
pub fn to_pdf_bytes(document: &Document, font: &FontResource) -> Result<Vec<u8>, ImpactoError> {
    let mut out = Vec::new();
    PdfWriter::new(document, font).write(&mut out)?;
    Ok(out)
}

/// Current non-stroking color of a content stream.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fill {
    Gray(f32),
    Rgb(Color),
}

/// Render one page's ops as PDF content stream operators.
fn content_stream(page: &Page, height: f32) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut fill = Fill::Gray(0.0);

    for op in page.ops() {
        match *op {
            DrawOp::Dot {
                x,
                y,
                radius,
                intensity,
            } => {
                set_fill(&mut out, &mut fill, Fill::Gray(1.0 - intensity))?;
                let cx = x * POINTS_PER_INCH;
                let cy = height - y * POINTS_PER_INCH;
                circle(&mut out, cx, cy, radius)?;
            }
            DrawOp::Glyph {
                x,
                y,
                code,
                intensity,
                ..
            } => {
                set_fill(&mut out, &mut fill, Fill::Gray(1.0 - intensity))?;
                let cx = x * POINTS_PER_INCH;
                let cy = height - y * POINTS_PER_INCH - GLYPH_SIZE_PT;
                write!(out, "BT /F1 {:.1} Tf {:.3} {:.3} Td (", GLYPH_SIZE_PT, cx, cy)?;
                if matches!(code, b'(' | b')' | b'\\') {
                    out.push(b'\\');
                }
                out.push(code);
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height: h,
                color,
            } => {
                set_fill(&mut out, &mut fill, Fill::Rgb(color))?;
                writeln!(
                    out,
                    "{:.3} {:.3} {:.3} {:.3} re\nf",
                    x * POINTS_PER_INCH,
                    height - (y + h) * POINTS_PER_INCH,
                    width * POINTS_PER_INCH,
                    h * POINTS_PER_INCH
                )?;
            }
        }
    }
    Ok(out)
}

fn set_fill(out: &mut Vec<u8>, current: &mut Fill, wanted: Fill) -> std::io::Result<()> {
    if *current == wanted {
        return Ok(());
    }
    match wanted {
        Fill::Gray(level) => writeln!(out, "{:.3} g", level.clamp(0.0, 1.0))?,
        Fill::Rgb(Color(r, g, b)) => writeln!(out, "{:.3} {:.3} {:.3} rg", r, g, b)?,
    }
    *current = wanted;
    Ok(())
}

/// Filled circle from four cubic Béziers.
fn circle(out: &mut Vec<u8>, cx: f32, cy: f32, r: f32) -> std::io::Result<()> {
    let k = r * KAPPA;
    writeln!(out, "{:.3} {:.3} m", cx + r, cy)?;
    writeln!(
        out,
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
        cx + r,
        cy + k,
        cx + k,
        cy + r,
        cx,
        cy + r
    )?;
    writeln!(
        out,
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
        cx - k,
        cy + r,
        cx - r,
        cy + k,
        cx - r,
        cy
    )?;
    writeln!(
        out,
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
        cx - r,
        cy - k,
        cx - k,
        cy - r,
        cx,
        cy - r
    )?;
    writeln!(
        out,
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
        cx + k,
        cy - r,
        cx + r,
        cy - k,
        cx + r,
        cy
    )?;
    out.extend_from_slice(b"f\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Decorations, FontRef, GuideBands, PageBuffer};
    use crate::printer::PageGeometry;
    use pretty_assertions::assert_eq;

    fn glyph(code: u8) -> DrawOp {
        DrawOp::Glyph {
            x: 1.0,
            y: 1.0,
            font: FontRef::Text,
            code,
            intensity: 1.0,
        }
    }

    fn dot() -> DrawOp {
        DrawOp::Dot {
            x: 1.0,
            y: 1.0,
            radius: 0.5,
            intensity: 1.0,
        }
    }

    fn document(pages: &[&[DrawOp]]) -> Document {
        let mut buffer = PageBuffer::new(PageGeometry::default(), Decorations::default());
        for (i, ops) in pages.iter().enumerate() {
            if i > 0 {
                buffer.new_page();
            }
            for op in *ops {
                buffer.append(*op);
            }
        }
        buffer.finalize()
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_plan_without_glyphs_has_no_font() {
        let doc = document(&[&[dot()], &[dot()]]);
        let plan = ObjectPlan::new(&doc, &FontResource::Builtin);
        assert_eq!(plan.font, None);
        assert_eq!(plan.pages, vec![(3, 4), (5, 6)]);
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_plan_with_courier() {
        let doc = document(&[&[glyph(b'A')]]);
        let plan = ObjectPlan::new(&doc, &FontResource::Builtin);
        assert_eq!(plan.font, Some(3));
        assert_eq!(plan.descriptor, None);
        assert_eq!(plan.pages, vec![(4, 5)]);
    }

    #[test]
    fn test_plan_with_embedded_font() {
        let font = FontResource::Embedded {
            name: "Mono".to_string(),
            data: vec![0; 16],
            metrics: FontResource::Builtin.metrics(),
        };
        let doc = document(&[&[glyph(b'A')], &[]]);
        let plan = ObjectPlan::new(&doc, &font);
        assert_eq!(plan.font, Some(3));
        assert_eq!(plan.descriptor, Some(4));
        assert_eq!(plan.font_file, Some(5));
        assert_eq!(plan.pages, vec![(6, 7), (8, 9)]);
    }

    #[test]
    fn test_descriptor_without_font_file_is_an_error() {
        let font = FontResource::Embedded {
            name: "Mono".to_string(),
            data: vec![0; 16],
            metrics: FontResource::Builtin.metrics(),
        };
        let doc = document(&[&[glyph(b'A')]]);
        let mut plan = ObjectPlan::new(&doc, &font);
        plan.font_file = None;

        let mut out = OffsetWriter::new(Vec::new());
        let result = PdfWriter::new(&doc, &font).write_body(&mut out, &plan, PdfObject::FontDescriptor);
        assert!(matches!(result, Err(ImpactoError::Font(_))));
        assert_eq!(out.offset(), 0);
    }

    #[test]
    fn test_empty_document_layout() {
        let doc = document(&[&[]]);
        let out = text(&to_pdf_bytes(&doc, &FontResource::Builtin).unwrap());
        assert!(out.starts_with("%PDF-1.4\n"));
        assert!(out.contains("2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n"));
        assert!(out.contains("/MediaBox [0 0 612.000 792.000]"));
        assert!(out.contains("/Resources << >>"));
        assert!(out.contains("4 0 obj\n<< /Length 0 >>\nstream\n\nendstream\nendobj\n"));
        assert!(out.contains("xref\n0 5\n0000000000 65535 f \n"));
        assert!(out.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_glyph_is_flipped_and_escaped() {
        let doc = document(&[&[glyph(b'(')]]);
        let out = text(&to_pdf_bytes(&doc, &FontResource::Builtin).unwrap());
        // 792 - 72 - 12
        assert!(out.contains("BT /F1 12.0 Tf 72.000 708.000 Td (\\() Tj ET\n"));
        assert!(out.contains("/Resources << /Font << /F1 3 0 R >> >>"));
        assert!(out.contains("<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>"));
    }

    #[test]
    fn test_dot_path() {
        let page_doc = document(&[&[dot()]]);
        let stream = content_stream(&page_doc.pages()[0], 792.0).unwrap();
        let stream = text(&stream);
        let lines: Vec<&str> = stream.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "72.500 720.000 m");
        assert_eq!(lines[5], "f");
    }

    #[test]
    fn test_fill_changes_only_when_needed() {
        let faded = DrawOp::Dot {
            x: 1.0,
            y: 1.0,
            radius: 0.5,
            intensity: 0.75,
        };
        let doc = document(&[&[dot(), faded, faded, dot()]]);
        let stream = text(&content_stream(&doc.pages()[0], 792.0).unwrap());
        assert_eq!(stream.matches("0.250 g").count(), 1);
        assert_eq!(stream.matches("0.000 g").count(), 1);
    }

    #[test]
    fn test_bands_use_rgb_fill() {
        let decorations = Decorations {
            guide_bands: Some(GuideBands::default()),
            tractor_edges: false,
        };
        let doc = PageBuffer::new(PageGeometry::default(), decorations).finalize();
        let stream = text(&content_stream(&doc.pages()[0], 792.0).unwrap());
        assert!(stream.starts_with("0.850 1.000 0.850 rg\n0.000 756.000 612.000 36.000 re\nf\n"));
    }

    #[test]
    fn test_compressed_streams() {
        let doc = document(&[&[dot(), dot()]]);
        let mut out = Vec::new();
        PdfWriter::new(&doc, &FontResource::Builtin)
            .with_options(PdfOptions { compress: true })
            .write(&mut out)
            .unwrap();
        assert!(text(&out).contains("/Filter /FlateDecode"));
    }

    #[test]
    fn test_returns_bytes_written() {
        let doc = document(&[&[glyph(b'Z')]]);
        let mut out = Vec::new();
        let written = PdfWriter::new(&doc, &FontResource::Builtin).write(&mut out).unwrap();
        assert_eq!(written, out.len() as u64);
    }
}
