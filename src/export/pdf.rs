// src/export/pdf.rs
//! Minimal PDF serializer for laid-out documents.
//!
//! Writes the small subset of PDF 1.4 the export needs: base-14 Helvetica and
//! Helvetica-Bold with WinAnsi encoding, one uncompressed content stream per
//! page, and a classic xref table. Consumes layout output only; all placement
//! decisions were already made by the layout engine.

use anyhow::{Context, Result};
use std::path::Path;

use super::geometry::{PageGeometry, BODY_FONT_SIZE, BULLET_INDENT, HEADING_FONT_SIZES};
use super::layout::{Block, Document, Page};

const MM_TO_PT: f64 = 72.0 / 25.4;

// Object ids: 1 catalog, 2 page tree, 3 regular font, 4 bold font, then an
// alternating page/content pair per page.
const FIRST_PAGE_OBJECT: usize = 5;

/// Serialize the document as a complete PDF byte stream.
pub fn render(doc: &Document) -> Vec<u8> {
    let mut builder = PdfBuilder::new();
    let page_count = doc.pages.len();

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect();

    builder.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");
    builder.object(
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        )
        .as_bytes(),
    );
    builder.object(
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    builder.object(
        4,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let width_pt = doc.geometry.page_width * MM_TO_PT;
    let height_pt = doc.geometry.page_height * MM_TO_PT;

    for (i, page) in doc.pages.iter().enumerate() {
        let page_id = FIRST_PAGE_OBJECT + 2 * i;
        let content_id = page_id + 1;

        builder.object(
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                width_pt, height_pt, content_id
            )
            .as_bytes(),
        );

        let content = page_content(page, &doc.geometry);
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        builder.object(content_id, &stream);
    }

    builder.finish()
}

/// Render and write the document to disk.
pub async fn write_file(doc: &Document, path: &Path) -> Result<()> {
    tokio::fs::write(path, render(doc))
        .await
        .with_context(|| format!("Failed to write PDF: {}", path.display()))
}

fn page_content(page: &Page, geometry: &PageGeometry) -> Vec<u8> {
    let mut ops = Vec::new();

    for block in &page.blocks {
        match block {
            Block::Heading { level, text, y } => {
                let size = HEADING_FONT_SIZES[usize::from((*level).clamp(1, 3)) - 1];
                draw_text(&mut ops, geometry, "F2", size, geometry.margin, *y, text);
            }
            Block::Bullet { lines, y } => {
                for (i, line) in lines.iter().enumerate() {
                    draw_text(
                        &mut ops,
                        geometry,
                        "F1",
                        BODY_FONT_SIZE,
                        geometry.margin + BULLET_INDENT,
                        y + i as f64 * geometry.line_height,
                        line,
                    );
                }
            }
            Block::Body { lines, y } => {
                for (i, line) in lines.iter().enumerate() {
                    draw_text(
                        &mut ops,
                        geometry,
                        "F1",
                        BODY_FONT_SIZE,
                        geometry.margin,
                        y + i as f64 * geometry.line_height,
                        line,
                    );
                }
            }
        }
    }

    ops
}

fn draw_text(
    ops: &mut Vec<u8>,
    geometry: &PageGeometry,
    font: &str,
    size: f64,
    x_mm: f64,
    y_mm: f64,
    text: &str,
) {
    // Layout y grows downward from the top edge; PDF user space grows upward.
    let x = x_mm * MM_TO_PT;
    let y = (geometry.page_height - y_mm) * MM_TO_PT;
    ops.extend_from_slice(format!("BT /{} {:.1} Tf {:.2} {:.2} Td (", font, size, x, y).as_bytes());
    ops.extend_from_slice(&encode_text(text));
    ops.extend_from_slice(b") Tj ET\n");
}

/// Map text onto WinAnsi bytes. Latin-1 passes through, common punctuation
/// gets its CP-1252 slot, anything else degrades to `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0x7E => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => (c as u32) as u8,
            _ => b'?',
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

struct PdfBuilder {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    /// Objects must be emitted in id order so the xref table lines up.
    fn object(&mut self, id: usize, body: &[u8]) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_start = self.buf.len();
        let count = self.offsets.len() + 1;

        self.buf
            .extend_from_slice(format!("xref\n0 {}\n", count).as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                count, xref_start
            )
            .as_bytes(),
        );

        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::layout;

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn test_output_is_framed_as_pdf() {
        let doc = layout("# Title\nBody", PageGeometry::A4);
        let bytes = render(&doc);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(count_occurrences(&bytes, b"startxref"), 1);
    }

    #[test]
    fn test_one_page_object_per_layout_page() {
        let short = PageGeometry {
            page_width: 210.0,
            page_height: 60.0,
            margin: 20.0,
            line_height: 7.0,
        };
        let doc = layout("# One\n# Two", short);
        assert_eq!(doc.pages.len(), 2);
        let bytes = render(&doc);
        assert_eq!(count_occurrences(&bytes, b"/Type /Page "), 2);
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
    }

    #[test]
    fn test_one_text_run_per_rendered_line() {
        let doc = layout("# Title\nBody\n* one\n* two", PageGeometry::A4);
        let bytes = render(&doc);
        assert_eq!(count_occurrences(&bytes, b" Tj ET"), 4);
    }

    #[test]
    fn test_headings_use_bold_font() {
        let doc = layout("## Section", PageGeometry::A4);
        let content = String::from_utf8_lossy(&render(&doc)).to_string();
        assert!(content.contains("/F2 14.0 Tf"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = layout("# R\n* a\n* b\n\ntext", PageGeometry::A4);
        assert_eq!(render(&doc), render(&doc));
    }

    #[test]
    fn test_delimiters_are_escaped() {
        let doc = layout("salary (negotiable) \\ more", PageGeometry::A4);
        let bytes = render(&doc);
        assert_eq!(count_occurrences(&bytes, b"\\("), 1);
        assert_eq!(count_occurrences(&bytes, b"\\)"), 1);
        assert_eq!(count_occurrences(&bytes, b"\\\\"), 1);
    }

    #[test]
    fn test_unmappable_characters_degrade_to_question_mark() {
        assert_eq!(encode_text("日本"), b"??".to_vec());
        assert_eq!(encode_text("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
    }
}
