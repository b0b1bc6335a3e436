// src/export/geometry.rs
//! Page geometry and text measurement.
//!
//! Widths come from a static Helvetica table in 1/1000 em units, covering
//! ASCII 0x20..=0x7E with an average-width fallback for everything else. A
//! static table is an intentional approximation: it is deterministic, needs no
//! font files, and is accurate enough for word wrap at resume font sizes.

/// Page dimensions in millimetres, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub line_height: f64,
}

impl PageGeometry {
    /// A4 portrait with the export defaults: 20 mm margins, 7 mm leading.
    pub const A4: PageGeometry = PageGeometry {
        page_width: 210.0,
        page_height: 297.0,
        margin: 20.0,
        line_height: 7.0,
    };

    /// Horizontal space available to a full-width block.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// The vertical cursor may not pass this before a block is placed.
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin
    }
}

pub const BODY_FONT_SIZE: f64 = 11.0;
/// Heading sizes for levels 1, 2 and 3+ (largest to smallest).
pub const HEADING_FONT_SIZES: [f64; 3] = [16.0, 14.0, 13.0];
/// Horizontal inset for bullet items, in millimetres.
pub const BULLET_INDENT: f64 = 5.0;

const PT_TO_MM: f64 = 25.4 / 72.0;
const AVERAGE_CHAR_WIDTH: u16 = 556;

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
/// Index = (char as usize) - 32.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // 0x20 ' ' .. 0x2F '/'
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // '0'..'9'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // ':' .. '@'
    278, 278, 584, 584, 584, 556, 1015,
    // 'A'..'Z'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // '[' .. '`'
    278, 278, 278, 469, 556, 333,
    // 'a'..'z'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // '{' .. '~'
    334, 260, 334, 584,
];

/// Measures the rendered width of a string in millimetres at the given font
/// size in points. Non-ASCII characters fall back to the average width.
pub fn measure_mm(text: &str, font_size_pt: f64) -> f64 {
    let units: u64 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..=126).contains(&code) {
                u64::from(HELVETICA_WIDTHS[code - 32])
            } else {
                u64::from(AVERAGE_CHAR_WIDTH)
            }
        })
        .sum();
    (units as f64 / 1000.0) * font_size_pt * PT_TO_MM
}
