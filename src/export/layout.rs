// src/export/layout.rs
//! Pure layout of Markdown-flavored text into paginated blocks.
//!
//! Each input line becomes exactly one block: a heading (`#` runs), a bullet
//! item (`* ` / `- `), or wrapped body text. Blank lines only advance the
//! vertical cursor by half a line height. Inline `**` markers are stripped
//! everywhere. Pagination is decided per block: if a block would cross the
//! bottom margin, it starts a new page at the top margin instead.
//!
//! Layout is a function of the input string and the page geometry alone - no
//! IO, no ambient state - so identical inputs always produce identical pages.

use super::geometry::{measure_mm, PageGeometry, BODY_FONT_SIZE, BULLET_INDENT};

pub const BULLET_GLYPH: &str = "\u{2022}";

/// Vertical space a heading must fit in before placement.
const HEADING_HEIGHT: f64 = 10.0;
/// Advance after a heading baseline, added to the line height.
const HEADING_GAP_AFTER: f64 = 2.0;
/// Extra leading space before level 1 and level 2 headings.
const H1_LEAD: f64 = 8.0;
const H2_LEAD: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Section heading; `level` 1 is largest, 3 smallest. Markers stripped.
    Heading { level: u8, text: String, y: f64 },
    /// Wrapped bullet item; the glyph appears only on the first line.
    Bullet { lines: Vec<String>, y: f64 },
    /// Wrapped body text at the full content width.
    Body { lines: Vec<String>, y: f64 },
}

impl Block {
    pub fn y(&self) -> f64 {
        match self {
            Block::Heading { y, .. } | Block::Bullet { y, .. } | Block::Body { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

/// Lay the input out against the given page geometry.
pub fn layout(input: &str, geometry: PageGeometry) -> Document {
    let mut state = LayoutState::new(geometry);

    for raw_line in input.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            state.cursor += geometry.line_height / 2.0;
            continue;
        }

        if let Some((level, text)) = parse_heading(line) {
            state.place_heading(level, text);
        } else if let Some(item) = parse_bullet(line) {
            state.place_bullet(item);
        } else {
            state.place_body(strip_bold(line));
        }
    }

    state.finish()
}

struct LayoutState {
    geometry: PageGeometry,
    completed: Vec<Page>,
    current: Page,
    cursor: f64,
}

impl LayoutState {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            completed: Vec::new(),
            current: Page::default(),
            cursor: geometry.margin,
        }
    }

    fn place_heading(&mut self, level: u8, text: String) {
        // Lead is applied before the break check: a heading that opens a new
        // page sits exactly at the top margin, with no carried-over gap.
        self.cursor += match level {
            1 => H1_LEAD,
            2 => H2_LEAD,
            _ => 0.0,
        };
        self.fit(HEADING_HEIGHT);
        self.current.blocks.push(Block::Heading {
            level,
            text,
            y: self.cursor,
        });
        self.cursor += self.geometry.line_height + HEADING_GAP_AFTER;
    }

    fn place_bullet(&mut self, item: String) {
        let width = self.geometry.content_width() - BULLET_INDENT;
        let lines = wrap(&format!("{} {}", BULLET_GLYPH, item), width, BODY_FONT_SIZE);
        self.place_wrapped(lines, true);
    }

    fn place_body(&mut self, text: String) {
        let lines = wrap(&text, self.geometry.content_width(), BODY_FONT_SIZE);
        self.place_wrapped(lines, false);
    }

    fn place_wrapped(&mut self, lines: Vec<String>, bullet: bool) {
        let height = lines.len() as f64 * self.geometry.line_height;
        self.fit(height);
        let y = self.cursor;
        let block = if bullet {
            Block::Bullet { lines, y }
        } else {
            Block::Body { lines, y }
        };
        self.current.blocks.push(block);
        self.cursor += height;
    }

    /// Start a new page if the next block would cross the bottom margin.
    fn fit(&mut self, height: f64) {
        if self.cursor + height > self.geometry.bottom_limit() {
            self.completed.push(std::mem::take(&mut self.current));
            self.cursor = self.geometry.margin;
        }
    }

    fn finish(mut self) -> Document {
        self.completed.push(self.current);
        Document {
            geometry: self.geometry,
            pages: self.completed,
        }
    }
}

/// A line opening with `#` runs is a heading; 3 or more hashes map to the
/// smallest level. All marker characters are stripped from the text.
fn parse_heading(line: &str) -> Option<(u8, String)> {
    if !line.starts_with('#') {
        return None;
    }
    let hashes = line.chars().take_while(|c| *c == '#').count();
    let level = hashes.min(3) as u8;
    let text = strip_bold(line.trim_start_matches('#').trim_start());
    Some((level, text))
}

fn parse_bullet(line: &str) -> Option<String> {
    let rest = line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("- "))?;
    Some(strip_bold(rest.trim_start()))
}

fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Greedy word wrap against measured widths. A single word wider than the
/// limit keeps its own line rather than being split mid-word.
fn wrap(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure_mm(&candidate, font_size) > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: PageGeometry = PageGeometry::A4;

    fn single_page_blocks(doc: &Document) -> &[Block] {
        assert_eq!(doc.pages.len(), 1);
        &doc.pages[0].blocks
    }

    #[test]
    fn test_block_sequence_round_trip() {
        let doc = layout("# Title\n\nBody text\n* item one\n* item two", A4);
        let blocks = single_page_blocks(&doc);
        assert_eq!(blocks.len(), 4);

        match &blocks[0] {
            Block::Heading { level, text, y } => {
                assert_eq!(*level, 1);
                assert_eq!(text, "Title");
                // margin + level-1 lead
                assert!((y - 28.0).abs() < 1e-9);
            }
            other => panic!("expected heading, got {other:?}"),
        }
        match &blocks[1] {
            Block::Body { lines, y } => {
                assert_eq!(lines, &vec!["Body text".to_string()]);
                // heading advance (7 + 2) then a half-line blank gap (3.5)
                assert!((y - 40.5).abs() < 1e-9);
            }
            other => panic!("expected body, got {other:?}"),
        }
        match &blocks[2] {
            Block::Bullet { lines, .. } => {
                assert_eq!(lines, &vec![format!("{} item one", BULLET_GLYPH)])
            }
            other => panic!("expected bullet, got {other:?}"),
        }
        match &blocks[3] {
            Block::Bullet { lines, .. } => {
                assert_eq!(lines, &vec![format!("{} item two", BULLET_GLYPH)])
            }
            other => panic!("expected bullet, got {other:?}"),
        }
    }

    #[test]
    fn test_second_heading_starts_new_page_at_top_margin() {
        // bottom limit = 40mm: one heading fits, two do not.
        let short = PageGeometry {
            page_width: 210.0,
            page_height: 60.0,
            margin: 20.0,
            line_height: 7.0,
        };
        let doc = layout("# One\n# Two", short);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].blocks.len(), 1);
        assert_eq!(doc.pages[1].blocks.len(), 1);
        assert!((doc.pages[1].blocks[0].y() - short.margin).abs() < 1e-9);
    }

    #[test]
    fn test_multi_line_block_paginates_as_a_whole() {
        let short = PageGeometry {
            page_width: 210.0,
            page_height: 60.0,
            margin: 20.0,
            line_height: 7.0,
        };
        // Two body lines fit (20 + 14 <= 40); the wrapped three-line block
        // after them must move to page two in one piece.
        let long = "long body copy that keeps going ".repeat(12);
        let doc = layout(&format!("first\nsecond\n{}", long), short);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].blocks.len(), 2);
        let moved = &doc.pages[1].blocks[0];
        assert!((moved.y() - short.margin).abs() < 1e-9);
        match moved {
            Block::Body { lines, .. } => assert!(lines.len() >= 2),
            other => panic!("expected body, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_levels_and_marker_stripping() {
        let doc = layout("# Top\n## Section\n### Sub\n#### Deep", A4);
        let levels: Vec<u8> = single_page_blocks(&doc)
            .iter()
            .map(|b| match b {
                Block::Heading { level, .. } => *level,
                other => panic!("expected heading, got {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 3]);

        match &doc.pages[0].blocks[3] {
            Block::Heading { text, .. } => assert_eq!(text, "Deep"),
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_bold_markers_are_stripped() {
        let doc = layout(
            "## **Skills**\n* **Rust** and **Go**\nStrong **systems** background",
            A4,
        );
        let blocks = single_page_blocks(&doc);
        match &blocks[0] {
            Block::Heading { text, .. } => assert_eq!(text, "Skills"),
            other => panic!("expected heading, got {other:?}"),
        }
        match &blocks[1] {
            Block::Bullet { lines, .. } => {
                assert_eq!(lines[0], format!("{} Rust and Go", BULLET_GLYPH))
            }
            other => panic!("expected bullet, got {other:?}"),
        }
        match &blocks[2] {
            Block::Body { lines, .. } => assert_eq!(lines[0], "Strong systems background"),
            other => panic!("expected body, got {other:?}"),
        }
    }

    #[test]
    fn test_dash_bullets_match_star_bullets() {
        let doc = layout("- item\n* item", A4);
        let blocks = single_page_blocks(&doc);
        assert_eq!(blocks[0].clone(), {
            let mut b = blocks[1].clone();
            if let Block::Bullet { y, .. } = &mut b {
                *y -= A4.line_height;
            }
            b
        });
    }

    #[test]
    fn test_long_bullet_wraps_with_glyph_on_first_line_only() {
        let long = format!("* {}", "senior engineer with experience ".repeat(10));
        let doc = layout(&long, A4);
        match &single_page_blocks(&doc)[0] {
            Block::Bullet { lines, .. } => {
                assert!(lines.len() >= 2);
                assert!(lines[0].starts_with(BULLET_GLYPH));
                for line in &lines[1..] {
                    assert!(!line.contains(BULLET_GLYPH));
                }
            }
            other => panic!("expected bullet, got {other:?}"),
        }
    }

    #[test]
    fn test_wrapped_lines_respect_width() {
        let text = "a reasonably long sentence that should wrap ".repeat(6);
        for line in wrap(&text, 80.0, BODY_FONT_SIZE) {
            assert!(measure_mm(&line, BODY_FONT_SIZE) <= 80.0);
        }
    }

    #[test]
    fn test_every_non_blank_line_becomes_one_block() {
        let input = "# H\nbody one\n* b1\n\n- b2\n## H2\nbody two";
        let doc = layout(input, A4);
        let total: usize = doc.pages.iter().map(|p| p.blocks.len()).sum();
        let non_blank = input.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(total, non_blank);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let input = "# Resume\n\n## Experience\n* built things\n* shipped things\n\nSummary line";
        let first = layout(input, A4);
        let second = layout(input, A4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_whitespace_only_input_yields_one_empty_page() {
        let doc = layout("\n   \n\t\n", A4);
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].blocks.is_empty());
    }
}
