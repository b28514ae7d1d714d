//! Page geometry and pagination of a `PreviewDocument` into positioned lines.
//!
//! Every line has a fixed height in points. Content is grouped into blocks that
//! should stay on one page: the header, each entry, and each section title fused
//! with its first entry. A block that does not fit on the current page moves to a
//! fresh one; a block taller than a whole page is split line by line, but never
//! right after a heading.

use serde::{Deserialize, Serialize};

use super::font_metrics::{wrap_text, FontFace};
use super::preview::{PreviewDocument, PreviewEntry};

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters in PDF points (1/72 inch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub title_size_pt: f32,
    pub section_title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    /// Line height as a multiple of font size.
    pub leading: f32,
}

/// A4 portrait, 50pt margins.
impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            width_pt: 595.0,
            height_pt: 842.0,
            margin_pt: 50.0,
            title_size_pt: 18.0,
            section_title_size_pt: 13.0,
            heading_size_pt: 11.0,
            body_size_pt: 10.0,
            leading: 1.3,
        }
    }
}

impl PageConfig {
    pub fn text_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn usable_height(&self) -> f32 {
        self.height_pt - 2.0 * self.margin_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lines
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Title,
    Contact,
    SectionTitle,
    Heading,
    Subheading,
    Body,
}

impl LineStyle {
    pub fn face(&self) -> FontFace {
        match self {
            LineStyle::Title | LineStyle::SectionTitle | LineStyle::Heading => FontFace::Bold,
            LineStyle::Contact | LineStyle::Subheading | LineStyle::Body => FontFace::Regular,
        }
    }

    pub fn size(&self, config: &PageConfig) -> f32 {
        match self {
            LineStyle::Title => config.title_size_pt,
            LineStyle::SectionTitle => config.section_title_size_pt,
            LineStyle::Heading => config.heading_size_pt,
            LineStyle::Contact | LineStyle::Subheading | LineStyle::Body => config.body_size_pt,
        }
    }

    /// Extra space above the line.
    fn gap_before(&self) -> f32 {
        match self {
            LineStyle::SectionTitle => 10.0,
            LineStyle::Heading => 5.0,
            _ => 0.0,
        }
    }

    /// Lines that introduce the content after them.
    fn is_heading(&self) -> bool {
        matches!(
            self,
            LineStyle::SectionTitle | LineStyle::Heading | LineStyle::Subheading
        )
    }

    pub fn height(&self, config: &PageConfig) -> f32 {
        self.gap_before() + self.size(config) * config.leading
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    style: LineStyle,
    text: String,
}

/// A line positioned on a page. `baseline_pt` is measured from the top margin down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub style: LineStyle,
    pub text: String,
    pub baseline_pt: f32,
}

pub type Page = Vec<PlacedLine>;

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

fn wrapped(style: LineStyle, text: &str, config: &PageConfig) -> Vec<Line> {
    wrap_text(text, config.text_width(), style.face(), style.size(config))
        .into_iter()
        .map(|text| Line { style, text })
        .collect()
}

fn entry_lines(entry: &PreviewEntry, config: &PageConfig) -> Vec<Line> {
    let mut lines = wrapped(LineStyle::Heading, &entry.heading, config);
    if let Some(sub) = &entry.subheading {
        lines.extend(wrapped(LineStyle::Subheading, sub, config));
    }
    for paragraph in &entry.body {
        lines.extend(wrapped(LineStyle::Body, paragraph, config));
    }
    lines
}

/// Groups the document into keep-together blocks, in reading order.
fn blocks(doc: &PreviewDocument, config: &PageConfig) -> Vec<Vec<Line>> {
    let mut out = Vec::new();

    let mut header = wrapped(LineStyle::Title, &doc.title, config);
    header.extend(wrapped(LineStyle::Contact, &doc.contact_line, config));
    out.push(header);

    for section in &doc.sections {
        let mut lead = wrapped(LineStyle::SectionTitle, &section.title, config);
        let mut entries = section.entries.iter();
        if let Some(first) = entries.next() {
            lead.extend(entry_lines(first, config));
        }
        out.push(lead);
        out.extend(entries.map(|e| entry_lines(e, config)));
    }
    out
}

struct Paginator<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Paginator {
            config,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
        }
    }

    fn remaining(&self) -> f32 {
        self.config.usable_height() - self.cursor
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.cursor = 0.0;
    }

    fn place(&mut self, line: Line) {
        let baseline_pt = self.cursor + line.style.gap_before() + line.style.size(self.config);
        self.cursor += line.style.height(self.config);
        self.current.push(PlacedLine {
            style: line.style,
            text: line.text,
            baseline_pt,
        });
    }

    fn place_block(&mut self, block: Vec<Line>) {
        let height: f32 = block.iter().map(|l| l.style.height(self.config)).sum();
        if height > self.remaining() && height <= self.config.usable_height() {
            self.break_page();
        }
        if height <= self.remaining() {
            block.into_iter().for_each(|line| self.place(line));
            return;
        }

        // Taller than a page: split, keeping each heading run with the line after it.
        let heights: Vec<f32> = block.iter().map(|l| l.style.height(self.config)).collect();
        let styles: Vec<LineStyle> = block.iter().map(|l| l.style).collect();
        for (i, line) in block.into_iter().enumerate() {
            let needed = if i == 0 || !styles[i - 1].is_heading() {
                run_height(&styles, &heights, i)
            } else {
                heights[i]
            };
            if needed > self.remaining() && !self.current.is_empty() {
                self.break_page();
            }
            self.place(line);
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.break_page();
        self.pages
    }
}

/// Height of the heading run starting at `start` plus the first line after it.
fn run_height(styles: &[LineStyle], heights: &[f32], start: usize) -> f32 {
    let mut total = 0.0;
    for i in start..styles.len() {
        total += heights[i];
        if !styles[i].is_heading() {
            break;
        }
    }
    total
}

/// Lays `doc` out into pages. Always returns at least one page.
pub fn paginate(doc: &PreviewDocument, config: &PageConfig) -> Vec<Page> {
    let mut paginator = Paginator::new(config);
    for block in blocks(doc, config) {
        paginator.place_block(block);
    }
    let pages = paginator.finish();
    if pages.is_empty() {
        vec![Vec::new()]
    } else {
        pages
    }
}
