//! Line layout for label text: wrapping, line metrics and point-to-character
//! mapping.

use std::ops::Range;
use std::str::FromStr;

use unicode_width::UnicodeWidthChar;

use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Horizontal alignment of the text block inside the label bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlignment {
    #[default]
    Left,
    Natural,
    Justified,
    Center,
    Right,
}

impl TextAlignment {
    /// Share of the slack between bounds and used text placed before the text.
    pub fn offset_factor(self) -> f32 {
        match self {
            TextAlignment::Left | TextAlignment::Natural | TextAlignment::Justified => 0.0,
            TextAlignment::Center => 0.5,
            TextAlignment::Right => 1.0,
        }
    }
}

impl FromStr for TextAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "leading" => Ok(TextAlignment::Left),
            "natural" => Ok(TextAlignment::Natural),
            "justified" => Ok(TextAlignment::Justified),
            "center" | "centre" => Ok(TextAlignment::Center),
            "right" | "trailing" => Ok(TextAlignment::Right),
            _ => Err(Error::UnknownAlignment(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineBreakMode {
    /// Break at whitespace, falling back to character breaks for long words.
    #[default]
    WordWrap,
    CharWrap,
    /// No soft wrapping; only hard newlines start a new line.
    Clip,
}

impl FromStr for LineBreakMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" | "word-wrap" => Ok(LineBreakMode::WordWrap),
            "char" | "char-wrap" => Ok(LineBreakMode::CharWrap),
            "clip" => Ok(LineBreakMode::Clip),
            _ => Err(Error::UnknownLineBreak(s.to_string())),
        }
    }
}

/// Label geometry and text settings read at hit-test time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub bounds: Size,
    pub alignment: TextAlignment,
    pub line_break: LineBreakMode,
    /// Maximum number of lines, 0 for no limit.
    pub max_lines: usize,
}

impl LayoutConfig {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            alignment: TextAlignment::default(),
            line_break: LineBreakMode::default(),
            max_lines: 0,
        }
    }
}

/// Per-character metrics of the single font used for the whole label.
pub trait FontMetrics {
    fn advance(&self, ch: char) -> f32;
    fn line_height(&self) -> f32;
    /// Distance from the top of a line to its baseline.
    fn ascent(&self) -> f32;
}

/// Fixed-cell metrics: each char advances by its display column count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    pub cell_width: f32,
    pub line_height: f32,
}

impl MonospaceMetrics {
    pub const fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance(&self, ch: char) -> f32 {
        ch.width().unwrap_or(0) as f32 * self.cell_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.line_height * 0.8
    }
}

/// One visual line: a char range plus the x position of every glyph in it.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub range: Range<usize>,
    pub y: f32,
    /// Glyph start positions followed by the line's end position.
    xs: Vec<f32>,
}

impl LineLayout {
    pub fn width(&self) -> f32 {
        self.xs.last().copied().unwrap_or(0.0)
    }

    pub fn glyph_x(&self, index: usize) -> Option<f32> {
        if !self.range.contains(&index) {
            return None;
        }
        self.xs.get(index - self.range.start).copied()
    }

    fn index_at_x(&self, x: f32) -> usize {
        if x < 0.0 {
            return self.range.start;
        }
        self.xs
            .windows(2)
            .position(|w| x < w[1])
            .map_or(self.range.end, |i| self.range.start + i)
    }
}

/// A glyph placed by [`TextLayout`], in layout coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub index: usize,
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub advance: f32,
}

/// Left-aligned layout of a text inside a container, origin at (0, 0).
#[derive(Clone, Debug)]
pub struct TextLayout {
    chars: Vec<char>,
    lines: Vec<LineLayout>,
    line_height: f32,
}

impl TextLayout {
    /// Lays out `text` in a container of `size`. Lines starting below the
    /// container bottom and lines past `max_lines` (0 = unlimited) are dropped.
    pub fn new(
        text: &str,
        metrics: &dyn FontMetrics,
        size: Size,
        mode: LineBreakMode,
        max_lines: usize,
    ) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let advances: Vec<f32> = chars.iter().map(|&ch| metrics.advance(ch)).collect();
        let line_height = metrics.line_height();

        let mut lines = Vec::new();
        'paragraphs: for para in paragraphs(&chars) {
            for range in break_paragraph(&chars, &advances, para, size.width, mode) {
                let y = lines.len() as f32 * line_height;
                if (max_lines > 0 && lines.len() >= max_lines)
                    || (!lines.is_empty() && y >= size.height)
                {
                    break 'paragraphs;
                }
                let mut xs = Vec::with_capacity(range.len() + 1);
                let mut x = 0.0;
                xs.push(x);
                for adv in &advances[range.clone()] {
                    x += adv;
                    xs.push(x);
                }
                lines.push(LineLayout { range, y, xs });
            }
        }

        Self {
            chars,
            lines,
            line_height,
        }
    }

    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Bounding box of the laid-out lines.
    pub fn used_rect(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.lines.iter().map(LineLayout::width).fold(0.0, f32::max),
            height: self.lines.len() as f32 * self.line_height,
        }
    }

    /// Row whose vertical band `[y, y + line_height)` contains `y`, without
    /// clamping.
    pub fn row_at(&self, y: f32) -> Option<usize> {
        if y < 0.0 || self.line_height <= 0.0 {
            return None;
        }
        let row = (y / self.line_height).floor() as usize;
        (row < self.lines.len()).then_some(row)
    }

    /// Character index under `point`.
    ///
    /// Lookups clamp, like a layout manager picking the nearest glyph: the
    /// vertical position is clamped to the laid-out lines and a point left of
    /// a line resolves to its first char. Right of the last glyph resolves to
    /// the line's end (exclusive). Callers that must reject blank space on
    /// either side check [`row_at`](Self::row_at) and the line width first.
    pub fn char_index_at(&self, point: Point) -> Option<usize> {
        let last = self.lines.len().checked_sub(1)?;
        let row = if point.y <= 0.0 || self.line_height <= 0.0 {
            0
        } else {
            ((point.y / self.line_height).floor() as usize).min(last)
        };
        Some(self.lines[row].index_at_x(point.x))
    }

    pub fn glyphs(&self) -> impl Iterator<Item = PlacedGlyph> + '_ {
        self.lines.iter().flat_map(move |line| {
            line.range.clone().map(move |index| {
                let i = index - line.range.start;
                PlacedGlyph {
                    index,
                    ch: self.chars[index],
                    x: line.xs[i],
                    y: line.y,
                    advance: line.xs[i + 1] - line.xs[i],
                }
            })
        })
    }
}

/// Char ranges between hard line breaks, without the terminators.
fn paragraphs(chars: &[char]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            let end = if i > start && chars[i - 1] == '\r' { i - 1 } else { i };
            out.push(start..end);
            start = i + 1;
        }
    }
    if start < chars.len() {
        out.push(start..chars.len());
    }
    out
}

fn break_paragraph(
    chars: &[char],
    advances: &[f32],
    para: Range<usize>,
    width: f32,
    mode: LineBreakMode,
) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = para.start;
    let mut x = 0.0;
    let mut break_at: Option<usize> = None;
    let mut i = para.start;

    while i < para.end {
        let ch = chars[i];
        let adv = advances[i];
        let hangs = mode == LineBreakMode::WordWrap && ch.is_whitespace();
        if mode != LineBreakMode::Clip && i > start && x + adv > width && !hangs {
            let cut = match break_at {
                Some(b) if mode == LineBreakMode::WordWrap && b > start => b,
                _ => i,
            };
            out.push(start..cut);
            start = cut;
            x = advances[cut..i].iter().sum();
            break_at = None;
            // Re-measure the same char on the new line.
            continue;
        }
        x += adv;
        if ch.is_whitespace() {
            break_at = Some(i + 1);
        }
        i += 1;
    }
    out.push(start..para.end);
    out
}
