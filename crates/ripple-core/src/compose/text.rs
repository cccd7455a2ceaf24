//! Hero text layout as seen by the compositor.
//!
//! The browser lays the real text out; the compositor only redraws it into the
//! source image at the same positions. A [`TextLayoutSource`] reports where each
//! text run sits, in logical pixels relative to the canvas.

use super::DrawSurface;
use smallvec::SmallVec;

pub const DEFAULT_FONT_FAMILY: &str = "'Red Hat Display', sans-serif";
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const DEFAULT_SUBTITLE_SIZE: f32 = 18.0;
pub const DEFAULT_FONT_WEIGHT: &str = "400";

/// Below this magnitude letter spacing is ignored and runs draw in one call.
pub const MIN_LETTER_SPACING: f32 = 0.01;

/// Glyph boxes whose snapped tops differ by more than this start a new line.
const LINE_TOP_TOLERANCE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Plain text leading the kicker ("Hi, I'm ").
    KickerPrefix,
    /// Gradient-filled name span inside the kicker.
    KickerHighlight,
    Subtitle,
}

/// Parse a CSS pixel length. `normal` and unparsable values yield `None`.
pub fn parse_px(value: &str) -> Option<f32> {
    let v = value.trim();
    if v.is_empty() || v == "normal" {
        return None;
    }
    let end = v
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(v.len());
    v[..end].parse::<f32>().ok().filter(|n| n.is_finite())
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontDescriptor {
    pub style: Option<String>,
    pub weight: String,
    pub size_px: f32,
    pub family: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            style: None,
            weight: DEFAULT_FONT_WEIGHT.into(),
            size_px: DEFAULT_FONT_SIZE,
            family: DEFAULT_FONT_FAMILY.into(),
        }
    }
}

impl FontDescriptor {
    /// Build from computed style strings. Empty values fall back.
    pub fn from_computed(
        style: &str,
        weight: &str,
        size: &str,
        family: &str,
        fallback_family: &str,
        default_size: f32,
    ) -> Self {
        let style = style.trim();
        Self {
            style: (!style.is_empty() && style != "normal").then(|| style.to_string()),
            weight: if weight.trim().is_empty() {
                DEFAULT_FONT_WEIGHT.into()
            } else {
                weight.trim().into()
            },
            size_px: parse_px(size).unwrap_or(default_size),
            family: if family.trim().is_empty() {
                fallback_family.into()
            } else {
                family.trim().into()
            },
        }
    }

    /// Canvas `font` shorthand.
    pub fn to_css(&self) -> String {
        match &self.style {
            Some(style) => format!("{} {} {}px {}", style, self.weight, self.size_px, self.family),
            None => format!("{} {}px {}", self.weight, self.size_px, self.family),
        }
    }
}

/// Client rect of one glyph, page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl GlyphRect {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right - self.left == 0.0 && self.bottom - self.top == 0.0
    }
}

/// One rendered line of a text run.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBox {
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub right: f64,
}

impl LineBox {
    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Same box moved into another coordinate space.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            text: self.text.clone(),
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
        }
    }
}

pub type LineBoxes = SmallVec<[LineBox; 4]>;

/// Group per-glyph rects into line boxes.
///
/// Glyphs without a box (collapsed whitespace) join the current line if they
/// are whitespace and are dropped otherwise. A glyph whose half-pixel-snapped
/// top differs from the current line's top by more than a pixel opens a line.
pub fn group_line_boxes<I>(glyphs: I) -> LineBoxes
where
    I: IntoIterator<Item = (char, Option<GlyphRect>)>,
{
    let mut lines = LineBoxes::new();
    for (ch, rect) in glyphs {
        let rect = match rect.filter(|r| !r.is_empty()) {
            Some(r) => r,
            None => {
                if ch.is_whitespace() {
                    if let Some(line) = lines.last_mut() {
                        line.text.push(ch);
                    }
                }
                continue;
            }
        };
        let snapped = (rect.top * 2.0).round() / 2.0;
        match lines.last_mut() {
            Some(line) if (snapped - line.top).abs() <= LINE_TOP_TOLERANCE => {
                line.left = line.left.min(rect.left);
                line.right = line.right.max(rect.right);
                line.text.push(ch);
            }
            _ => lines.push(LineBox {
                text: ch.to_string(),
                left: rect.left,
                top: rect.top,
                right: rect.right,
            }),
        }
    }
    lines
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Layout of one text run relative to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSnapshot {
    pub font: FontDescriptor,
    /// Computed CSS color of the element, if any.
    pub color: Option<String>,
    pub letter_spacing: Option<f32>,
    /// Empty when the run has no text node; `bounds` is used instead.
    pub lines: LineBoxes,
    pub bounds: TextBounds,
}

impl TextSnapshot {
    pub fn at(bounds: TextBounds, font: FontDescriptor) -> Self {
        Self {
            font,
            color: None,
            letter_spacing: None,
            lines: LineBoxes::new(),
            bounds,
        }
    }
}

pub trait TextLayoutSource {
    /// `None` when the element for `role` is absent.
    fn snapshot(&self, role: TextRole) -> Option<TextSnapshot>;
}

/// Fixed layout for targets without a DOM.
#[derive(Clone, Debug, Default)]
pub struct StaticTextLayout {
    runs: Vec<(TextRole, TextSnapshot)>,
}

impl StaticTextLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: TextRole, snapshot: TextSnapshot) -> Self {
        self.runs.retain(|(r, _)| *r != role);
        self.runs.push((role, snapshot));
        self
    }
}

impl TextLayoutSource for StaticTextLayout {
    fn snapshot(&self, role: TextRole) -> Option<TextSnapshot> {
        self.runs
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, s)| s.clone())
    }
}

/// Draw `text` with `spacing` extra pixels after every glyph.
pub fn draw_spaced_text<S: DrawSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    spacing: f32,
) {
    if text.is_empty() {
        return;
    }
    let spacing = if spacing.is_finite() { spacing } else { 0.0 };
    if spacing.abs() < MIN_LETTER_SPACING {
        surface.fill_text(text, x, y);
        return;
    }
    let mut cursor = x;
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let glyph = ch.encode_utf8(&mut buf);
        surface.fill_text(glyph, cursor, y);
        cursor += surface.measure_text(glyph) + spacing;
    }
}
