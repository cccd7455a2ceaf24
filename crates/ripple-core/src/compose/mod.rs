//! Source image composition: background gradients and hero text drawn into a
//! 2D surface, read back as the texture the ripple pass distorts.

pub mod background;
pub mod text;
pub mod theme;

pub use background::{palette, ColorStop, Palette, RadialEllipse, Rgba};
pub use text::{
    draw_spaced_text, group_line_boxes, parse_px, FontDescriptor, GlyphRect, LineBox,
    StaticTextLayout, TextBounds, TextLayoutSource, TextRole, TextSnapshot,
};
pub use theme::{ThemeColors, ThemeMode};

use crate::renderer::{RenderError, SourceImage};
use crate::sizing::SizingState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("2d drawing context unavailable")]
    ContextUnavailable,
    #[error("surface error: {0}")]
    Surface(String),
    #[error(transparent)]
    Image(#[from] RenderError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(String),
    /// Left-to-right gradient across one line box.
    Horizontal {
        x0: f32,
        x1: f32,
        y: f32,
        from: String,
        to: String,
    },
}

/// 2D drawing backend, logical-pixel coordinates with a top-left origin and
/// text drawn from its top edge.
pub trait DrawSurface {
    /// Resize the backing store to the device-pixel buffer, apply the dpr
    /// transform and clear.
    fn begin(&mut self, sizing: &SizingState) -> Result<(), ComposeError>;
    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[ColorStop]);
    fn fill_radial_ellipse(&mut self, ellipse: &RadialEllipse);
    fn set_font(&mut self, css_font: &str);
    fn set_fill(&mut self, fill: &Fill);
    fn measure_text(&mut self, text: &str) -> f32;
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    /// Read the composite back.
    fn finish(&mut self) -> Result<SourceImage, ComposeError>;
}

/// Fallback strings drawn when the live text nodes cannot be measured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroLabels {
    pub title_prefix: String,
    pub title_highlight: String,
    pub subtitle: String,
}

impl Default for HeroLabels {
    fn default() -> Self {
        Self {
            title_prefix: "Hi, I'm ".into(),
            title_highlight: "Yu Xuan".into(),
            subtitle: String::new(),
        }
    }
}

pub fn draw_background<S: DrawSurface + ?Sized>(surface: &mut S, mode: ThemeMode, w: f32, h: f32) {
    let p = palette(mode);
    surface.fill_vertical_gradient(w, h, p.base);
    for glow in &p.glows {
        surface.fill_radial_ellipse(&glow.resolve(w, h));
    }
}

fn draw_run<S: DrawSurface + ?Sized>(
    surface: &mut S,
    snapshot: &TextSnapshot,
    fallback: &str,
    spacing: f32,
    mut fill_for: impl FnMut(f32, f32, f32) -> Fill,
) {
    if snapshot.lines.is_empty() {
        let b = snapshot.bounds;
        let (x, y) = (b.left as f32, b.top as f32);
        surface.set_fill(&fill_for(x, y, (b.width as f32).max(1.0)));
        draw_spaced_text(surface, fallback, x, y, spacing);
        return;
    }
    for line in &snapshot.lines {
        let (x, y) = (line.left as f32, line.top as f32);
        surface.set_fill(&fill_for(x, y, (line.width() as f32).max(1.0)));
        draw_spaced_text(surface, &line.text, x, y, spacing);
    }
}

/// Draw the complete source image: background, kicker (prefix + gradient
/// highlight) and subtitle.
pub fn compose_source<S, T>(
    surface: &mut S,
    sizing: &SizingState,
    theme: &ThemeColors,
    labels: &HeroLabels,
    layout: &T,
) -> Result<SourceImage, ComposeError>
where
    S: DrawSurface + ?Sized,
    T: TextLayoutSource + ?Sized,
{
    surface.begin(sizing)?;
    let (w, h) = (sizing.width as f32, sizing.height as f32);
    draw_background(surface, theme.mode, w, h);

    if let Some(prefix) = layout.snapshot(TextRole::KickerPrefix) {
        let spacing = prefix.letter_spacing.unwrap_or(0.0);
        let color = theme.primary_text(prefix.color.as_deref());
        surface.set_font(&prefix.font.to_css());
        draw_run(surface, &prefix, &labels.title_prefix, spacing, |_, _, _| {
            Fill::Solid(color.clone())
        });

        if let Some(highlight) = layout.snapshot(TextRole::KickerHighlight) {
            let spacing = highlight.letter_spacing.unwrap_or(spacing);
            surface.set_font(&highlight.font.to_css());
            draw_run(surface, &highlight, &labels.title_highlight, spacing, |x, y, width| {
                Fill::Horizontal {
                    x0: x,
                    x1: x + width,
                    y,
                    from: theme.accent().to_string(),
                    to: theme.accent_alt().to_string(),
                }
            });
        }
    }

    if let Some(subtitle) = layout.snapshot(TextRole::Subtitle) {
        let color = theme.secondary_text(subtitle.color.as_deref());
        let font = FontDescriptor {
            style: None,
            ..subtitle.font.clone()
        };
        surface.set_font(&font.to_css());
        draw_run(surface, &subtitle, &labels.subtitle, 0.0, |_, _, _| {
            Fill::Solid(color.clone())
        });
    }

    let image = surface.finish()?;
    log::debug!("composed source {}x{}", image.width, image.height);
    Ok(image)
}
