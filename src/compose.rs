//! Browser implementations of the compositor seams: an off-screen Canvas2D
//! [`DrawSurface`] and a [`TextLayoutSource`] that measures the live hero text.

use crate::dom;
use ripple_core::compose::text::{
    LineBoxes, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_SUBTITLE_SIZE,
};
use ripple_core::compose::{
    group_line_boxes, parse_px, ColorStop, ComposeError, DrawSurface, Fill, FontDescriptor,
    GlyphRect, RadialEllipse, TextBounds, TextLayoutSource, TextRole, TextSnapshot,
};
use ripple_core::{SizingState, SourceImage};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn surface_err(what: &str, e: JsValue) -> ComposeError {
    ComposeError::Surface(format!("{what}: {:?}", e))
}

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    /// Detached canvas with an opaque 2D context.
    pub fn new(document: &web::Document) -> Result<Self, ComposeError> {
        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| surface_err("create canvas", e))?
            .dyn_into()
            .map_err(|_| ComposeError::ContextUnavailable)?;
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::FALSE)
            .map_err(|e| surface_err("context options", e))?;
        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .ok()
            .flatten()
            .ok_or(ComposeError::ContextUnavailable)?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|_| ComposeError::ContextUnavailable)?;
        Ok(Self {
            canvas,
            ctx,
            width: 1,
            height: 1,
        })
    }

    fn gradient_stops(gradient: &web::CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            _ = gradient.add_color_stop(stop.offset, &stop.color.to_css());
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn begin(&mut self, sizing: &SizingState) -> Result<(), ComposeError> {
        let (w, h) = sizing.buffer_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.width = w;
        self.height = h;
        let dpr = sizing.dpr as f64;
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(|e| surface_err("set transform", e))?;
        self.ctx.set_image_smoothing_enabled(true);
        // web-sys has no binding for imageSmoothingQuality; set the property directly.
        let _ = js_sys::Reflect::set(
            &self.ctx,
            &JsValue::from_str("imageSmoothingQuality"),
            &JsValue::from_str("high"),
        );
        self.ctx
            .clear_rect(0.0, 0.0, sizing.width as f64, sizing.height as f64);
        self.ctx.set_text_baseline("top");
        self.ctx.set_text_align("left");
        Ok(())
    }

    fn fill_vertical_gradient(&mut self, width: f32, height: f32, stops: &[ColorStop]) {
        let g = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, height as f64);
        Self::gradient_stops(&g, stops);
        self.ctx.set_fill_style_canvas_gradient(&g);
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_radial_ellipse(&mut self, e: &RadialEllipse) {
        let ry = e.ry as f64;
        self.ctx.save();
        _ = self.ctx.translate(e.cx as f64, e.cy as f64);
        _ = self.ctx.scale(e.rx as f64 / ry.max(1.0), 1.0);
        if let Ok(g) = self.ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, ry.max(0.0)) {
            Self::gradient_stops(&g, e.stops);
            self.ctx.set_fill_style_canvas_gradient(&g);
            self.ctx.begin_path();
            _ = self.ctx.arc(0.0, 0.0, ry.max(0.0), 0.0, TAU);
            self.ctx.fill();
        }
        self.ctx.restore();
    }

    fn set_font(&mut self, css_font: &str) {
        self.ctx.set_font(css_font);
    }

    fn set_fill(&mut self, fill: &Fill) {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(color),
            Fill::Horizontal { x0, x1, y, from, to } => {
                let g = self
                    .ctx
                    .create_linear_gradient(*x0 as f64, *y as f64, *x1 as f64, *y as f64);
                _ = g.add_color_stop(0.0, from);
                _ = g.add_color_stop(1.0, to);
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
        }
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

    fn finish(&mut self) -> Result<SourceImage, ComposeError> {
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, self.width as f64, self.height as f64)
            .map_err(|e| surface_err("read back", e))?;
        Ok(SourceImage::new(data.width(), data.height(), data.data().0)?)
    }
}

/// Reads font, color and per-line glyph boxes of the hero text from the DOM.
pub struct DomTextLayout {
    canvas: web::HtmlCanvasElement,
    kicker: Option<web::HtmlElement>,
    subtitle: Option<web::HtmlElement>,
}

impl DomTextLayout {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        kicker: Option<web::HtmlElement>,
        subtitle: Option<web::HtmlElement>,
    ) -> Self {
        Self {
            canvas,
            kicker,
            subtitle,
        }
    }

    fn element(&self, role: TextRole) -> Option<web::Element> {
        match role {
            TextRole::KickerPrefix => self.kicker.clone().map(Into::into),
            TextRole::KickerHighlight => self
                .kicker
                .as_ref()
                .and_then(|k| k.query_selector("span").ok().flatten()),
            TextRole::Subtitle => self.subtitle.clone().map(Into::into),
        }
    }

    fn fallback_family(&self) -> String {
        self.kicker
            .as_ref()
            .and_then(|k| dom::computed_style(k))
            .map(|s| dom::style_value(&s, "font-family"))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string())
    }
}

fn first_text_node(el: &web::Element) -> Option<web::Node> {
    let children = el.child_nodes();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .find(|n| n.node_type() == web::Node::TEXT_NODE)
}

/// Measure each character of a text node and group the boxes into lines.
fn line_boxes(node: &web::Node) -> LineBoxes {
    let text = node.text_content().unwrap_or_default();
    if text.is_empty() {
        return LineBoxes::new();
    }
    let range = match dom::window_document().and_then(|d| d.create_range().ok()) {
        Some(r) => r,
        None => return LineBoxes::new(),
    };
    let mut offset = 0u32;
    let glyphs: Vec<(char, Option<GlyphRect>)> = text
        .chars()
        .map(|ch| {
            let end = offset + ch.len_utf16() as u32;
            let rect = match (range.set_start(node, offset), range.set_end(node, end)) {
                (Ok(()), Ok(())) => {
                    let r = range.get_bounding_client_rect();
                    Some(GlyphRect {
                        left: r.left(),
                        top: r.top(),
                        right: r.right(),
                        bottom: r.bottom(),
                    })
                }
                _ => None,
            };
            offset = end;
            (ch, rect)
        })
        .collect();
    range.detach();
    group_line_boxes(glyphs)
}

impl TextLayoutSource for DomTextLayout {
    fn snapshot(&self, role: TextRole) -> Option<TextSnapshot> {
        let canvas = self.canvas.get_bounding_client_rect();
        if canvas.width() <= 0.0 {
            return None;
        }
        let el = self.element(role)?;
        let style = dom::computed_style(&el);
        let get = |prop: &str| style.as_ref().map(|s| dom::style_value(s, prop)).unwrap_or_default();

        let (fallback_family, default_size) = match role {
            TextRole::Subtitle => (DEFAULT_FONT_FAMILY.to_string(), DEFAULT_SUBTITLE_SIZE),
            _ => (self.fallback_family(), DEFAULT_FONT_SIZE),
        };
        let font = FontDescriptor::from_computed(
            &get("font-style"),
            &get("font-weight"),
            &get("font-size"),
            &get("font-family"),
            &fallback_family,
            default_size,
        );
        let color = Some(get("color")).filter(|c| !c.is_empty());
        let letter_spacing = match role {
            TextRole::Subtitle => None,
            _ => parse_px(&get("letter-spacing")),
        };

        let (dx, dy) = (-canvas.left(), -canvas.top());
        let lines: LineBoxes = first_text_node(&el)
            .map(|node| line_boxes(&node).iter().map(|l| l.offset(dx, dy)).collect())
            .unwrap_or_default();
        let r = el.get_bounding_client_rect();
        Some(TextSnapshot {
            font,
            color,
            letter_spacing,
            lines,
            bounds: TextBounds {
                left: r.left() + dx,
                top: r.top() + dy,
                width: r.width(),
                height: r.height(),
            },
        })
    }
}
