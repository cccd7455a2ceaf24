//! Procedural hero background: a vertical base gradient plus three soft radial
//! glows, one palette per theme mode.

use super::theme::ThemeMode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

const fn stop(offset: f32, color: Rgba) -> ColorStop {
    ColorStop { offset, color }
}

/// Radial glow squashed into an ellipse. Positions and radii are fractions of
/// the logical canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub stops: &'static [ColorStop],
}

/// Glow resolved to logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialEllipse {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub stops: &'static [ColorStop],
}

impl Glow {
    pub fn resolve(&self, width: f32, height: f32) -> RadialEllipse {
        RadialEllipse {
            cx: width * self.cx,
            cy: height * self.cy,
            rx: width * self.rx,
            ry: height * self.ry,
            stops: self.stops,
        }
    }
}

pub struct Palette {
    pub base: &'static [ColorStop],
    pub glows: [Glow; 3],
}

pub static LIGHT: Palette = Palette {
    base: &[
        stop(0.0, Rgba::rgb(233, 240, 241)),
        stop(0.62, Rgba::rgb(224, 233, 235)),
        stop(1.0, Rgba::rgb(215, 226, 228)),
    ],
    glows: [
        Glow {
            cx: 0.88,
            cy: 0.12,
            rx: 0.55,
            ry: 0.44,
            stops: &[
                stop(0.0, Rgba::rgba(123, 170, 214, 0.2)),
                stop(0.74, Rgba::rgba(123, 170, 214, 0.0)),
            ],
        },
        Glow {
            cx: 0.1,
            cy: 0.1,
            rx: 0.55,
            ry: 0.44,
            stops: &[
                stop(0.0, Rgba::rgba(60, 197, 194, 0.16)),
                stop(0.74, Rgba::rgba(60, 197, 194, 0.0)),
            ],
        },
        Glow {
            cx: 0.5,
            cy: 0.46,
            rx: 0.92,
            ry: 0.6,
            stops: &[
                stop(0.0, Rgba::rgba(160, 202, 232, 0.38)),
                stop(0.34, Rgba::rgba(196, 222, 239, 0.28)),
                stop(0.56, Rgba::rgba(223, 234, 236, 0.14)),
                stop(0.74, Rgba::rgba(223, 234, 236, 0.0)),
            ],
        },
    ],
};

pub static DARK: Palette = Palette {
    base: &[
        stop(0.0, Rgba::rgb(13, 14, 35)),
        stop(0.62, Rgba::rgb(9, 11, 30)),
        stop(1.0, Rgba::rgb(3, 8, 19)),
    ],
    glows: [
        Glow {
            cx: 0.88,
            cy: 0.12,
            rx: 0.55,
            ry: 0.44,
            stops: &[
                stop(0.0, Rgba::rgba(84, 164, 224, 0.14)),
                stop(0.74, Rgba::rgba(84, 164, 224, 0.0)),
            ],
        },
        Glow {
            cx: 0.1,
            cy: 0.1,
            rx: 0.55,
            ry: 0.44,
            stops: &[
                stop(0.0, Rgba::rgba(46, 99, 183, 0.2)),
                stop(0.74, Rgba::rgba(46, 99, 183, 0.0)),
            ],
        },
        Glow {
            cx: 0.5,
            cy: 0.46,
            rx: 0.92,
            ry: 0.6,
            stops: &[
                stop(0.0, Rgba::rgba(126, 89, 212, 0.34)),
                stop(0.34, Rgba::rgba(80, 55, 164, 0.24)),
                stop(0.56, Rgba::rgba(30, 28, 65, 0.1)),
                stop(0.74, Rgba::rgba(6, 12, 26, 0.0)),
            ],
        },
    ],
};

#[inline]
pub fn palette(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_formatting() {
        assert_eq!(Rgba::rgb(3, 8, 19).to_css(), "rgb(3, 8, 19)");
        assert_eq!(Rgba::rgba(46, 99, 183, 0.2).to_css(), "rgba(46, 99, 183, 0.2)");
        assert_eq!(Rgba::rgba(6, 12, 26, 0.0).to_css(), "rgba(6, 12, 26, 0)");
    }

    #[test]
    fn stops_are_ordered() {
        for p in [&LIGHT, &DARK] {
            assert!(p.base.windows(2).all(|w| w[0].offset <= w[1].offset));
            for g in &p.glows {
                assert!(g.stops.windows(2).all(|w| w[0].offset <= w[1].offset));
            }
        }
    }
}
