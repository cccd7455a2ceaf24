//! CPU implementation of [`RippleRenderer`].
//!
//! Evaluates the shader reference per pixel into an RGBA8 buffer. Used for
//! non-browser targets and to check the distortion end to end in tests.

use crate::renderer::{RenderError, RippleRenderer, SourceImage};
use crate::shade::shade_pixel;
use crate::uniforms::RippleUniforms;
use glam::{Vec2, Vec3};

pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    source: SourceImage,
    uniforms: RippleUniforms,
    output: Vec<u8>,
    draws: u64,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            source: SourceImage::solid(1, 1, [0, 0, 0, 255]),
            uniforms: RippleUniforms::default(),
            output: vec![0; width as usize * height as usize * 4],
            draws: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Last drawn frame, rows top to bottom.
    #[inline]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    #[inline]
    pub fn uniforms(&self) -> &RippleUniforms {
        &self.uniforms
    }

    #[inline]
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    #[inline]
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn output_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.output[i],
            self.output[i + 1],
            self.output[i + 2],
            self.output[i + 3],
        ]
    }
}

/// Bilinear, edge-clamped sample at a bottom-left-origin coordinate.
fn sample_bilinear(img: &SourceImage, uv: Vec2) -> Vec3 {
    let fx = uv.x * img.width as f32 - 0.5;
    let fy = (1.0 - uv.y) * img.height as f32 - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let max_x = img.width as i64 - 1;
    let max_y = img.height as i64 - 1;
    let texel = |x: f32, y: f32| -> Vec3 {
        let xi = (x as i64).clamp(0, max_x) as u32;
        let yi = (y as i64).clamp(0, max_y) as u32;
        let [r, g, b, _] = img.pixel(xi, yi);
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    };
    let top = texel(x0, y0).lerp(texel(x0 + 1.0, y0), tx);
    let bottom = texel(x0, y0 + 1.0).lerp(texel(x0 + 1.0, y0 + 1.0), tx);
    top.lerp(bottom, ty)
}

impl RippleRenderer for SoftwareRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.output = vec![0; self.width as usize * self.height as usize * 4];
    }

    fn upload_source(&mut self, image: &SourceImage) -> Result<(), RenderError> {
        image.validate()?;
        self.source = image.clone();
        Ok(())
    }

    fn upload_points(&mut self, uniforms: &RippleUniforms) {
        self.uniforms = *uniforms;
    }

    fn draw(&mut self) -> Result<(), RenderError> {
        let (w, h) = (self.width, self.height);
        for py in 0..h {
            for px in 0..w {
                let uv = Vec2::new(
                    (px as f32 + 0.5) / w as f32,
                    1.0 - (py as f32 + 0.5) / h as f32,
                );
                let c = shade_pixel(uv, &self.uniforms, |t| sample_bilinear(&self.source, t));
                let i = (py as usize * w as usize + px as usize) * 4;
                self.output[i] = (c.x.clamp(0.0, 1.0) * 255.0).round() as u8;
                self.output[i + 1] = (c.y.clamp(0.0, 1.0) * 255.0).round() as u8;
                self.output[i + 2] = (c.z.clamp(0.0, 1.0) * 255.0).round() as u8;
                self.output[i + 3] = 255;
            }
        }
        self.draws += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_image() {
        let mut r = SoftwareRenderer::new(4, 4);
        let bad = SourceImage {
            width: 2,
            height: 2,
            rgba: vec![0; 3],
        };
        assert!(matches!(
            r.upload_source(&bad),
            Err(RenderError::ImageSize { expected: 16, .. })
        ));
    }

    #[test]
    fn undistorted_draw_reproduces_source() {
        let mut r = SoftwareRenderer::new(8, 8);
        let mut rgba = Vec::new();
        for y in 0..8u8 {
            for x in 0..8u8 {
                rgba.extend_from_slice(&[x * 30, y * 30, 90, 255]);
            }
        }
        r.upload_source(&SourceImage::new(8, 8, rgba).unwrap()).unwrap();
        r.draw().unwrap();
        // Pixel centers land exactly on texel centers.
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(r.output_pixel(x, y), [x as u8 * 30, y as u8 * 30, 90, 255]);
            }
        }
    }
}
