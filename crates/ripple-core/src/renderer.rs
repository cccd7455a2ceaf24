use crate::uniforms::RippleUniforms;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("source image is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    ImageSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("source image has zero size")]
    EmptyImage,
    #[error("surface error: {0}")]
    Surface(String),
}

/// Composited RGBA8 image, rows top to bottom (canvas `ImageData` order).
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, RenderError> {
        let image = Self {
            width,
            height,
            rgba,
        };
        image.validate()?;
        Ok(image)
    }

    /// Check that the buffer holds exactly `width * height` RGBA pixels.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage);
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(RenderError::ImageSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.rgba.len(),
            });
        }
        Ok(())
    }

    /// Single-color image; the 1x1 black placeholder is bound before the first
    /// composite finishes.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let n = width.max(1) as usize * height.max(1) as usize;
        Self {
            width: width.max(1),
            height: height.max(1),
            rgba: color.repeat(n),
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y.min(self.height - 1) as usize * self.width as usize
            + x.min(self.width - 1) as usize)
            * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

/// Minimal GPU seam: everything the effect needs from a graphics backend.
pub trait RippleRenderer {
    /// Resize the output to the backing buffer size in device pixels.
    fn resize(&mut self, width: u32, height: u32);
    /// Replace the source texture sampled by the distortion pass.
    fn upload_source(&mut self, image: &SourceImage) -> Result<(), RenderError>;
    /// Upload point arrays and per-frame scalars.
    fn upload_points(&mut self, uniforms: &RippleUniforms);
    /// One full-screen draw.
    fn draw(&mut self) -> Result<(), RenderError>;
}
