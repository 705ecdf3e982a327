use super::Executable;
use anyhow::{Error, Result};
use image::RgbaImage;
use image::imageops::{FilterType, resize};
use tracing::debug;

/// Shrinks an image to fit within `max_dimension` on its longest side,
/// preserving aspect ratio. Smaller images pass through untouched.
#[derive(Debug, Clone, Copy)]
pub struct Fit {
    max_dimension: u32,
}

impl Fit {
    pub fn new(max_dimension: u32) -> Result<Self> {
        if max_dimension == 0 {
            return Err(Error::msg("Max dimension must be > 0"));
        }

        Ok(Self { max_dimension })
    }

    /// Factor applied to both axes of a `width`x`height` image.
    pub fn ratio(&self, width: u32, height: u32) -> f32 {
        let longest = width.max(height);
        if longest <= self.max_dimension {
            return 1.;
        }

        self.max_dimension as f32 / longest as f32
    }

    pub fn dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let ratio = self.ratio(width, height);
        if ratio == 1. {
            return (width, height);
        }

        (
            ((width as f32 * ratio).round() as u32).clamp(1, self.max_dimension),
            ((height as f32 * ratio).round() as u32).clamp(1, self.max_dimension),
        )
    }
}

impl Executable for Fit {
    fn execute(&self, img: &RgbaImage) -> Result<RgbaImage> {
        let (w, h) = self.dimensions(img.width(), img.height());
        if (w, h) == img.dimensions() {
            return Ok(img.clone());
        }

        debug!("Resampling {:?} to {w}x{h}", img.dimensions());
        Ok(resize(img, w, h, FilterType::Triangle))
    }
}
