use super::Executable;
use crate::shapes::point::{Point, PointF32};
use crate::shapes::rect::RectF32;
use anyhow::{Error, Result};
use image::RgbaImage;
use image::imageops::{FilterType, overlay, resize};
use tracing::trace;

pub const DEFAULT_SCALE: f32 = 0.9;

/// Largest emoji drawn, as a multiple of the image it lands on.
pub const MAX_OVERSIZE: u32 = 4;

/// Draws an emoji over a face. The emoji is sized off the face width and
/// sits centered horizontally, a little above the vertical center of the
/// face so the emoji's eyes land near the face's eyes.
#[derive(Debug, Clone)]
pub struct Overlay<'a> {
    emoji: &'a RgbaImage,
    face: RectF32,
    scale: f32,
}

impl<'a> Overlay<'a> {
    pub fn new(emoji: &'a RgbaImage, face: RectF32, scale: f32) -> Self {
        Self { emoji, face, scale }
    }

    /// Size of the emoji once drawn.
    ///
    /// Both axes use integer truncation. The height applies `scale` a second
    /// time on top of the aspect-preserving ratio, so emoji come out
    /// slightly squat.
    pub fn size(&self) -> (u32, u32) {
        let (emoji_w, emoji_h) = self.emoji.dimensions();
        if emoji_w == 0 {
            return (0, 0);
        }

        // Saturates at u32::MAX, the float cast clamps and NaN becomes 0
        let w = (self.face.w * self.scale).max(0.) as u32;
        let h = match (emoji_h as u64).checked_mul(w as u64) {
            Some(area) => ((area / emoji_w as u64) as f32 * self.scale) as u32,
            None => u32::MAX,
        };

        (w, h)
    }

    /// Whether the emoji can be drawn onto a `width`x`height` image without
    /// exceeding `MAX_OVERSIZE` times its size.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        let (w, h) = self.size();
        w <= width.saturating_mul(MAX_OVERSIZE) && h <= height.saturating_mul(MAX_OVERSIZE)
    }

    /// Top left corner of the emoji, may fall outside the image.
    pub fn position(&self) -> Point {
        let (w, h) = self.size();
        let center = self.face.center();

        PointF32::new(center.x - (w / 2) as f32, center.y - (h / 3) as f32).into()
    }
}

impl Executable for Overlay<'_> {
    fn execute(&self, img: &RgbaImage) -> Result<RgbaImage> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Err(Error::msg(format!(
                "Emoji for face {:?} scales to an empty {w}x{h} image",
                self.face
            )));
        }

        if !self.fits(img.width(), img.height()) {
            return Err(Error::msg(format!(
                "Emoji for face {:?} scales to {w}x{h}, too large for a {}x{} image",
                self.face,
                img.width(),
                img.height()
            )));
        }

        let emoji = resize(self.emoji, w, h, FilterType::Nearest);
        let at = self.position();
        trace!("Drawing {w}x{h} emoji at {at:?}");

        let mut out = img.clone();
        overlay(&mut out, &emoji, at.x, at.y);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_size_compounds_scale() {
        let emoji = RgbaImage::new(100, 50);
        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 200., 200.), DEFAULT_SCALE);
        // w = 200 * 0.9, h = 50 * 180 / 100 * 0.9
        assert_eq!(o.size(), (180, 81));
    }

    #[test]
    fn test_size_truncates() {
        let emoji = RgbaImage::new(30, 30);
        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 55., 55.), DEFAULT_SCALE);
        // 49.5 -> 49, 30 * 49 / 30 = 49 -> 44.1 -> 44
        assert_eq!(o.size(), (49, 44));
    }

    #[test]
    fn test_position() {
        let emoji = RgbaImage::new(100, 100);
        let o = Overlay::new(&emoji, RectF32::from_tl(10., 20., 200., 100.), DEFAULT_SCALE);
        let (w, h) = o.size();
        assert_eq!((w, h), (180, 162));
        // x + fw/2 - ew/2, y + fh/2 - eh/3
        assert_eq!(o.position(), Point::new(10 + 100 - 90, 20 + 50 - 54));
    }

    #[test]
    fn test_execute_leaves_input_untouched() {
        let base = RgbaImage::from_pixel(40, 40, BLUE);
        let emoji = RgbaImage::from_pixel(10, 10, RED);
        let o = Overlay::new(&emoji, RectF32::from_tl(10., 10., 20., 20.), 1.);

        let out = o.execute(&base).unwrap();
        assert_eq!(base, RgbaImage::from_pixel(40, 40, BLUE));

        // 20x20 emoji centered on x, a third of its height above center on y
        assert_eq!(o.size(), (20, 20));
        assert_eq!(o.position(), Point::new(10, 14));
        assert_eq!(*out.get_pixel(10, 14), RED);
        assert_eq!(*out.get_pixel(29, 33), RED);
        assert_eq!(*out.get_pixel(10, 13), BLUE);
        assert_eq!(*out.get_pixel(30, 34), BLUE);
    }

    #[test]
    fn test_transparent_emoji_pixels_keep_background() {
        let base = RgbaImage::from_pixel(20, 20, BLUE);
        let mut emoji = RgbaImage::from_pixel(10, 10, RED);
        emoji.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 10., 15.), 1.);

        let out = o.execute(&base).unwrap();
        // position: (5 - 5, 7.5 - 3) -> (0, 5) after rounding 4.5
        let at = o.position();
        assert_eq!(at.x, 0);
        assert_eq!(*out.get_pixel(0, at.y as u32), BLUE);
        assert_eq!(*out.get_pixel(1, at.y as u32), RED);
    }

    #[test]
    fn test_clips_at_image_edges() {
        let base = RgbaImage::from_pixel(20, 20, BLUE);
        let emoji = RgbaImage::from_pixel(10, 10, RED);
        let o = Overlay::new(&emoji, RectF32::from_tl(-10., -10., 20., 20.), 1.);
        assert_eq!(o.position(), Point::new(-10, -6));

        let out = o.execute(&base).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(9, 13), RED);
        assert_eq!(*out.get_pixel(10, 0), BLUE);
        assert_eq!(*out.get_pixel(0, 14), BLUE);
    }

    #[test]
    fn test_tiny_face_is_rejected() {
        let base = RgbaImage::new(20, 20);
        let emoji = RgbaImage::new(10, 10);
        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 1., 1.), DEFAULT_SCALE);
        assert_eq!(o.size(), (0, 0));
        assert!(o.execute(&base).is_err());
    }

    #[test]
    fn test_huge_face_is_rejected() {
        let base = RgbaImage::new(1000, 1000);
        let emoji = RgbaImage::new(256, 256);

        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 1e20, 1e20), DEFAULT_SCALE);
        let (w, h) = o.size();
        assert_eq!(w, u32::MAX);
        assert!(h > 0);
        assert!(!o.fits(1000, 1000));
        assert!(o.execute(&base).is_err());

        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 1e6, 1e6), DEFAULT_SCALE);
        assert!(!o.fits(1000, 1000));
        assert!(o.execute(&base).is_err());

        // Up to four times the image still draws
        let o = Overlay::new(&emoji, RectF32::from_tl(0., 0., 4000., 4000.), DEFAULT_SCALE);
        assert!(o.fits(1000, 1000));
    }
}
