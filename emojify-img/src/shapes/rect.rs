use super::point::PointF32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    // top left
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Bounding box as reported by a face detector. Anchored at the top left
/// corner, may extend past the image edges.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectF32 {
    pub x: f32,
    pub y: f32,
    #[serde(alias = "width")]
    pub w: f32,
    #[serde(alias = "height")]
    pub h: f32,
}

impl From<RectF32> for Rect {
    fn from(r: RectF32) -> Rect {
        Rect {
            x: r.x.max(0.).round() as u32,
            y: r.y.max(0.).round() as u32,
            w: r.w.max(0.).round() as u32,
            h: r.h.max(0.).round() as u32,
        }
    }
}

impl From<Rect> for imageproc::rect::Rect {
    // imageproc adds origin and size as i32, the sum has to stay in range
    fn from(r: Rect) -> imageproc::rect::Rect {
        let max = i32::MAX as u32;
        let x = r.x.min(max - 1);
        let y = r.y.min(max - 1);
        let w = r.w.clamp(1, max - x);
        let h = r.h.clamp(1, max - y);
        imageproc::rect::Rect::at(x as i32, y as i32).of_size(w, h)
    }
}

impl RectF32 {
    pub fn from_tl(x: f32, y: f32, w: f32, h: f32) -> RectF32 {
        RectF32 { x, y, w, h }
    }

    pub fn center(&self) -> PointF32 {
        PointF32 {
            x: self.x + self.w / 2.,
            y: self.y + self.h / 2.,
        }
    }

    pub fn scale(&mut self, scale_x: f32, scale_y: f32) -> RectF32 {
        self.x *= scale_x;
        self.y *= scale_y;
        self.w *= scale_x;
        self.h *= scale_y;

        *self
    }
}

impl Rect {
    pub fn from_tl(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Cuts the rect down to a `width`x`height` image plus a one pixel
    /// margin, so edges past the image stay off it.
    pub fn clip(self, width: u32, height: u32) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Rect {
            x,
            y,
            w: self.w.min((width - x).saturating_add(1)),
            h: self.h.min((height - y).saturating_add(1)),
        }
    }
}
