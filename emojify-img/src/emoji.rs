use crate::expression::Expression;
use anyhow::{Context, Error, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing;
use imageproc::rect::Rect;
use std::collections::HashMap;
use std::f32::consts::PI;
use std::path::Path;
use tracing::{debug, warn};

const FACE: Rgba<u8> = Rgba([255u8, 204u8, 77u8, 255u8]);
const FEATURE: Rgba<u8> = Rgba([102u8, 69u8, 0u8, 255u8]);

const MIN_SIZE: u32 = 16;
const MAX_SIZE: u32 = 4096;

// Segments per mouth arc
const ARC_STEPS: usize = 32;

/// Emoji image for each expression. An expression without an image is
/// skipped when compositing.
#[derive(Debug, Clone, Default)]
pub struct EmojiSet {
    images: HashMap<Expression, RgbaImage>,
}

impl EmojiSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled emoji, rendered as `size`x`size` RGBA images with a
    /// transparent background.
    pub fn builtin(size: u32) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::msg(format!(
                "Emoji size must be between {MIN_SIZE} and {MAX_SIZE}px, got {size}"
            )));
        }

        let mut set = Self::new();
        for expression in Expression::ALL {
            set.insert(expression, render(expression, size));
        }

        Ok(set)
    }

    /// Loads `<asset_name>.png` for every expression found in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::msg(format!(
                "Emoji directory {} does not exist",
                dir.display()
            )));
        }

        let mut set = Self::new();
        for expression in Expression::ALL {
            let path = dir.join(format!("{}.png", expression.asset_name()));
            if !path.exists() {
                warn!("No emoji asset for {expression} at {}", path.display());
                continue;
            }

            let img = image::open(&path)
                .with_context(|| format!("Failed to load emoji {}", path.display()))?
                .into_rgba8();
            debug!(
                "Loaded {expression} emoji {}x{} from {}",
                img.width(),
                img.height(),
                path.display()
            );
            set.insert(expression, img);
        }

        Ok(set)
    }

    pub fn insert(&mut self, expression: Expression, img: RgbaImage) -> Option<RgbaImage> {
        self.images.insert(expression, img)
    }

    pub fn get(&self, expression: Expression) -> Option<&RgbaImage> {
        self.images.get(&expression)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn render(expression: Expression, size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let s = size as f32;
    let c = (size / 2) as i32;

    drawing::draw_filled_circle_mut(&mut img, (c, c), c - 1, FACE);

    let eye_y = (s * 0.4).round() as i32;
    let l_eye_x = (s * 0.35).round() as i32;
    let r_eye_x = (s * 0.65).round() as i32;
    draw_eye(&mut img, l_eye_x, eye_y, s, expression.left_eye_closed());
    draw_eye(&mut img, r_eye_x, eye_y, s, expression.right_eye_closed());

    draw_mouth(&mut img, s, expression.is_smiling());

    img
}

fn draw_eye(img: &mut RgbaImage, x: i32, y: i32, s: f32, closed: bool) {
    if closed {
        let w = (s / 6.).round() as u32;
        let h = (s / 24.).round().max(1.) as u32;
        let rect = Rect::at(x - w as i32 / 2, y - h as i32 / 2).of_size(w, h);
        drawing::draw_filled_rect_mut(img, rect, FEATURE);
    } else {
        let r = (s / 12.).round().max(1.) as i32;
        drawing::draw_filled_circle_mut(img, (x, y), r, FEATURE);
    }
}

fn draw_mouth(img: &mut RgbaImage, s: f32, smiling: bool) {
    let cx = s / 2.;
    let radius = s * 0.25;
    let thickness = (s / 32.).round().max(1.) as usize;

    // Smiles bow downward from a center above the mouth, frowns upward
    // from a center below it.
    let (cy, dir) = if smiling {
        (s * 0.55, 1.)
    } else {
        (s * 0.9, -1.)
    };

    for t in 0..thickness {
        let r = radius + t as f32;
        let point = |i: usize| {
            let theta = PI * (0.15 + 0.7 * i as f32 / ARC_STEPS as f32);
            (cx - r * theta.cos(), cy + dir * r * theta.sin())
        };

        for i in 0..ARC_STEPS {
            drawing::draw_line_segment_mut(img, point(i), point(i + 1), FEATURE);
        }
    }
}
