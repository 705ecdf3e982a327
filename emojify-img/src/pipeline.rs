use anyhow::Result;
use image::{Rgba, RgbaImage};
use imageproc::drawing;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{Level, debug, info, span, warn};

use crate::config::EmojifyConfig;
use crate::emoji::EmojiSet;
use crate::expression::{self, Expression};
use crate::manipulation::{Executable, Fit, Operation, Overlay};
use crate::shapes::rect::{Rect, RectF32};
pub use annotations::AnnotationDetector;

mod annotations;

/// One face as reported by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub bounds: RectF32,
    pub smiling: f32,
    pub left_eye_open: f32,
    pub right_eye_open: f32,
}

pub type Detection = Vec<DetectedFace>;

/// Source of faces for an image. Implement this to plug in any detection
/// engine, on device or remote.
pub trait FaceDetector {
    fn detect(&mut self, img: &RgbaImage) -> Result<Detection>;
}

/// Something the caller should tell the user about. None of these are
/// errors, the pipeline still produces an image.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    NoFacesDetected,
    MissingEmoji(Expression),
    FaceTooSmall(RectF32),
    FaceTooLarge(RectF32),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoFacesDetected => write!(f, "No faces detected"),
            Notice::MissingEmoji(e) => write!(f, "No emoji for {e}"),
            Notice::FaceTooSmall(r) => write!(
                f,
                "Face at ({:.0}, {:.0}) is too small for an emoji",
                r.x, r.y
            ),
            Notice::FaceTooLarge(r) => write!(
                f,
                "Face at ({:.0}, {:.0}) is too large for an emoji",
                r.x, r.y
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Emojified {
    pub image: RgbaImage,
    /// Every detected face in output image coordinates, with its expression.
    pub faces: Vec<(DetectedFace, Expression)>,
    pub notices: Vec<Notice>,
}

pub struct Pipeline {
    face_detector: Box<dyn FaceDetector>,
    emojis: EmojiSet,
    config: EmojifyConfig,
}

impl Pipeline {
    pub fn new(
        face_detector: Box<dyn FaceDetector>,
        emojis: EmojiSet,
        config: EmojifyConfig,
    ) -> Pipeline {
        Pipeline {
            face_detector,
            emojis,
            config,
        }
    }

    pub fn run(&mut self, img: &RgbaImage) -> Result<Emojified> {
        let span = span!(Level::DEBUG, "pipeline");
        let _guard = span.enter();

        let detection = self.face_detector.detect(img)?;
        info!("Number of faces detected: {}", detection.len());

        let mut notices = Vec::new();
        let mut faces = Vec::new();
        let mut ops: Vec<Operation> = Vec::new();

        if detection.is_empty() {
            notices.push(Notice::NoFacesDetected);
            return Ok(Emojified {
                image: img.clone(),
                faces,
                notices,
            });
        }

        // Faces are reported against the input, rescale them along with
        // the image.
        let mut ratio = 1.;
        let (mut out_w, mut out_h) = img.dimensions();
        if let Some(max_dimension) = self.config.max_dimension {
            let fit = Fit::new(max_dimension)?;
            ratio = fit.ratio(out_w, out_h);
            (out_w, out_h) = fit.dimensions(out_w, out_h);
            ops.push(fit.into());
        }

        for mut face in detection {
            face.bounds.scale(ratio, ratio);
            let expression = expression::classify(&face, &self.config.thresholds);
            faces.push((face, expression));

            let emoji = match self.emojis.get(expression) {
                Some(emoji) => emoji,
                None => {
                    warn!("No emoji loaded for {expression}, skipping face");
                    notices.push(Notice::MissingEmoji(expression));
                    continue;
                }
            };

            let overlay = Overlay::new(emoji, face.bounds, self.config.emoji_scale);
            let (w, h) = overlay.size();
            if w == 0 || h == 0 {
                warn!("Face {:?} too small to draw on", face.bounds);
                notices.push(Notice::FaceTooSmall(face.bounds));
                continue;
            }

            if !overlay.fits(out_w, out_h) {
                warn!("Face {:?} too large to draw on", face.bounds);
                notices.push(Notice::FaceTooLarge(face.bounds));
                continue;
            }

            debug!("Drawing {expression} over {:?}", face.bounds);
            ops.push(overlay.into());
        }

        let mut image = img.clone();
        for op in ops.iter() {
            image = op.execute(&image)?;
        }

        Ok(Emojified {
            image,
            faces,
            notices,
        })
    }

    /// Runs the pipeline, then outlines every detected face on the result.
    pub fn run_trace(&mut self, img: &RgbaImage) -> Result<Emojified> {
        let mut res = self.run(img)?;
        for (face, expression) in res.faces.iter() {
            debug!("{expression}: {face:?}");
            let outline: imageproc::rect::Rect = Rect::from(face.bounds)
                .clip(res.image.width(), res.image.height())
                .into();
            drawing::draw_hollow_rect_mut(
                &mut res.image,
                outline,
                Rgba([255u8, 0u8, 0u8, 255u8]),
            );
        }

        Ok(res)
    }
}
