use super::{Detection, DetectedFace, FaceDetector};
use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Annotations {
    #[serde(default)]
    faces: Vec<DetectedFace>,
}

/// Detector backed by faces found ahead of time, for instance by an
/// external engine that wrote them to a JSON document:
///
/// ```json
/// { "faces": [ { "bounds": { "x": 10, "y": 20, "width": 120, "height": 140 },
///                "smiling": 0.8, "left_eye_open": 0.9, "right_eye_open": 0.1 } ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationDetector {
    annotations: Annotations,
}

impl AnnotationDetector {
    pub fn from_faces(faces: Detection) -> Self {
        Self {
            annotations: Annotations { faces },
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let annotations: Annotations =
            serde_json::from_str(json).context("Failed to parse face annotations")?;
        Ok(Self { annotations })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read face annotations {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn faces(&self) -> &[DetectedFace] {
        &self.annotations.faces
    }
}

impl FaceDetector for AnnotationDetector {
    fn detect(&mut self, img: &RgbaImage) -> Result<Detection> {
        let (w, h) = img.dimensions();
        for face in self.annotations.faces.iter() {
            let b = face.bounds;
            if b.x >= w as f32 || b.y >= h as f32 || b.x + b.w <= 0. || b.y + b.h <= 0. {
                warn!("Annotated face {b:?} lies outside the {w}x{h} image");
            }
        }

        debug!("Returning {} annotated faces", self.annotations.faces.len());
        Ok(self.annotations.faces.clone())
    }
}
