use crate::pipeline::DetectedFace;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Probability cutoffs used to turn detector output into discrete face state.
///
/// A face is smiling when its smiling probability is strictly above
/// `smiling`, an eye is closed when its open probability is strictly below
/// `eye_open`. Values exactly at a cutoff count as not smiling / eye open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub smiling: f32,
    pub eye_open: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            smiling: 0.15,
            eye_open: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Smile,
    Frown,
    LeftWink,
    RightWink,
    LeftWinkFrown,
    RightWinkFrown,
    ClosedEyeSmile,
    ClosedEyeFrown,
}

impl Expression {
    pub const ALL: [Expression; 8] = [
        Expression::Smile,
        Expression::Frown,
        Expression::LeftWink,
        Expression::RightWink,
        Expression::LeftWinkFrown,
        Expression::RightWinkFrown,
        Expression::ClosedEyeSmile,
        Expression::ClosedEyeFrown,
    ];

    /// File stem of the emoji asset drawn for this expression.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Expression::Smile => "smile",
            Expression::Frown => "frown",
            Expression::LeftWink => "leftwink",
            Expression::RightWink => "rightwink",
            Expression::LeftWinkFrown => "leftwinkfrown",
            Expression::RightWinkFrown => "rightwinkfrown",
            Expression::ClosedEyeSmile => "closed_smile",
            Expression::ClosedEyeFrown => "closed_frown",
        }
    }

    pub fn is_smiling(&self) -> bool {
        matches!(
            self,
            Expression::Smile
                | Expression::LeftWink
                | Expression::RightWink
                | Expression::ClosedEyeSmile
        )
    }

    pub fn left_eye_closed(&self) -> bool {
        matches!(
            self,
            Expression::LeftWink
                | Expression::LeftWinkFrown
                | Expression::ClosedEyeSmile
                | Expression::ClosedEyeFrown
        )
    }

    pub fn right_eye_closed(&self) -> bool {
        matches!(
            self,
            Expression::RightWink
                | Expression::RightWinkFrown
                | Expression::ClosedEyeSmile
                | Expression::ClosedEyeFrown
        )
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expression::Smile => "smile",
            Expression::Frown => "frown",
            Expression::LeftWink => "left wink",
            Expression::RightWink => "right wink",
            Expression::LeftWinkFrown => "left wink frown",
            Expression::RightWinkFrown => "right wink frown",
            Expression::ClosedEyeSmile => "closed eye smile",
            Expression::ClosedEyeFrown => "closed eye frown",
        };
        write!(f, "{name}")
    }
}

pub fn classify(face: &DetectedFace, thresholds: &Thresholds) -> Expression {
    trace!("smiling: {}", face.smiling);
    trace!("left eye open: {}", face.left_eye_open);
    trace!("right eye open: {}", face.right_eye_open);

    let smiling = face.smiling > thresholds.smiling;
    let l_closed = face.left_eye_open < thresholds.eye_open;
    let r_closed = face.right_eye_open < thresholds.eye_open;

    let expression = if smiling {
        if l_closed && !r_closed {
            Expression::LeftWink
        } else if r_closed && !l_closed {
            Expression::RightWink
        } else if l_closed {
            Expression::ClosedEyeSmile
        } else {
            Expression::Smile
        }
    } else if l_closed && !r_closed {
        Expression::LeftWinkFrown
    } else if r_closed && !l_closed {
        Expression::RightWinkFrown
    } else if l_closed {
        Expression::ClosedEyeFrown
    } else {
        Expression::Frown
    };

    debug!("Classified face as {expression}");
    expression
}
