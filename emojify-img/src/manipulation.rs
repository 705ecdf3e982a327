use anyhow::Result;
use image::RgbaImage;
pub use fit::Fit;
pub use overlay::{DEFAULT_SCALE, Overlay};

mod fit;
mod overlay;

/// An image operation. Executing never touches the input, the result is
/// written to a new buffer.
pub trait Executable {
    fn execute(&self, img: &RgbaImage) -> Result<RgbaImage>;
}

#[derive(Debug, Clone)]
pub enum Operation<'a> {
    Fit(Fit),
    Overlay(Overlay<'a>),
}

impl From<Fit> for Operation<'_> {
    fn from(o: Fit) -> Self {
        Operation::Fit(o)
    }
}

impl<'a> From<Overlay<'a>> for Operation<'a> {
    fn from(o: Overlay<'a>) -> Self {
        Operation::Overlay(o)
    }
}

impl Executable for Operation<'_> {
    fn execute(&self, img: &RgbaImage) -> Result<RgbaImage> {
        match self {
            Operation::Fit(o) => o.execute(img),
            Operation::Overlay(o) => o.execute(img),
        }
    }
}
