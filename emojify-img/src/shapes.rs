pub mod point;
pub mod rect;
