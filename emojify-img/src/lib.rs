pub mod config;
pub mod emoji;
pub mod expression;
pub mod manipulation;
pub mod pipeline;
pub mod shapes;
