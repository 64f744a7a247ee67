//! ECS components.

pub mod transform;

pub use transform::*;
