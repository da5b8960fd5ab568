//! Row-major feature matrix consumed by every classifier.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
