//! Paint model.
//!
//! Geometry is filled with a single uniform color per draw; there are no
//! gradients or per-vertex colors.

mod color;

pub use color::Color;
