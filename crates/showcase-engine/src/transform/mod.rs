//! Model/view/projection composition.
//!
//! Matrices are column-major `glam::Mat4` and follow GL conventions
//! (right-handed eye space, clip depth in `[-w, w]`).

mod camera;
mod frustum;
mod pipeline;

pub use camera::{Camera, Motion};
pub use frustum::Frustum;
pub use pipeline::{rotation_angle, TransformPipeline, DEGREES_PER_MS, ROTATION_PERIOD_MS};
