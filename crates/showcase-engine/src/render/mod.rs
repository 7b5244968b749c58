//! Driver-facing rendering: shader programs and the shapes drawn with them.
//!
//! Convention:
//! - geometry is object-space, right-handed, +Y up
//! - the vertex stage outputs GL-style clip space (`uMVPMatrix * vPosition`)

pub mod program;
pub mod shapes;

pub use program::{ProgramError, ProgramLocations, ShaderProgram};
pub use shapes::{Shape, ShapeKind};
