//! Showcase engine crate.
//!
//! Renders a single animated flat-colour primitive (a triangle or a pyramid)
//! through a small GL-style driver contract, with wgpu underneath.
//!
//! - [`driver`]: the immediate-mode GPU contract the scene code talks to
//! - [`render`]: shader programs and geometry objects built on that contract
//! - [`transform`]: projection, camera and model motion
//! - [`scene`]: scene presets and the per-frame driver
//! - [`device`] / [`window`]: wgpu device, surface and the winit host loop

pub mod core;
pub mod coords;
pub mod device;
pub mod driver;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;
pub mod transform;
pub mod window;
