//! Core engine-facing contracts.
//!
//! This module defines the interface between the host runtime (window,
//! surface, event loop) and the renderer it drives. Renderers only ever see
//! a `Driver`, never the window or the wgpu device.

mod app;

pub use app::{AppControl, SurfaceRenderer};
