use anyhow::Result;

use crate::coords::Viewport;
use crate::driver::Driver;
use crate::time::FrameTime;

/// Control directive returned by frame callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Renderer contract driven by the host surface.
///
/// The host guarantees the call order `surface_created` → `surface_changed`
/// → `draw_frame`*, with `surface_changed` repeated on every resize. All
/// calls happen on the thread that owns the rendering context.
pub trait SurfaceRenderer {
    /// The rendering context exists; create GPU resources here.
    fn surface_created(&mut self, driver: &mut dyn Driver) -> Result<()>;

    /// The drawable size changed.
    fn surface_changed(&mut self, driver: &mut dyn Driver, viewport: Viewport);

    /// Called once per frame at the host's refresh cadence.
    fn draw_frame(&mut self, driver: &mut dyn Driver, time: FrameTime) -> AppControl;
}
