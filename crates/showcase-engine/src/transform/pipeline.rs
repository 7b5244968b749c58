use glam::Mat4;

use crate::coords::Viewport;

use super::{Camera, Frustum, Motion};

/// Length of the wrapping uptime window, in milliseconds.
pub const ROTATION_PERIOD_MS: u64 = 4000;

/// Angular velocity of the spin.
pub const DEGREES_PER_MS: f32 = 0.09;

/// Spin angle in degrees for a given uptime.
///
/// `0.09 × (uptime mod 4000)`: 0.09 × 4000 is exactly one turn, so the
/// spin wraps without a visible jump.
pub fn rotation_angle(uptime_ms: u64) -> f32 {
    let t = (uptime_ms % ROTATION_PERIOD_MS) as u32;
    DEGREES_PER_MS * t as f32
}

/// Produces the combined `projection × view × model` transform per frame.
///
/// The view is fixed at construction, the projection is rebuilt on resize,
/// and the model is recomputed from uptime on every call. The result is a
/// pure function of `(uptime, last valid viewport)`.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    camera: Camera,
    motion: Motion,
    view: Mat4,
    projection: Mat4,
    frustum: Option<Frustum>,
}

impl TransformPipeline {
    /// The projection stays identity until the first valid [`resize`](Self::resize).
    pub fn new(camera: Camera, motion: Motion) -> Self {
        Self {
            camera,
            motion,
            view: camera.view_matrix(),
            projection: Mat4::IDENTITY,
            frustum: None,
        }
    }

    /// Rebuilds the projection for a new viewport.
    ///
    /// A viewport with a zero dimension is ignored and the previous projection
    /// is kept. Returns whether the projection changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let Some(frustum) = Frustum::from_viewport(viewport) else {
            log::debug!("ignoring resize to degenerate viewport {viewport:?}");
            return false;
        };

        self.projection = frustum.matrix();
        self.frustum = Some(frustum);
        log::debug!(
            "projection rebuilt for {}x{} (ratio {:.3})",
            viewport.width,
            viewport.height,
            frustum.right,
        );
        true
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Frustum of the last valid resize.
    #[inline]
    pub fn frustum(&self) -> Option<Frustum> {
        self.frustum
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn model(&self, uptime_ms: u64) -> Mat4 {
        self.motion.model_matrix(rotation_angle(uptime_ms))
    }

    /// `projection × view × model`, recomputed in full.
    pub fn combined(&self, uptime_ms: u64) -> Mat4 {
        self.projection * self.view * self.model(uptime_ms)
    }
}
