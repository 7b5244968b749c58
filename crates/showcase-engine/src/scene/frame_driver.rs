use anyhow::{Context, Result};
use glam::Mat4;

use crate::coords::Viewport;
use crate::core::{AppControl, SurfaceRenderer};
use crate::driver::Driver;
use crate::paint::Color;
use crate::render::Shape;
use crate::time::FrameTime;
use crate::transform::TransformPipeline;

use super::Scene;

/// Renders one scene: clear, compute the combined transform, draw.
pub struct FrameDriver {
    scene: Scene,
    pipeline: TransformPipeline,
    shape: Option<Shape>,
    clear_color: Color,
    warned_no_shape: bool,
}

impl FrameDriver {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            pipeline: TransformPipeline::new(scene.camera(), scene.motion()),
            shape: None,
            clear_color: Color::BLACK,
            warned_no_shape: false,
        }
    }

    #[inline]
    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    /// `None` until the surface has been created.
    #[inline]
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Combined transform for a given uptime.
    pub fn combined(&self, uptime_ms: u64) -> Mat4 {
        self.pipeline.combined(uptime_ms)
    }
}

impl SurfaceRenderer for FrameDriver {
    fn surface_created(&mut self, driver: &mut dyn Driver) -> Result<()> {
        driver.set_clear_color(self.clear_color);

        let kind = self.scene.shape();
        let shape = Shape::new(driver, kind)
            .with_context(|| format!("failed to build {}", kind.label()))?;
        self.shape = Some(shape);

        log::info!("scene `{}` ready", self.scene);
        Ok(())
    }

    fn surface_changed(&mut self, driver: &mut dyn Driver, viewport: Viewport) {
        driver.set_viewport(viewport.width, viewport.height);
        self.pipeline.resize(viewport);
    }

    fn draw_frame(&mut self, driver: &mut dyn Driver, time: FrameTime) -> AppControl {
        driver.clear_color_buffer();

        let Some(shape) = &self.shape else {
            if !self.warned_no_shape {
                log::warn!("draw_frame before surface_created; only clearing");
                self.warned_no_shape = true;
            }
            return AppControl::Continue;
        };

        let mvp = self.pipeline.combined(time.uptime_ms);
        shape.draw(driver, &mvp);

        AppControl::Continue
    }
}
