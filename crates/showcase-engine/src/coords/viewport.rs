/// Drawable size in physical pixels.
///
/// This is what the projection is sized against and what the driver viewport
/// is set to on every surface change.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `width / height`, or `None` when either dimension is zero.
    #[inline]
    pub fn aspect_ratio(self) -> Option<f32> {
        self.is_valid()
            .then(|| self.width as f32 / self.height as f32)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
