use glam::{Mat4, Vec4};

use crate::coords::Viewport;

/// Symmetric perspective frustum sized to a viewport's aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub const NEAR: f32 = 3.0;
    pub const FAR: f32 = 7.0;

    /// `left/right = ∓(w/h)`, `bottom/top = ∓1`, fixed near/far planes.
    ///
    /// Returns `None` for a viewport with a zero dimension.
    pub fn from_viewport(viewport: Viewport) -> Option<Self> {
        let ratio = viewport.aspect_ratio()?;
        Some(Self {
            left: -ratio,
            right: ratio,
            bottom: -1.0,
            top: 1.0,
            near: Self::NEAR,
            far: Self::FAR,
        })
    }

    /// GL `glFrustum` matrix: eye space to clip space with depth in `[-w, w]`.
    pub fn matrix(&self) -> Mat4 {
        let r_width = 1.0 / (self.right - self.left);
        let r_height = 1.0 / (self.top - self.bottom);
        let r_depth = 1.0 / (self.near - self.far);

        let x = 2.0 * self.near * r_width;
        let y = 2.0 * self.near * r_height;
        let a = (self.right + self.left) * r_width;
        let b = (self.top + self.bottom) * r_height;
        let c = (self.far + self.near) * r_depth;
        let d = 2.0 * self.far * self.near * r_depth;

        Mat4::from_cols(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(a, b, c, -1.0),
            Vec4::new(0.0, 0.0, d, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn frustum(w: u32, h: u32) -> Frustum {
        Frustum::from_viewport(Viewport::new(w, h)).unwrap()
    }

    fn ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn bounds_for_800_by_400() {
        let f = frustum(800, 400);
        assert_eq!(
            (f.left, f.right, f.bottom, f.top, f.near, f.far),
            (-2.0, 2.0, -1.0, 1.0, 3.0, 7.0)
        );
    }

    #[test]
    fn bounds_follow_aspect_ratio() {
        for (w, h) in [(1, 1), (1080, 2340), (2340, 1080), (640, 480), (3, 7)] {
            let f = frustum(w, h);
            let r = w as f32 / h as f32;
            assert_eq!((f.left, f.right), (-r, r), "{w}x{h}");
            assert_eq!((f.bottom, f.top), (-1.0, 1.0), "{w}x{h}");
            assert_eq!((f.near, f.far), (3.0, 7.0), "{w}x{h}");
        }
    }

    #[test]
    fn zero_sized_viewport_has_no_frustum() {
        assert!(Frustum::from_viewport(Viewport::new(800, 0)).is_none());
        assert!(Frustum::from_viewport(Viewport::new(0, 400)).is_none());
    }

    #[test]
    fn matrix_matches_gl_frustum_entries() {
        let m = frustum(800, 400).matrix();
        assert_eq!(m.x_axis, Vec4::new(1.5, 0.0, 0.0, 0.0));
        assert_eq!(m.y_axis, Vec4::new(0.0, 3.0, 0.0, 0.0));
        assert_eq!(m.z_axis, Vec4::new(0.0, 0.0, -2.5, -1.0));
        assert_eq!(m.w_axis, Vec4::new(0.0, 0.0, -10.5, 0.0));
    }

    #[test]
    fn near_and_far_corners_map_to_ndc_cube_corners() {
        let m = frustum(800, 400).matrix();
        assert_eq!(ndc(m, Vec3::new(2.0, 1.0, -3.0)), Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(ndc(m, Vec3::new(-2.0, -1.0, -3.0)), Vec3::new(-1.0, -1.0, -1.0));

        let far = ndc(m, Vec3::new(2.0 * 7.0 / 3.0, 7.0 / 3.0, -7.0));
        assert!((far - Vec3::ONE).abs().max_element() < 1e-5, "{far}");
    }
}
