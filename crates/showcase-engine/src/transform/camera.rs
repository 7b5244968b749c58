use glam::{Mat4, Vec3};

/// Fixed camera pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Camera {
    #[inline]
    pub const fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// Right-handed look-at (gluLookAt semantics).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }
}

/// Per-frame model motion: a spin about `axis`, then a fixed `translation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Motion {
    pub axis: Vec3,
    pub translation: Vec3,
}

impl Motion {
    /// Spin in place.
    #[inline]
    pub const fn spin(axis: Vec3) -> Self {
        Self { axis, translation: Vec3::ZERO }
    }

    /// Spin about the object's own axis, then move it by `translation`.
    #[inline]
    pub const fn spin_then_translate(axis: Vec3, translation: Vec3) -> Self {
        Self { axis, translation }
    }

    /// `T × R(angle)`. The axis does not need to be unit length; a zero axis
    /// leaves only the translation.
    pub fn model_matrix(&self, angle_degrees: f32) -> Mat4 {
        let translation = Mat4::from_translation(self.translation);
        let axis = self.axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return translation;
        }
        translation * Mat4::from_axis_angle(axis, angle_degrees.to_radians())
    }
}
