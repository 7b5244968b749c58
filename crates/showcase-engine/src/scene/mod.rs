//! Scenes: one shape, one camera, one motion.
//!
//! A `Scene` is a preset; `FrameDriver` is the renderer that animates it.

mod frame_driver;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::render::ShapeKind;
use crate::transform::{Camera, Motion};

pub use frame_driver::FrameDriver;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Scene {
    /// Flat triangle spinning about the view axis.
    #[default]
    Triangle,
    /// Solid pyramid spinning about its vertical axis.
    Pyramid,
    /// Pyramid with its edges outlined in a darker green.
    OutlinedPyramid,
}

impl Scene {
    pub const ALL: [Scene; 3] = [Scene::Triangle, Scene::Pyramid, Scene::OutlinedPyramid];

    /// Name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Scene::Triangle => "triangle",
            Scene::Pyramid => "pyramid",
            Scene::OutlinedPyramid => "pyramid-outline",
        }
    }

    pub fn shape(self) -> ShapeKind {
        match self {
            Scene::Triangle => ShapeKind::Triangle,
            Scene::Pyramid => ShapeKind::Pyramid,
            Scene::OutlinedPyramid => ShapeKind::OutlinedPyramid,
        }
    }

    pub fn camera(self) -> Camera {
        match self {
            Scene::Triangle => Camera::new(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO, Vec3::Y),
            Scene::Pyramid | Scene::OutlinedPyramid => {
                Camera::new(Vec3::new(0.0, 1.5, -6.0), Vec3::ZERO, Vec3::Y)
            }
        }
    }

    pub fn motion(self) -> Motion {
        match self {
            Scene::Triangle => Motion::spin(Vec3::NEG_Z),
            // Centre the unit-high pyramid on the origin so it stays between
            // the near and far planes as it turns.
            Scene::Pyramid | Scene::OutlinedPyramid => {
                Motion::spin_then_translate(Vec3::Y, Vec3::new(0.0, -0.5, 0.0))
            }
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scene name that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScene(pub String);

impl fmt::Display for UnknownScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scene `{}` (expected one of:", self.0)?;
        for scene in Scene::ALL {
            write!(f, " {scene}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for UnknownScene {}

impl FromStr for Scene {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Scene::ALL
            .into_iter()
            .find(|scene| scene.name() == wanted)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}
