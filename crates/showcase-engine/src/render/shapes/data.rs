//! Fixed geometry for every shape kind.

use crate::driver::Vertex;
use crate::paint::Color;

/// Android-green fill shared by every shape.
pub(super) const FILL: Color = Color::rgba(0.636_718_75, 0.769_531_25, 0.222_656_25, 1.0);
/// Darker outline for the outlined pyramid.
pub(super) const EDGE: Color = Color::rgba(0.4, 0.5, 0.0, 1.0);

/// Upright triangle around the origin, counter-clockwise.
pub(super) const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(0.0, 0.622_008_46, 0.0), // top
    Vertex::new(-0.5, -0.3, 0.0),        // bottom left
    Vertex::new(0.5, -0.3, 0.0),         // bottom right
];

pub(super) const TRIANGLE_FACES: [u16; 3] = [0, 1, 2];

/// Square-based pyramid standing on the XZ plane, apex on +Y.
pub(super) const PYRAMID_VERTICES: [Vertex; 5] = [
    Vertex::new(0.0, 1.0, 0.0),   // apex
    Vertex::new(-0.5, 0.0, -0.5), // front left
    Vertex::new(-0.5, 0.0, 0.5),  // back left
    Vertex::new(0.5, 0.0, -0.5),  // front right
    Vertex::new(0.5, 0.0, 0.5),   // back right
];

pub(super) const PYRAMID_FACES: [u16; 18] = [
    0, 1, 3, // front
    0, 1, 2, // left
    0, 2, 3, // back
    0, 3, 4, // right
    1, 2, 3, // base, first half
    2, 3, 4, // base, second half
];

pub(super) const PYRAMID_EDGES: [u16; 16] = [
    0, 1, //
    0, 2, //
    0, 3, //
    0, 4, //
    1, 2, //
    1, 3, //
    2, 4, //
    3, 4, //
];
