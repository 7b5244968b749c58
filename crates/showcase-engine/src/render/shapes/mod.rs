//! Geometry objects.
//!
//! Each `ShapeKind` is a fixed set of vertices, a face list drawn as
//! triangles, and optionally an edge list drawn as lines in a second color.
//! A `Shape` owns the GPU side of one kind: its buffers and program.

mod data;

use glam::Mat4;

use crate::driver::{AttribLayout, BufferHandle, Driver, Primitive, Vertex};
use crate::paint::Color;

use super::program::{ProgramError, ShaderProgram};

/// Positions are `f32` for every kind, so none is bound as normalized.
const NORMALIZED_POSITIONS: bool = false;

/// The closed set of drawable shapes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Triangle,
    /// Faces only, one color.
    Pyramid,
    /// Faces plus an outline of its eight edges.
    OutlinedPyramid,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [
        ShapeKind::Triangle,
        ShapeKind::Pyramid,
        ShapeKind::OutlinedPyramid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::OutlinedPyramid => "outlined pyramid",
        }
    }

    pub fn vertices(self) -> &'static [Vertex] {
        match self {
            ShapeKind::Triangle => &data::TRIANGLE_VERTICES,
            ShapeKind::Pyramid | ShapeKind::OutlinedPyramid => &data::PYRAMID_VERTICES,
        }
    }

    /// Index triples.
    pub fn faces(self) -> &'static [u16] {
        match self {
            ShapeKind::Triangle => &data::TRIANGLE_FACES,
            ShapeKind::Pyramid | ShapeKind::OutlinedPyramid => &data::PYRAMID_FACES,
        }
    }

    /// Index pairs, for kinds that draw an outline.
    pub fn edges(self) -> Option<&'static [u16]> {
        match self {
            ShapeKind::OutlinedPyramid => Some(&data::PYRAMID_EDGES),
            ShapeKind::Triangle | ShapeKind::Pyramid => None,
        }
    }

    pub fn fill_color(self) -> Color {
        data::FILL
    }

    pub fn edge_color(self) -> Option<Color> {
        self.edges().map(|_| data::EDGE)
    }
}

/// An index buffer plus the color it is drawn with.
#[derive(Debug, Copy, Clone)]
struct IndexList {
    buffer: BufferHandle,
    count: u32,
    color: Color,
}

/// GPU-resident shape: buffers and program are built once and never mutated.
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    program: ShaderProgram,
    vertices: BufferHandle,
    faces: IndexList,
    edges: Option<IndexList>,
}

impl Shape {
    /// Uploads the geometry of `kind` and builds its program.
    ///
    /// Must run on the thread that owns the rendering context.
    pub fn new(driver: &mut dyn Driver, kind: ShapeKind) -> Result<Self, ProgramError> {
        let label = kind.label();

        let vertices = driver.create_vertex_buffer(label, kind.vertices());
        let faces = IndexList {
            buffer: driver.create_index_buffer(label, kind.faces()),
            count: kind.faces().len() as u32,
            color: kind.fill_color(),
        };
        let edges = match (kind.edges(), kind.edge_color()) {
            (Some(edges), Some(color)) => Some(IndexList {
                buffer: driver.create_index_buffer(label, edges),
                count: edges.len() as u32,
                color,
            }),
            _ => None,
        };

        let program = ShaderProgram::flat_color(driver)?;

        log::debug!(
            "created {label}: {} vertices, {} face indices, {} edge indices",
            kind.vertices().len(),
            faces.count,
            edges.map_or(0, |e| e.count),
        );

        Ok(Self { kind, program, vertices, faces, edges })
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Draws the shape with `mvp` as the combined transform.
    ///
    /// Self-contained: it only assumes a viewport and a cleared framebuffer,
    /// and leaves the position attribute array disabled on return.
    pub fn draw(&self, driver: &mut dyn Driver, mvp: &Mat4) {
        let locations = *self.program.locations();

        driver.use_program(self.program.handle());

        if let Some(mvp_loc) = locations.mvp {
            driver.uniform_matrix4(mvp_loc, mvp);
        }

        if let Some(position) = locations.position {
            let layout = AttribLayout::positions(NORMALIZED_POSITIONS);
            driver.vertex_attrib_pointer(position, layout, self.vertices);
            driver.enable_attrib(position);
        }

        self.draw_list(driver, &self.faces, Primitive::Triangles);
        if let Some(edges) = &self.edges {
            self.draw_list(driver, edges, Primitive::Lines);
        }

        if let Some(position) = locations.position {
            driver.disable_attrib(position);
        }
    }

    fn draw_list(&self, driver: &mut dyn Driver, list: &IndexList, primitive: Primitive) {
        if let Some(color_loc) = self.program.locations().color {
            driver.uniform4(color_loc, list.color.to_array());
        }
        driver.draw_indexed(primitive, list.buffer, list.count);
    }
}
