//! Graphics driver contract.
//!
//! The core (program builder, shapes, frame driver) talks to the GPU only
//! through [`Driver`]. The contract is deliberately shaped like the handful of
//! GL ES 2.0 entry points a flat-colour renderer needs: shaders are compiled
//! and linked into programs, attributes and uniforms are resolved by name,
//! state is set immediately and indexed draws consume it.
//!
//! The production implementation lives in `device` (`WgpuDriver`).

#[cfg(test)]
pub(crate) mod recording;

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::paint::Color;

/// Compiled (not yet linked) shader stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(pub(crate) u32);

/// Linked vertex + fragment program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(pub(crate) u32);

/// GPU buffer holding vertices or indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub(crate) u32);

/// Vertex attribute slot, as resolved from a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AttribLocation(pub(crate) u32);

/// Uniform slot, valid only for the program it was resolved from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub(crate) u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Primitive assembly for an indexed draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// Index triples.
    Triangles,
    /// Index pairs.
    Lines,
}

/// Object-space vertex position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    /// Floats per vertex.
    pub const COMPONENTS: u32 = 3;

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

/// How an attribute reads its buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribLayout {
    /// Float components per element (1..=4).
    pub components: u32,
    /// Only meaningful for integer data; float data is always read as-is.
    pub normalized: bool,
    /// Byte distance between consecutive elements.
    pub stride: u32,
}

impl AttribLayout {
    /// Tightly packed `vec3<f32>` positions.
    pub const fn positions(normalized: bool) -> Self {
        Self {
            components: Vertex::COMPONENTS,
            normalized,
            stride: std::mem::size_of::<Vertex>() as u32,
        }
    }
}

/// Immediate-mode GPU driver.
///
/// All calls happen on the thread that owns the rendering context. State set
/// through this trait (current program, uniform values, attribute bindings)
/// persists until it is changed, and each draw observes the state current at
/// the time it is issued.
///
/// Lookups return `None` where GL would return location `-1`.
pub trait Driver {
    /// Compiles one shader stage. `Err` carries the compiler diagnostics.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String>;

    /// Links a vertex and a fragment shader. `Err` carries the linker log.
    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String>;

    fn create_vertex_buffer(&mut self, label: &str, vertices: &[Vertex]) -> BufferHandle;

    fn create_index_buffer(&mut self, label: &str, indices: &[u16]) -> BufferHandle;

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation>;

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    fn set_clear_color(&mut self, color: Color);

    /// Sets the drawable region, in physical pixels from the origin.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clears the colour buffer to the current clear colour.
    fn clear_color_buffer(&mut self);

    fn use_program(&mut self, program: ProgramHandle);

    /// Uploads a column-major matrix to a `mat4` uniform of the current program.
    fn uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4);

    /// Uploads a `vec4` uniform of the current program.
    fn uniform4(&mut self, location: UniformLocation, value: [f32; 4]);

    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        layout: AttribLayout,
        buffer: BufferHandle,
    );

    fn enable_attrib(&mut self, location: AttribLocation);

    fn disable_attrib(&mut self, location: AttribLocation);

    /// Draws `count` `u16` indices from `indices` with the current program.
    fn draw_indexed(&mut self, primitive: Primitive, indices: BufferHandle, count: u32);
}
