//! In-memory `Driver` that records every call.
//!
//! Draws evaluate the pass-through vertex stage on the CPU
//! (`clip = uMVPMatrix * vec4(vPosition, 1)`), so tests can check clip-space
//! output without a GPU.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use glam::{Mat4, Vec4};

use super::{
    AttribLayout, AttribLocation, BufferHandle, Driver, Primitive, ProgramHandle, ShaderHandle,
    ShaderStage, UniformLocation, Vertex,
};
use crate::paint::Color;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CompileShader(ShaderStage),
    LinkProgram(ShaderHandle, ShaderHandle),
    CreateVertexBuffer(usize),
    CreateIndexBuffer(usize),
    AttribLocation(String),
    UniformLocation(String),
    SetClearColor(Color),
    SetViewport(u32, u32),
    Clear,
    UseProgram(ProgramHandle),
    UniformMatrix4(UniformLocation, Mat4),
    Uniform4(UniformLocation, [f32; 4]),
    VertexAttribPointer(AttribLocation, AttribLayout, BufferHandle),
    EnableAttrib(AttribLocation),
    DisableAttrib(AttribLocation),
    DrawIndexed(Draw),
}

/// A recorded draw with the state it observed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draw {
    pub primitive: Primitive,
    pub count: u32,
    pub color: [f32; 4],
    pub clip: Vec<Vec4>,
}

enum BufferData {
    Vertices(Vec<Vertex>),
    Indices(Vec<u16>),
}

pub(crate) struct RecordingDriver {
    calls: RefCell<Vec<Call>>,

    pub attributes: Vec<&'static str>,
    pub uniforms: Vec<&'static str>,
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,

    shader_count: u32,
    program_count: u32,
    buffers: Vec<BufferData>,
    matrices: HashMap<u32, Mat4>,
    vectors: HashMap<u32, [f32; 4]>,
    pointers: HashMap<AttribLocation, BufferHandle>,
    enabled: BTreeSet<AttribLocation>,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            attributes: vec!["vPosition"],
            uniforms: vec!["uMVPMatrix", "vColor"],
            fail_compile: None,
            fail_link: false,
            shader_count: 0,
            program_count: 0,
            buffers: Vec::new(),
            matrices: HashMap::new(),
            vectors: HashMap::new(),
            pointers: HashMap::new(),
            enabled: BTreeSet::new(),
        }
    }
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draws(&self) -> Vec<Draw> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::DrawIndexed(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    /// Attribute arrays left enabled after the last call.
    pub fn enabled_attribs(&self) -> Vec<AttribLocation> {
        self.enabled.iter().copied().collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn named(&self, names: &[&str], name: &str) -> Option<u32> {
        names.iter().position(|n| *n == name).map(|i| i as u32)
    }

    fn evaluate(&self, indices: BufferHandle, count: u32) -> Vec<Vec4> {
        let Some(BufferData::Indices(indices)) = self.buffers.get(indices.0 as usize) else {
            return Vec::new();
        };
        let Some(position) = self.named(&self.attributes, "vPosition").map(AttribLocation) else {
            return Vec::new();
        };
        if !self.enabled.contains(&position) {
            return Vec::new();
        }
        let Some(BufferData::Vertices(vertices)) = self
            .pointers
            .get(&position)
            .and_then(|b| self.buffers.get(b.0 as usize))
        else {
            return Vec::new();
        };

        let mvp = self
            .named(&self.uniforms, "uMVPMatrix")
            .and_then(|loc| self.matrices.get(&loc))
            .copied()
            .unwrap_or(Mat4::IDENTITY);

        indices
            .iter()
            .take(count as usize)
            .map(|&i| {
                let [x, y, z] = vertices[i as usize].position;
                mvp * Vec4::new(x, y, z, 1.0)
            })
            .collect()
    }
}

impl Driver for RecordingDriver {
    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        _source: &str,
    ) -> Result<ShaderHandle, String> {
        self.record(Call::CompileShader(stage));
        if self.fail_compile == Some(stage) {
            return Err("0:1: syntax error".to_string());
        }
        self.shader_count += 1;
        Ok(ShaderHandle(self.shader_count))
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String> {
        self.record(Call::LinkProgram(vertex, fragment));
        if self.fail_link {
            return Err("varying mismatch".to_string());
        }
        self.program_count += 1;
        Ok(ProgramHandle(self.program_count))
    }

    fn create_vertex_buffer(&mut self, _label: &str, vertices: &[Vertex]) -> BufferHandle {
        self.record(Call::CreateVertexBuffer(vertices.len()));
        self.buffers.push(BufferData::Vertices(vertices.to_vec()));
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn create_index_buffer(&mut self, _label: &str, indices: &[u16]) -> BufferHandle {
        self.record(Call::CreateIndexBuffer(indices.len()));
        self.buffers.push(BufferData::Indices(indices.to_vec()));
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn attrib_location(&self, _program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        self.record(Call::AttribLocation(name.to_string()));
        self.named(&self.attributes, name).map(AttribLocation)
    }

    fn uniform_location(&self, _program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.record(Call::UniformLocation(name.to_string()));
        self.named(&self.uniforms, name).map(UniformLocation)
    }

    fn set_clear_color(&mut self, color: Color) {
        self.record(Call::SetClearColor(color));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.record(Call::SetViewport(width, height));
    }

    fn clear_color_buffer(&mut self) {
        self.record(Call::Clear);
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        self.matrices.insert(location.0, *value);
        self.record(Call::UniformMatrix4(location, *value));
    }

    fn uniform4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.vectors.insert(location.0, value);
        self.record(Call::Uniform4(location, value));
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        layout: AttribLayout,
        buffer: BufferHandle,
    ) {
        self.pointers.insert(location, buffer);
        self.record(Call::VertexAttribPointer(location, layout, buffer));
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.enabled.insert(location);
        self.record(Call::EnableAttrib(location));
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.enabled.remove(&location);
        self.record(Call::DisableAttrib(location));
    }

    fn draw_indexed(&mut self, primitive: Primitive, indices: BufferHandle, count: u32) {
        let color = self
            .named(&self.uniforms, "vColor")
            .and_then(|loc| self.vectors.get(&loc))
            .copied()
            .unwrap_or([0.0; 4]);
        let clip = self.evaluate(indices, count);
        self.record(Call::DrawIndexed(Draw { primitive, count, color, clip }));
    }
}
