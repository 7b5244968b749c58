//! wgpu implementation of [`Driver`].
//!
//! GL draws observe state at the moment they are issued, while wgpu records a
//! render pass and executes it later. The driver bridges the two by recording:
//! every `draw_indexed` snapshots the current program's uniform values into a
//! per-frame uniform arena (addressed with dynamic offsets) together with the
//! bound buffers and viewport. [`WgpuDriver::encode`] then replays the frame
//! into a single render pass.
//!
//! Pipelines are created lazily per (topology, attribute layout) because wgpu
//! bakes both into the pipeline where GL treats them as draw-time state.

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::Gpu;
use super::reflect::{self, ProgramInterface, StageInterface, UniformKind};
use crate::driver::{
    AttribLayout, AttribLocation, BufferHandle, Driver, Primitive, ProgramHandle, ShaderHandle,
    ShaderStage, UniformLocation, Vertex,
};
use crate::paint::Color;

/// Smallest uniform arena allocation.
const MIN_ARENA_SIZE: u64 = 1024;

struct CompiledShader {
    interface: StageInterface,
    module: wgpu::ShaderModule,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    primitive: Primitive,
    /// One vertex buffer per entry, in slot order.
    attribs: Vec<(u32, AttribLayout)>,
}

struct Program {
    interface: ProgramInterface,
    vertex: wgpu::ShaderModule,
    vertex_entry: String,
    fragment: wgpu::ShaderModule,
    fragment_entry: String,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    /// Current value of each uniform, indexed by `UniformLocation`.
    values: Vec<Vec<u8>>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    /// Bind group over the uniform arena, tagged with the arena generation.
    bind_group: Option<(u64, wgpu::BindGroup)>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BufferKind {
    Vertex,
    Index,
}

struct GpuBuffer {
    kind: BufferKind,
    buffer: wgpu::Buffer,
    /// Element count (vertices or indices).
    len: u32,
}

struct DrawCmd {
    program: usize,
    key: PipelineKey,
    vertex_buffers: Vec<usize>,
    indices: usize,
    count: u32,
    offsets: Vec<u32>,
    viewport: Option<(u32, u32)>,
}

/// Per-frame uniform storage addressed with dynamic offsets.
struct UniformArena {
    align: u64,
    staging: Vec<u8>,
    buffer: Option<wgpu::Buffer>,
    /// Bumped whenever `buffer` is reallocated.
    generation: u64,
}

impl UniformArena {
    fn new(align: u64) -> Self {
        Self {
            align: align.max(1),
            staging: Vec::new(),
            buffer: None,
            generation: 0,
        }
    }

    /// Appends one value at the next aligned offset.
    fn push(&mut self, bytes: &[u8]) -> u32 {
        let offset = (self.staging.len() as u64).next_multiple_of(self.align);
        self.staging.resize(offset as usize, 0);
        self.staging.extend_from_slice(bytes);
        offset as u32
    }

    fn reset(&mut self) {
        self.staging.clear();
    }

    /// Grows the GPU buffer if needed and writes the staged values.
    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> (u64, &wgpu::Buffer) {
        let needed = (self.staging.len() as u64).max(MIN_ARENA_SIZE);

        let buffer = match self.buffer.take() {
            Some(buffer) if buffer.size() >= needed => buffer,
            _ => {
                self.generation += 1;
                log::debug!("uniform arena grows to {} bytes", needed.next_power_of_two());
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("showcase uniform arena"),
                    size: needed.next_power_of_two(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            }
        };
        let buffer = &*self.buffer.insert(buffer);

        if !self.staging.is_empty() {
            queue.write_buffer(buffer, 0, &self.staging);
        }
        (self.generation, buffer)
    }
}

/// [`Driver`] backed by a wgpu device.
///
/// Calls record into the driver; nothing reaches the GPU until
/// [`encode`](Self::encode) is called with the frame's target.
pub struct WgpuDriver {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    shaders: Vec<CompiledShader>,
    programs: Vec<Program>,
    buffers: Vec<GpuBuffer>,

    current: Option<usize>,
    pointers: HashMap<u32, (AttribLayout, usize)>,
    enabled: BTreeSet<u32>,
    clear_color: Color,
    viewport: Option<(u32, u32)>,

    clear_pending: bool,
    draws: Vec<DrawCmd>,
    arena: UniformArena,
}

impl WgpuDriver {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        Self {
            device: device.clone(),
            queue: queue.clone(),
            format,
            shaders: Vec::new(),
            programs: Vec::new(),
            buffers: Vec::new(),
            current: None,
            pointers: HashMap::new(),
            enabled: BTreeSet::new(),
            clear_color: Color::BLACK,
            viewport: None,
            clear_pending: false,
            draws: Vec::new(),
            arena: UniformArena::new(align),
        }
    }

    /// Driver rendering into `gpu`'s surface format.
    pub fn for_gpu(gpu: &Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }

    /// Replays the recorded frame into one render pass on `target`.
    ///
    /// The pass clears to the clear colour if a clear was requested, otherwise
    /// it loads the existing contents. Recorded state is consumed.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        target_size: (u32, u32),
    ) {
        let draws = std::mem::take(&mut self.draws);
        let load = if std::mem::take(&mut self.clear_pending) {
            wgpu::LoadOp::Clear(self.clear_color.to_wgpu())
        } else {
            wgpu::LoadOp::Load
        };

        if draws.is_empty() && matches!(load, wgpu::LoadOp::Load) {
            self.arena.reset();
            return;
        }

        let (generation, uniform_buffer) = self.arena.upload(&self.device, &self.queue);
        for draw in &draws {
            ensure_bind_group(
                &self.device,
                &mut self.programs[draw.program],
                uniform_buffer,
                generation,
            );
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("showcase frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for draw in &draws {
            let program = &self.programs[draw.program];
            let (Some(pipeline), Some((_, bind_group))) =
                (program.pipelines.get(&draw.key), program.bind_group.as_ref())
            else {
                continue;
            };
            let Some([x, y, w, h]) = viewport_rect(draw.viewport, target_size) else {
                continue;
            };

            rpass.set_viewport(x, y, w, h, 0.0, 1.0);
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &draw.offsets);
            for (slot, &buffer) in draw.vertex_buffers.iter().enumerate() {
                rpass.set_vertex_buffer(slot as u32, self.buffers[buffer].buffer.slice(..));
            }
            rpass.set_index_buffer(
                self.buffers[draw.indices].buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            rpass.draw_indexed(0..draw.count, 0, 0..1);
        }

        drop(rpass);
        self.arena.reset();
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn create_buffer(
        &mut self,
        label: &str,
        kind: BufferKind,
        contents: &[u8],
        len: usize,
    ) -> BufferHandle {
        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        });

        self.buffers.push(GpuBuffer {
            kind,
            buffer,
            len: len as u32,
        });
        BufferHandle(self.buffers.len() as u32 - 1)
    }

    fn buffer_of(&self, handle: BufferHandle, kind: BufferKind) -> Option<usize> {
        let index = handle.0 as usize;
        self.buffers
            .get(index)
            .filter(|b| b.kind == kind)
            .map(|_| index)
    }

    fn set_uniform(&mut self, location: UniformLocation, kind: UniformKind, bytes: &[u8]) {
        let Some(program) = self.current.and_then(|i| self.programs.get_mut(i)) else {
            log::warn!("uniform upload with no program in use");
            return;
        };
        let index = location.0 as usize;
        let Some(slot) = program.interface.uniforms.get(index) else {
            log::warn!("uniform location {} is not valid for the current program", location.0);
            return;
        };
        if slot.kind != kind {
            log::warn!("uniform `{}` is a {}, not a {kind}", slot.name, slot.kind);
            return;
        }
        program.values[index].copy_from_slice(bytes);
    }
}

impl Driver for WgpuDriver {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        let interface = reflect::compile(stage, source)?;

        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(match stage {
                ShaderStage::Vertex => "showcase vertex shader",
                ShaderStage::Fragment => "showcase fragment shader",
            }),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        self.shaders.push(CompiledShader { interface, module });
        Ok(ShaderHandle(self.shaders.len() as u32 - 1))
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String> {
        let (Some(vs), Some(fs)) = (
            self.shaders.get(vertex.0 as usize),
            self.shaders.get(fragment.0 as usize),
        ) else {
            return Err("unknown shader handle".to_string());
        };

        let max_uniforms = self.device.limits().max_dynamic_uniform_buffers_per_pipeline_layout;
        let interface = reflect::link(&vs.interface, &fs.interface, max_uniforms)?;

        let entries: Vec<wgpu::BindGroupLayoutEntry> = interface
            .uniforms
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(u.kind.size()),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("showcase program bgl"),
                entries: &entries,
            });
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("showcase program layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let values = interface
            .uniforms
            .iter()
            .map(|u| vec![0u8; u.kind.size() as usize])
            .collect();

        self.programs.push(Program {
            vertex: vs.module.clone(),
            vertex_entry: vs.interface.entry_point.clone(),
            fragment: fs.module.clone(),
            fragment_entry: fs.interface.entry_point.clone(),
            interface,
            bind_group_layout,
            pipeline_layout,
            values,
            pipelines: HashMap::new(),
            bind_group: None,
        });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn create_vertex_buffer(&mut self, label: &str, vertices: &[Vertex]) -> BufferHandle {
        self.create_buffer(
            label,
            BufferKind::Vertex,
            bytemuck::cast_slice(vertices),
            vertices.len(),
        )
    }

    fn create_index_buffer(&mut self, label: &str, indices: &[u16]) -> BufferHandle {
        self.create_buffer(label, BufferKind::Index, bytemuck::cast_slice(indices), indices.len())
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        self.programs
            .get(program.0 as usize)?
            .interface
            .attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| AttribLocation(a.location))
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.programs
            .get(program.0 as usize)?
            .interface
            .uniforms
            .iter()
            .position(|u| u.name == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn clear_color_buffer(&mut self) {
        // Everything recorded so far would be overwritten.
        self.draws.clear();
        self.arena.reset();
        self.clear_pending = true;
    }

    fn use_program(&mut self, program: ProgramHandle) {
        let index = program.0 as usize;
        if index < self.programs.len() {
            self.current = Some(index);
        } else {
            log::warn!("use_program with unknown program {program:?}");
            self.current = None;
        }
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        self.set_uniform(location, UniformKind::Mat4, bytemuck::bytes_of(value));
    }

    fn uniform4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.set_uniform(location, UniformKind::Vec4, bytemuck::cast_slice(&value));
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: AttribLocation,
        layout: AttribLayout,
        buffer: BufferHandle,
    ) {
        if !(1..=4).contains(&layout.components) {
            log::warn!(
                "attribute {}: {} components is out of range",
                location.0,
                layout.components
            );
            return;
        }
        let stride = match layout.stride {
            0 => layout.components * 4,
            s => s,
        };
        if stride % 4 != 0 {
            log::warn!("attribute {}: stride {stride} is not 4-byte aligned", location.0);
            return;
        }
        let Some(buffer) = self.buffer_of(buffer, BufferKind::Vertex) else {
            log::warn!("attribute {}: {buffer:?} is not a vertex buffer", location.0);
            return;
        };

        if layout.normalized {
            log::debug!("attribute {}: `normalized` has no effect on float data", location.0);
        }

        let layout = AttribLayout { stride, ..layout };
        self.pointers.insert(location.0, (layout, buffer));
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.enabled.insert(location.0);
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.enabled.remove(&location.0);
    }

    fn draw_indexed(&mut self, primitive: Primitive, indices: BufferHandle, count: u32) {
        if count == 0 {
            return;
        }
        let Some(program_index) = self.current else {
            log::warn!("draw with no program in use");
            return;
        };
        let Some(index_buffer) = self.buffer_of(indices, BufferKind::Index) else {
            log::warn!("draw with {indices:?}, which is not an index buffer");
            return;
        };
        if count > self.buffers[index_buffer].len {
            log::warn!(
                "draw of {count} indices overruns {indices:?} ({} indices)",
                self.buffers[index_buffer].len
            );
            return;
        }

        let program = &self.programs[program_index];
        let mut attribs = Vec::with_capacity(program.interface.attributes.len());
        let mut vertex_buffers = Vec::with_capacity(program.interface.attributes.len());
        for input in &program.interface.attributes {
            let pointer = self
                .enabled
                .contains(&input.location)
                .then(|| self.pointers.get(&input.location))
                .flatten();
            let Some(&(layout, buffer)) = pointer else {
                log::warn!("attribute `{}` is not enabled with a buffer; draw skipped", input.name);
                return;
            };
            attribs.push((input.location, layout));
            vertex_buffers.push(buffer);
        }

        let key = PipelineKey { primitive, attribs };
        let program = &mut self.programs[program_index];
        if !program.pipelines.contains_key(&key) {
            let pipeline = build_pipeline(&self.device, self.format, program, &key);
            program.pipelines.insert(key.clone(), pipeline);
        }

        let offsets = program.values.iter().map(|v| self.arena.push(v)).collect();

        self.draws.push(DrawCmd {
            program: program_index,
            key,
            vertex_buffers,
            indices: index_buffer,
            count,
            offsets,
            viewport: self.viewport,
        });
    }
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

fn topology(primitive: Primitive) -> wgpu::PrimitiveTopology {
    match primitive {
        Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Primitive::Lines => wgpu::PrimitiveTopology::LineList,
    }
}

/// GL viewport (origin bottom-left) to a wgpu viewport (origin top-left),
/// clamped to the target. `None` when nothing would be visible.
fn viewport_rect(viewport: Option<(u32, u32)>, target: (u32, u32)) -> Option<[f32; 4]> {
    let (tw, th) = target;
    let (w, h) = viewport.unwrap_or(target);
    let (w, h) = (w.min(tw), h.min(th));
    if w == 0 || h == 0 {
        return None;
    }
    Some([0.0, (th - h) as f32, w as f32, h as f32])
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    program: &Program,
    key: &PipelineKey,
) -> wgpu::RenderPipeline {
    log::debug!(
        "creating pipeline for {:?} with {} attribute(s)",
        key.primitive,
        key.attribs.len()
    );

    let attributes: Vec<[wgpu::VertexAttribute; 1]> = key
        .attribs
        .iter()
        .map(|&(location, layout)| {
            [wgpu::VertexAttribute {
                format: vertex_format(layout.components),
                offset: 0,
                shader_location: location,
            }]
        })
        .collect();
    let buffers: Vec<wgpu::VertexBufferLayout> = key
        .attribs
        .iter()
        .zip(&attributes)
        .map(|(&(_, layout), attributes)| wgpu::VertexBufferLayout {
            array_stride: layout.stride as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        })
        .collect();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("showcase pipeline"),
        layout: Some(&program.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some(program.vertex_entry.as_str()),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some(program.fragment_entry.as_str()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: topology(key.primitive),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn ensure_bind_group(
    device: &wgpu::Device,
    program: &mut Program,
    uniform_buffer: &wgpu::Buffer,
    generation: u64,
) {
    if matches!(&program.bind_group, Some((g, _)) if *g == generation) {
        return;
    }

    let entries: Vec<wgpu::BindGroupEntry> = program
        .interface
        .uniforms
        .iter()
        .map(|u| wgpu::BindGroupEntry {
            binding: u.binding,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: uniform_buffer,
                offset: 0,
                size: NonZeroU64::new(u.kind.size()),
            }),
        })
        .collect();

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("showcase uniform bind group"),
        layout: &program.bind_group_layout,
        entries: &entries,
    });
    program.bind_group = Some((generation, bind_group));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::program::COLOR_UNIFORM;
    use crate::render::{Shape, ShapeKind};

    const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Driver on any available adapter, `None` on machines without one.
    fn headless_driver() -> Option<WgpuDriver> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("showcase test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .ok()?;

        Some(WgpuDriver::new(&device, &queue, TARGET_FORMAT))
    }

    /// The `vColor` value snapshotted for `draw`.
    fn snapshot_color(driver: &WgpuDriver, draw: &DrawCmd) -> [f32; 4] {
        let index = driver.programs[draw.program]
            .interface
            .uniforms
            .iter()
            .position(|u| u.name == COLOR_UNIFORM)
            .unwrap();
        let offset = draw.offsets[index] as usize;
        bytemuck::pod_read_unaligned(&driver.arena.staging[offset..offset + 16])
    }

    fn outlined_pyramid_frame() -> Option<(WgpuDriver, Shape)> {
        let Some(mut driver) = headless_driver() else {
            eprintln!("no wgpu adapter available; skipping");
            return None;
        };
        driver.set_viewport(64, 64);
        let shape = Shape::new(&mut driver, ShapeKind::OutlinedPyramid).unwrap();
        driver.clear_color_buffer();
        shape.draw(&mut driver, &Mat4::IDENTITY);
        Some((driver, shape))
    }

    #[test]
    fn each_draw_keeps_the_uniforms_set_before_it() {
        let Some((driver, _)) = outlined_pyramid_frame() else {
            return;
        };

        assert_eq!(driver.draws.len(), 2);
        let kind = ShapeKind::OutlinedPyramid;
        assert_eq!(snapshot_color(&driver, &driver.draws[0]), kind.fill_color().to_array());
        assert_eq!(
            snapshot_color(&driver, &driver.draws[1]),
            kind.edge_color().unwrap().to_array()
        );
    }

    #[test]
    fn clear_discards_draws_recorded_earlier_in_the_frame() {
        let Some((mut driver, _)) = outlined_pyramid_frame() else {
            return;
        };

        driver.clear_color_buffer();
        assert!(driver.draws.is_empty());
        assert!(driver.clear_pending);
    }

    #[test]
    fn draw_with_a_disabled_attribute_is_skipped() {
        let Some((mut driver, shape)) = outlined_pyramid_frame() else {
            return;
        };
        driver.clear_color_buffer();

        // `Shape::draw` leaves the position array disabled.
        let indices = driver.create_index_buffer("loose triangle", &[0, 1, 2]);
        driver.use_program(shape.program().handle());
        driver.draw_indexed(Primitive::Triangles, indices, 3);
        assert!(driver.draws.is_empty());
    }

    #[test]
    fn frame_encodes_into_an_offscreen_target() {
        let Some((mut driver, _)) = outlined_pyramid_frame() else {
            return;
        };

        let texture = driver.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = driver
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        driver.encode(&mut encoder, &view, (64, 64));
        driver.queue.submit(Some(encoder.finish()));

        assert!(driver.draws.is_empty());
        assert!(!driver.clear_pending);
        assert!(driver.arena.staging.is_empty());
        assert!(driver.programs.iter().any(|p| p.bind_group.is_some()));
    }

    #[test]
    fn arena_offsets_respect_alignment() {
        let mut arena = UniformArena::new(256);
        assert_eq!(arena.push(&[1; 64]), 0);
        assert_eq!(arena.push(&[2; 16]), 256);
        assert_eq!(arena.push(&[3; 64]), 512);
        assert_eq!(arena.staging.len(), 576);
        assert_eq!(&arena.staging[256..272], &[2; 16]);
    }

    #[test]
    fn arena_reset_starts_over() {
        let mut arena = UniformArena::new(64);
        arena.push(&[0; 64]);
        arena.push(&[0; 16]);
        arena.reset();
        assert_eq!(arena.push(&[0; 16]), 0);
    }

    #[test]
    fn viewport_defaults_to_the_whole_target() {
        assert_eq!(viewport_rect(None, (800, 600)), Some([0.0, 0.0, 800.0, 600.0]));
    }

    #[test]
    fn smaller_viewport_is_anchored_bottom_left() {
        assert_eq!(viewport_rect(Some((400, 200)), (800, 600)), Some([0.0, 400.0, 400.0, 200.0]));
    }

    #[test]
    fn viewport_is_clamped_to_the_target() {
        assert_eq!(viewport_rect(Some((1920, 1080)), (800, 600)), Some([0.0, 0.0, 800.0, 600.0]));
        assert_eq!(viewport_rect(Some((0, 600)), (800, 600)), None);
    }

    #[test]
    fn attribute_widths_map_to_float_formats() {
        assert_eq!(vertex_format(1), wgpu::VertexFormat::Float32);
        assert_eq!(vertex_format(3), wgpu::VertexFormat::Float32x3);
        assert_eq!(vertex_format(4), wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn primitives_map_to_list_topologies() {
        assert_eq!(topology(Primitive::Triangles), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(topology(Primitive::Lines), wgpu::PrimitiveTopology::LineList);
    }
}
