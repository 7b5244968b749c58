//! WGSL front end for the wgpu driver.
//!
//! Shaders are parsed and validated with naga when they are compiled, so a
//! broken stage is reported with its diagnostics instead of surfacing later as
//! a pipeline-creation panic. The validated module is then reflected into a
//! [`StageInterface`]: the named uniforms and `@location` inputs/outputs that
//! the GL-style name lookups resolve against.

use std::collections::BTreeSet;
use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::driver::ShaderStage;

/// Bind group every uniform lives in.
pub(crate) const UNIFORM_GROUP: u32 = 0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) enum UniformKind {
    Mat4,
    Vec4,
}

impl UniformKind {
    /// Bytes occupied in a uniform buffer.
    pub(crate) fn size(self) -> u64 {
        match self {
            UniformKind::Mat4 => 64,
            UniformKind::Vec4 => 16,
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformKind::Mat4 => f.write_str("mat4x4<f32>"),
            UniformKind::Vec4 => f.write_str("vec4<f32>"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct UniformSlot {
    pub name: String,
    pub binding: u32,
    pub kind: UniformKind,
}

/// A `@location` entry-point input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct StageInput {
    pub name: String,
    pub location: u32,
    /// `f32` components (1..=4).
    pub components: u32,
}

/// What one compiled stage exposes to linking and location lookups.
#[derive(Debug, Clone)]
pub(crate) struct StageInterface {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub uniforms: Vec<UniformSlot>,
    pub inputs: Vec<StageInput>,
    pub outputs: BTreeSet<u32>,
}

/// Parses, validates and reflects one WGSL stage.
///
/// `Err` is a human readable compile log.
pub(crate) fn compile(stage: ShaderStage, source: &str) -> Result<StageInterface, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| format!("validation failed: {e}"))?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage(stage))
        .ok_or_else(|| format!("no @{stage} entry point"))?;

    let uniforms = uniforms(&module)?;

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_inputs(&module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut inputs)?;
    }

    let mut outputs = BTreeSet::new();
    if let Some(result) = &entry.function.result {
        collect_outputs(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    Ok(StageInterface {
        stage,
        entry_point: entry.name.clone(),
        uniforms,
        inputs,
        outputs,
    })
}

/// Combined interface of a linked vertex + fragment pair.
#[derive(Debug, Clone)]
pub(crate) struct ProgramInterface {
    /// Sorted by binding.
    pub uniforms: Vec<UniformSlot>,
    /// Vertex stage inputs, sorted by location.
    pub attributes: Vec<StageInput>,
}

/// Checks that two stages form a program and merges their interfaces.
///
/// `Err` is a human readable link log.
pub(crate) fn link(
    vertex: &StageInterface,
    fragment: &StageInterface,
    max_uniforms: u32,
) -> Result<ProgramInterface, String> {
    if vertex.stage != ShaderStage::Vertex {
        return Err(format!("expected a vertex shader, got a {} shader", vertex.stage));
    }
    if fragment.stage != ShaderStage::Fragment {
        return Err(format!("expected a fragment shader, got a {} shader", fragment.stage));
    }

    for input in &fragment.inputs {
        if !vertex.outputs.contains(&input.location) {
            return Err(format!(
                "fragment input `{}` at location {} is not written by the vertex shader",
                input.name, input.location
            ));
        }
    }

    let mut uniforms: Vec<UniformSlot> = vertex.uniforms.clone();
    for slot in &fragment.uniforms {
        match uniforms.iter().find(|u| u.binding == slot.binding || u.name == slot.name) {
            Some(existing) if existing == slot => {}
            Some(existing) => {
                return Err(format!(
                    "uniform `{}` ({}, binding {}) conflicts with `{}` ({}, binding {})",
                    slot.name,
                    slot.kind,
                    slot.binding,
                    existing.name,
                    existing.kind,
                    existing.binding
                ));
            }
            None => uniforms.push(slot.clone()),
        }
    }
    uniforms.sort_by_key(|u| u.binding);

    if uniforms.len() as u32 > max_uniforms {
        return Err(format!(
            "{} uniforms exceed the device limit of {max_uniforms}",
            uniforms.len()
        ));
    }

    let mut attributes = vertex.inputs.clone();
    attributes.sort_by_key(|a| a.location);

    Ok(ProgramInterface { uniforms, attributes })
}

// ── private helpers ────────────────────────────────────────────────────────

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

fn vector_len(size: naga::VectorSize) -> u32 {
    match size {
        naga::VectorSize::Bi => 2,
        naga::VectorSize::Tri => 3,
        naga::VectorSize::Quad => 4,
    }
}

fn uniforms(module: &naga::Module) -> Result<Vec<UniformSlot>, String> {
    let mut slots: Vec<UniformSlot> = Vec::new();

    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let name = var.name.clone().unwrap_or_default();
        let Some(binding) = &var.binding else {
            return Err(format!("uniform `{name}` has no binding"));
        };
        if binding.group != UNIFORM_GROUP {
            return Err(format!(
                "uniform `{name}` is in group {}; only group {UNIFORM_GROUP} is supported",
                binding.group
            ));
        }

        let kind = match module.types[var.ty].inner {
            naga::TypeInner::Matrix {
                columns: naga::VectorSize::Quad,
                rows: naga::VectorSize::Quad,
                scalar: naga::Scalar::F32,
            } => UniformKind::Mat4,
            naga::TypeInner::Vector {
                size: naga::VectorSize::Quad,
                scalar: naga::Scalar::F32,
            } => UniformKind::Vec4,
            _ => {
                return Err(format!(
                    "uniform `{name}` has an unsupported type; expected mat4x4<f32> or vec4<f32>"
                ));
            }
        };

        if let Some(other) = slots.iter().find(|s| s.binding == binding.binding) {
            return Err(format!(
                "uniforms `{}` and `{name}` share binding {}",
                other.name, binding.binding
            ));
        }

        slots.push(UniformSlot {
            name,
            binding: binding.binding,
            kind,
        });
    }

    Ok(slots)
}

fn collect_inputs(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<StageInput>,
) -> Result<(), String> {
    let inner = &module.types[ty].inner;

    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            let components = match *inner {
                naga::TypeInner::Scalar(naga::Scalar::F32) => 1,
                naga::TypeInner::Vector {
                    size,
                    scalar: naga::Scalar::F32,
                } => vector_len(size),
                _ => {
                    return Err(format!(
                        "input `{}` at location {location} must be f32 or vecN<f32>",
                        name.unwrap_or("?")
                    ));
                }
            };
            out.push(StageInput {
                name: name.unwrap_or_default().to_string(),
                location: *location,
                components,
            });
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect_inputs(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    )?;
                }
            }
        }
    }

    Ok(())
}

fn collect_outputs(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_outputs(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::program::{FLAT_COLOR_FRAGMENT_SRC, FLAT_COLOR_VERTEX_SRC};

    fn flat_color() -> (StageInterface, StageInterface) {
        (
            compile(ShaderStage::Vertex, FLAT_COLOR_VERTEX_SRC).unwrap(),
            compile(ShaderStage::Fragment, FLAT_COLOR_FRAGMENT_SRC).unwrap(),
        )
    }

    #[test]
    fn flat_color_vertex_stage_is_reflected() {
        let (vs, _) = flat_color();
        assert_eq!(vs.entry_point, "main");
        assert_eq!(
            vs.uniforms,
            vec![UniformSlot { name: "uMVPMatrix".into(), binding: 0, kind: UniformKind::Mat4 }]
        );
        assert_eq!(
            vs.inputs,
            vec![StageInput { name: "vPosition".into(), location: 0, components: 3 }]
        );
        assert!(vs.outputs.is_empty());
    }

    #[test]
    fn flat_color_fragment_stage_is_reflected() {
        let (_, fs) = flat_color();
        assert_eq!(
            fs.uniforms,
            vec![UniformSlot { name: "vColor".into(), binding: 1, kind: UniformKind::Vec4 }]
        );
        assert!(fs.inputs.is_empty());
        assert_eq!(fs.outputs, BTreeSet::from([0]));
    }

    #[test]
    fn flat_color_links_with_both_uniforms() {
        let (vs, fs) = flat_color();
        let program = link(&vs, &fs, 8).unwrap();

        let names: Vec<&str> = program.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["uMVPMatrix", "vColor"]);
        assert_eq!(program.attributes.len(), 1);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = compile(ShaderStage::Vertex, "fn main( {").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn type_errors_are_reported() {
        let src = "@fragment fn main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = compile(ShaderStage::Fragment, src).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn missing_entry_point_for_the_stage_is_an_error() {
        let err = compile(ShaderStage::Vertex, FLAT_COLOR_FRAGMENT_SRC).unwrap_err();
        assert_eq!(err, "no @vertex entry point");
    }

    #[test]
    fn unsupported_uniform_types_are_rejected() {
        let src = "@group(0) @binding(0) var<uniform> scale: vec2<f32>;
            @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(scale, 0.0, 1.0); }";
        let err = compile(ShaderStage::Fragment, src).unwrap_err();
        assert!(err.contains("`scale` has an unsupported type"), "{err}");
    }

    #[test]
    fn uniforms_outside_group_zero_are_rejected() {
        let src = "@group(1) @binding(0) var<uniform> tint: vec4<f32>;
            @fragment fn main() -> @location(0) vec4<f32> { return tint; }";
        let err = compile(ShaderStage::Fragment, src).unwrap_err();
        assert!(err.contains("group 1"), "{err}");
    }

    #[test]
    fn stages_must_be_passed_in_order() {
        let (vs, fs) = flat_color();
        let err = link(&fs, &vs, 8).unwrap_err();
        assert_eq!(err, "expected a vertex shader, got a fragment shader");
    }

    #[test]
    fn conflicting_uniform_declarations_fail_to_link() {
        let (vs, _) = flat_color();
        let src = "@group(0) @binding(0) var<uniform> vColor: vec4<f32>;
            @fragment fn main() -> @location(0) vec4<f32> { return vColor; }";
        let fs = compile(ShaderStage::Fragment, src).unwrap();

        let err = link(&vs, &fs, 8).unwrap_err();
        assert!(err.contains("conflicts with `uMVPMatrix`"), "{err}");
    }

    #[test]
    fn unwritten_varyings_fail_to_link() {
        let (vs, _) = flat_color();
        let src = "@fragment fn main(@location(2) shade: vec4<f32>) -> @location(0) vec4<f32> {
                return shade;
            }";
        let fs = compile(ShaderStage::Fragment, src).unwrap();

        let err = link(&vs, &fs, 8).unwrap_err();
        assert!(err.contains("`shade` at location 2"), "{err}");
    }

    #[test]
    fn uniform_count_is_bounded_by_the_device() {
        let (vs, fs) = flat_color();
        let err = link(&vs, &fs, 1).unwrap_err();
        assert_eq!(err, "2 uniforms exceed the device limit of 1");
    }
}
