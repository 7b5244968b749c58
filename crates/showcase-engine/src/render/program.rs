//! Shader program construction.
//!
//! A program is built once: both stages are compiled, linked, and the
//! locations the flat-color draw path needs are resolved and cached. Compile
//! and link status are checked immediately so a broken shader never turns
//! into silent no-op rendering.

use std::fmt;

use crate::driver::{
    AttribLocation, Driver, ProgramHandle, ShaderHandle, ShaderStage, UniformLocation,
};

/// Combined transform uniform (`mat4`).
pub const MVP_UNIFORM: &str = "uMVPMatrix";
/// Fill color uniform (`vec4`).
pub const COLOR_UNIFORM: &str = "vColor";
/// Object-space position attribute (`vec3`).
pub const POSITION_ATTRIB: &str = "vPosition";

pub const FLAT_COLOR_VERTEX_SRC: &str = include_str!("shaders/flat_color.vert.wgsl");
pub const FLAT_COLOR_FRAGMENT_SRC: &str = include_str!("shaders/flat_color.frag.wgsl");

/// Failure while building a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// A stage failed to compile; `log` is the compiler output.
    Compile { stage: ShaderStage, log: String },
    /// Both stages compiled but linking failed.
    Link { log: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Compile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {log}")
            }
            ProgramError::Link { log } => write!(f, "program failed to link: {log}"),
        }
    }
}

impl std::error::Error for ProgramError {}

/// Compiles a single stage.
pub fn compile(
    driver: &mut dyn Driver,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle, ProgramError> {
    driver
        .compile_shader(stage, source)
        .map_err(|log| ProgramError::Compile { stage, log })
}

/// Links a compiled vertex/fragment pair.
pub fn link(
    driver: &mut dyn Driver,
    vertex: ShaderHandle,
    fragment: ShaderHandle,
) -> Result<ProgramHandle, ProgramError> {
    driver
        .link_program(vertex, fragment)
        .map_err(|log| ProgramError::Link { log })
}

/// Locations resolved once after linking.
///
/// `None` means the name did not resolve; draw code skips calls that would
/// target it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgramLocations {
    pub mvp: Option<UniformLocation>,
    pub color: Option<UniformLocation>,
    pub position: Option<AttribLocation>,
}

/// A linked program plus its cached locations.
#[derive(Debug, Copy, Clone)]
pub struct ShaderProgram {
    handle: ProgramHandle,
    locations: ProgramLocations,
}

impl ShaderProgram {
    /// Compiles, links and resolves locations.
    pub fn build(
        driver: &mut dyn Driver,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ProgramError> {
        let vertex = compile(driver, ShaderStage::Vertex, vertex_src)?;
        let fragment = compile(driver, ShaderStage::Fragment, fragment_src)?;
        let handle = link(driver, vertex, fragment)?;

        let locations = ProgramLocations {
            mvp: resolve_uniform(driver, handle, MVP_UNIFORM),
            color: resolve_uniform(driver, handle, COLOR_UNIFORM),
            position: resolve_attrib(driver, handle, POSITION_ATTRIB),
        };

        log::debug!("built program {handle:?}: {locations:?}");
        Ok(Self { handle, locations })
    }

    /// The pass-through program every shape uses: `uMVPMatrix * vPosition`,
    /// filled with `vColor`.
    pub fn flat_color(driver: &mut dyn Driver) -> Result<Self, ProgramError> {
        Self::build(driver, FLAT_COLOR_VERTEX_SRC, FLAT_COLOR_FRAGMENT_SRC)
    }

    #[inline]
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    #[inline]
    pub fn locations(&self) -> &ProgramLocations {
        &self.locations
    }
}

// An unresolved name is a programming error: fatal in debug builds, logged
// and ignored in release builds.

fn resolve_uniform(
    driver: &dyn Driver,
    program: ProgramHandle,
    name: &str,
) -> Option<UniformLocation> {
    let location = driver.uniform_location(program, name);
    if location.is_none() {
        log::warn!("uniform `{name}` not found in program {program:?}");
    }
    debug_assert!(location.is_some(), "uniform `{name}` not found in program {program:?}");
    location
}

fn resolve_attrib(
    driver: &dyn Driver,
    program: ProgramHandle,
    name: &str,
) -> Option<AttribLocation> {
    let location = driver.attrib_location(program, name);
    if location.is_none() {
        log::warn!("attribute `{name}` not found in program {program:?}");
    }
    debug_assert!(location.is_some(), "attribute `{name}` not found in program {program:?}");
    location
}
