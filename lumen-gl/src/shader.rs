use crate::context::Gl;
use crate::error::{Error, GlResult};
use crate::handle::{allocate, ContextObject, ObjectKind};
use crate::shader_source::{self, ShaderSource};
use crate::uniform::UniformLocationCache;
use gl::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// The two compilation units of a program.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Compiles one stage. The returned object is deleted when dropped.
fn compile_stage(gl: &Gl, stage: ShaderStage, source: &str) -> GlResult<ContextObject> {
    let shader = allocate(gl, ObjectKind::Shader, |gl| gl.create_shader(stage.gl_enum()))?;
    gl.shader_source(shader.obj, source);
    if !gl.compile_shader(shader.obj) {
        let log = gl.shader_info_log(shader.obj);
        tracing::error!(%stage, "failed to compile shader:\n{}", log);
        return Err(Error::CompileFailure { stage, log });
    }
    Ok(shader)
}

/// A linked vertex + fragment program.
///
/// Construction either yields a fully linked program or an error; a stage that fails to compile
/// fails the whole program.
///
/// A program that links but fails validation is still returned: validation depends on the
/// vertex array and other state bound at draw time, so its result is only logged as a warning
/// and never reported as [`Error::LinkFailure`].
pub struct ShaderProgram {
    pub(crate) handle: ContextObject,
    pub(crate) uniforms: UniformLocationCache,
    path: Option<PathBuf>,
}

impl_bindable!(ShaderProgram => Program);

impl ShaderProgram {
    /// Loads, compiles and links the single-file shader at `path`.
    pub fn from_file(gl: &Gl, path: impl AsRef<Path>) -> GlResult<ShaderProgram> {
        let path = path.as_ref();
        let source = shader_source::parse_file(path)?;
        let mut program = ShaderProgram::from_source(gl, &source)?;
        program.path = Some(path.to_path_buf());
        Ok(program)
    }

    /// Compiles both stages of `source` and links them.
    pub fn from_source(gl: &Gl, source: &ShaderSource) -> GlResult<ShaderProgram> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, &source.vertex)?;
        let fragment = compile_stage(gl, ShaderStage::Fragment, &source.fragment)?;

        let program = allocate(gl, ObjectKind::Program, |gl| gl.create_program())?;
        gl.attach_shader(program.obj, vertex.obj);
        gl.attach_shader(program.obj, fragment.obj);

        if !gl.link_program(program.obj) {
            let log = gl.program_info_log(program.obj);
            tracing::error!("failed to link program:\n{}", log);
            return Err(Error::LinkFailure(log));
        }

        // validation depends on the state at draw time, so a failure here is only reported
        if !gl.validate_program(program.obj) {
            tracing::warn!(
                program = program.obj,
                "program validation failed:\n{}",
                gl.program_info_log(program.obj)
            );
        }

        // `vertex` and `fragment` are released here; the program keeps what it needs
        Ok(ShaderProgram {
            handle: program,
            uniforms: UniformLocationCache::new(),
            path: None,
        })
    }

    /// The file this program was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
