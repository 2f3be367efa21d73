//! The boundary between the resource wrappers and the OpenGL driver.
//!
//! Every wrapper holds a [`Gl`], a reference-counted [`GraphicsContext`]. `GlContext` forwards to
//! the real driver through the `gl` crate; tests substitute their own implementation.
use crate::uniform::Uniform;
use gl::types::*;
use std::cell::Cell;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

/// Shared handle to the graphics context. `Rc` on purpose: wrappers must stay on the thread that
/// owns the context.
pub type Gl = Rc<dyn GraphicsContext>;

/// The context-wide "currently bound" registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BindingSlot {
    ArrayBuffer,
    ElementArrayBuffer,
    VertexArray,
    Program,
}

impl BindingSlot {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            BindingSlot::ArrayBuffer => 0,
            BindingSlot::ElementArrayBuffer => 1,
            BindingSlot::VertexArray => 2,
            BindingSlot::Program => 3,
        }
    }
}

/// Driver calls needed by the wrappers.
///
/// Object creation functions return 0 when the driver refuses to allocate. Nothing here is
/// thread-safe: a context is only ever used from the thread it is current on.
pub trait GraphicsContext {
    // --- binding registers ---
    fn set_current(&self, slot: BindingSlot, obj: GLuint);
    fn current(&self, slot: BindingSlot) -> GLuint;

    // --- buffers ---
    fn gen_buffer(&self) -> GLuint;
    fn delete_buffer(&self, obj: GLuint);
    /// Uploads `data` to the buffer currently bound at `target`.
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);

    // --- vertex arrays ---
    fn gen_vertex_array(&self) -> GLuint;
    fn delete_vertex_array(&self, obj: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );

    // --- shaders & programs ---
    fn create_shader(&self, stage: GLenum) -> GLuint;
    fn shader_source(&self, obj: GLuint, source: &str);
    /// Compiles the shader and returns the compile status.
    fn compile_shader(&self, obj: GLuint) -> bool;
    fn shader_info_log(&self, obj: GLuint) -> String;
    fn delete_shader(&self, obj: GLuint);
    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// Links the program and returns the link status.
    fn link_program(&self, program: GLuint) -> bool;
    /// Validates the program and returns the validation status.
    fn validate_program(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    // --- uniforms ---
    /// Returns -1 if `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    /// Updates a uniform of the program currently in use.
    fn uniform(&self, location: GLint, value: Uniform<'_>);

    // --- drawing ---
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum);

    /// Pops one pending error code, `None` once the queue is empty.
    fn poll_error(&self) -> Option<GLenum>;
}

/// Pops every pending driver error, logging each one.
pub fn drain_errors(gl: &dyn GraphicsContext) -> Vec<GLenum> {
    let mut errors = Vec::new();
    while let Some(code) = gl.poll_error() {
        tracing::error!("OpenGL error 0x{:04X}", code);
        errors.push(code);
    }
    errors
}

//--------------------------------------------------------------------------------------------------

/// The real driver.
///
/// The `gl` crate functions must be loaded (see [`GlContext::load_with`]) with a current context
/// before any wrapper is created.
pub struct GlContext {
    bindings: [Cell<GLuint>; BindingSlot::COUNT],
}

impl GlContext {
    /// Loads the OpenGL entry points with `loader` and returns a context handle.
    pub fn load_with<F>(loader: F) -> Gl
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Rc::new(GlContext {
            bindings: Default::default(),
        })
    }

    /// Re-reads the element buffer binding, which is part of the vertex array state.
    fn refresh_element_buffer(&self) {
        let mut element_buffer: GLint = 0;
        unsafe { gl::GetIntegerv(gl::ELEMENT_ARRAY_BUFFER_BINDING, &mut element_buffer) };
        self.bindings[BindingSlot::ElementArrayBuffer.index()].set(element_buffer as GLuint);
    }

    /// Driver version string of the current context, if available.
    pub fn version() -> Option<String> {
        unsafe {
            let s = gl::GetString(gl::VERSION);
            if s.is_null() {
                None
            } else {
                Some(
                    std::ffi::CStr::from_ptr(s as *const _)
                        .to_string_lossy()
                        .into_owned(),
                )
            }
        }
    }
}

fn info_log(len: GLint, fetch: impl FnOnce(GLint, *mut GLint, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }
    let mut log_size = len;
    let mut log_buf: Vec<u8> = vec![0; len as usize];
    fetch(len, &mut log_size as *mut GLint, log_buf.as_mut_ptr() as *mut GLchar);
    log_buf.truncate(log_size.max(0) as usize);
    String::from_utf8_lossy(&log_buf).into_owned()
}

impl GraphicsContext for GlContext {
    fn set_current(&self, slot: BindingSlot, obj: GLuint) {
        unsafe {
            match slot {
                BindingSlot::ArrayBuffer => gl::BindBuffer(gl::ARRAY_BUFFER, obj),
                BindingSlot::ElementArrayBuffer => gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, obj),
                BindingSlot::VertexArray => gl::BindVertexArray(obj),
                BindingSlot::Program => gl::UseProgram(obj),
            }
        }
        self.bindings[slot.index()].set(obj);

        if slot == BindingSlot::VertexArray {
            self.refresh_element_buffer();
        }
    }

    fn current(&self, slot: BindingSlot) -> GLuint {
        self.bindings[slot.index()].get()
    }

    fn gen_buffer(&self) -> GLuint {
        let mut obj = 0;
        unsafe { gl::GenBuffers(1, &mut obj) };
        obj
    }

    fn delete_buffer(&self, obj: GLuint) {
        unsafe { gl::DeleteBuffers(1, &obj) };
        // deleting a bound buffer reverts its binding to zero
        for slot in &[BindingSlot::ArrayBuffer, BindingSlot::ElementArrayBuffer] {
            if self.bindings[slot.index()].get() == obj {
                self.bindings[slot.index()].set(0);
            }
        }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe {
            gl::BufferData(
                target,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                usage,
            )
        }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut obj = 0;
        unsafe { gl::GenVertexArrays(1, &mut obj) };
        obj
    }

    fn delete_vertex_array(&self, obj: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &obj) };
        let reg = &self.bindings[BindingSlot::VertexArray.index()];
        if reg.get() == obj {
            reg.set(0);
            self.refresh_element_buffer();
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        let normalized = if normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::VertexAttribPointer(index, size, ty, normalized, stride, offset as *const c_void)
        }
    }

    fn create_shader(&self, stage: GLenum) -> GLuint {
        unsafe { gl::CreateShader(stage) }
    }

    fn shader_source(&self, obj: GLuint, source: &str) {
        let srcs = [source.as_ptr() as *const GLchar];
        let lens = [source.len() as GLint];
        unsafe { gl::ShaderSource(obj, 1, srcs.as_ptr(), lens.as_ptr()) }
    }

    fn compile_shader(&self, obj: GLuint) -> bool {
        let mut status: GLint = 0;
        unsafe {
            gl::CompileShader(obj);
            gl::GetShaderiv(obj, gl::COMPILE_STATUS, &mut status);
        }
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, obj: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetShaderiv(obj, gl::INFO_LOG_LENGTH, &mut len) };
        info_log(len, |len, out_len, buf| unsafe {
            gl::GetShaderInfoLog(obj, len, out_len, buf)
        })
    }

    fn delete_shader(&self, obj: GLuint) {
        unsafe { gl::DeleteShader(obj) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) -> bool {
        let mut status: GLint = 0;
        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        }
        status == gl::TRUE as GLint
    }

    fn validate_program(&self, program: GLuint) -> bool {
        let mut status: GLint = 0;
        unsafe {
            gl::ValidateProgram(program);
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut status);
        }
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        info_log(len, |len, out_len, buf| unsafe {
            gl::GetProgramInfoLog(program, len, out_len, buf)
        })
    }

    fn delete_program(&self, program: GLuint) {
        // a deleted program stays in use until another one is installed, so the register is kept
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match std::ffi::CString::new(name) {
            Ok(name) => unsafe { gl::GetUniformLocation(program, name.as_ptr()) },
            // a name with an interior nul can't name a uniform
            Err(_) => -1,
        }
    }

    fn uniform(&self, location: GLint, value: Uniform<'_>) {
        unsafe {
            match value {
                Uniform::U1i(v) => gl::Uniform1i(location, v),
                Uniform::U1f(v) => gl::Uniform1f(location, v),
                Uniform::U4f([v0, v1, v2, v3]) => gl::Uniform4f(location, v0, v1, v2, v3),
                Uniform::UMatrix4fv(m) => gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr()),
            }
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum) {
        unsafe { gl::DrawElements(mode, count, index_type, ptr::null()) }
    }

    fn poll_error(&self) -> Option<GLenum> {
        match unsafe { gl::GetError() } {
            gl::NO_ERROR => None,
            code => Some(code),
        }
    }
}
