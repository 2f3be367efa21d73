//! A fake driver that records what the wrappers ask of it.
#![allow(dead_code)]

use lumen_gl::gl;
use lumen_gl::gl::types::*;
use lumen_gl::{BindingSlot, Gl, GraphicsContext, Uniform};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Buffer,
    VertexArray,
    Shader(GLenum),
    Program,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttribPointer {
    pub index: GLuint,
    pub size: GLint,
    pub ty: GLenum,
    pub normalized: bool,
    pub stride: GLsizei,
    pub offset: usize,
    /// Vertex array and array buffer bound when the pointer was set.
    pub vao: GLuint,
    pub vbo: GLuint,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub mode: GLenum,
    pub count: GLsizei,
    pub index_type: GLenum,
    pub program: GLuint,
    pub vao: GLuint,
    pub ibo: GLuint,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    I(i32),
    F(f32),
    F4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BufferUpload {
    pub target: GLenum,
    pub buffer: GLuint,
    pub data: Vec<u8>,
    pub usage: GLenum,
}

#[derive(Debug, Default)]
pub struct State {
    next_id: GLuint,
    pub bindings: HashMap<BindingSlot, GLuint>,
    /// Element buffer recorded in each vertex array (0 when no vertex array is bound).
    pub element_bindings: HashMap<GLuint, GLuint>,
    pub live: HashMap<GLuint, Kind>,
    pub allocations: usize,
    pub releases: usize,
    /// Deletions of objects that were not live (double release, or handle 0).
    pub bad_releases: Vec<GLuint>,
    pub uploads: Vec<BufferUpload>,
    pub enabled_attribs: Vec<GLuint>,
    pub attrib_pointers: Vec<AttribPointer>,
    pub sources: HashMap<GLuint, String>,
    pub attached: Vec<(GLuint, GLuint)>,
    pub linked: Vec<GLuint>,
    /// Uniforms reported as active by every program.
    pub active_uniforms: HashMap<String, GLint>,
    pub uniform_queries: Vec<(GLuint, String)>,
    pub uniform_updates: Vec<(GLint, UniformValue)>,
    pub clears: Vec<GLbitfield>,
    pub draws: Vec<DrawCall>,
    pub pending_errors: Vec<GLenum>,

    // failure injection
    pub fail_allocations: bool,
    pub fail_compile_containing: Option<String>,
    pub fail_link: bool,
    pub fail_validate: bool,
}

#[derive(Debug, Default)]
pub struct RecordingContext {
    pub state: RefCell<State>,
}

impl RecordingContext {
    /// Returns the recorder and the same object as a context handle.
    pub fn new() -> (Rc<RecordingContext>, Gl) {
        let rec = Rc::new(RecordingContext::default());
        let gl: Gl = rec.clone();
        (rec, gl)
    }

    pub fn state(&self) -> std::cell::Ref<State> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<State> {
        self.state.borrow_mut()
    }

    pub fn current_binding(&self, slot: BindingSlot) -> GLuint {
        self.bound(slot)
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    fn alloc(&self, kind: Kind) -> GLuint {
        let mut s = self.state.borrow_mut();
        if s.fail_allocations {
            return 0;
        }
        s.next_id += 1;
        let id = s.next_id;
        s.live.insert(id, kind);
        s.allocations += 1;
        id
    }

    fn release(&self, obj: GLuint) {
        let mut s = self.state.borrow_mut();
        if s.live.remove(&obj).is_some() {
            s.releases += 1;
        } else {
            s.bad_releases.push(obj);
        }
    }

    fn bound(&self, slot: BindingSlot) -> GLuint {
        self.state().bindings.get(&slot).copied().unwrap_or(0)
    }
}

impl GraphicsContext for RecordingContext {
    fn set_current(&self, slot: BindingSlot, obj: GLuint) {
        let mut s = self.state.borrow_mut();
        s.bindings.insert(slot, obj);
        match slot {
            BindingSlot::ElementArrayBuffer => {
                let vao = s.bindings.get(&BindingSlot::VertexArray).copied().unwrap_or(0);
                s.element_bindings.insert(vao, obj);
            }
            BindingSlot::VertexArray => {
                let element = s.element_bindings.get(&obj).copied().unwrap_or(0);
                s.bindings.insert(BindingSlot::ElementArrayBuffer, element);
            }
            _ => {}
        }
    }

    fn current(&self, slot: BindingSlot) -> GLuint {
        self.bound(slot)
    }

    fn gen_buffer(&self) -> GLuint {
        self.alloc(Kind::Buffer)
    }

    fn delete_buffer(&self, obj: GLuint) {
        self.release(obj);
        let mut s = self.state.borrow_mut();
        for slot in &[BindingSlot::ArrayBuffer, BindingSlot::ElementArrayBuffer] {
            if s.bindings.get(slot) == Some(&obj) {
                s.bindings.insert(*slot, 0);
            }
        }
        for element in s.element_bindings.values_mut() {
            if *element == obj {
                *element = 0;
            }
        }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        let slot = if target == gl::ELEMENT_ARRAY_BUFFER {
            BindingSlot::ElementArrayBuffer
        } else {
            BindingSlot::ArrayBuffer
        };
        let buffer = self.bound(slot);
        self.state.borrow_mut().uploads.push(BufferUpload {
            target,
            buffer,
            data: data.to_vec(),
            usage,
        });
    }

    fn gen_vertex_array(&self) -> GLuint {
        self.alloc(Kind::VertexArray)
    }

    fn delete_vertex_array(&self, obj: GLuint) {
        self.release(obj);
        let mut s = self.state.borrow_mut();
        s.element_bindings.remove(&obj);
        if s.bindings.get(&BindingSlot::VertexArray) == Some(&obj) {
            let element = s.element_bindings.get(&0).copied().unwrap_or(0);
            s.bindings.insert(BindingSlot::VertexArray, 0);
            s.bindings.insert(BindingSlot::ElementArrayBuffer, element);
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.state.borrow_mut().enabled_attribs.push(index);
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
        let vao = self.bound(BindingSlot::VertexArray);
        let vbo = self.bound(BindingSlot::ArrayBuffer);
        self.state.borrow_mut().attrib_pointers.push(AttribPointer {
            index,
            size,
            ty,
            normalized,
            stride,
            offset,
            vao,
            vbo,
        });
    }

    fn create_shader(&self, stage: GLenum) -> GLuint {
        self.alloc(Kind::Shader(stage))
    }

    fn shader_source(&self, obj: GLuint, source: &str) {
        self.state.borrow_mut().sources.insert(obj, source.to_owned());
    }

    fn compile_shader(&self, obj: GLuint) -> bool {
        let s = self.state();
        let rejected = match (&s.fail_compile_containing, s.sources.get(&obj)) {
            (Some(marker), Some(source)) => source.contains(marker.as_str()),
            _ => false,
        };
        !rejected
    }

    fn shader_info_log(&self, obj: GLuint) -> String {
        format!("0:1(1): error: shader {} rejected", obj)
    }

    fn delete_shader(&self, obj: GLuint) {
        self.release(obj)
    }

    fn create_program(&self) -> GLuint {
        self.alloc(Kind::Program)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.state.borrow_mut().attached.push((program, shader));
    }

    fn link_program(&self, program: GLuint) -> bool {
        let mut s = self.state.borrow_mut();
        s.linked.push(program);
        !s.fail_link
    }

    fn validate_program(&self, _program: GLuint) -> bool {
        !self.state().fail_validate
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        "error: undefined reference to main".to_owned()
    }

    fn delete_program(&self, program: GLuint) {
        self.release(program)
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let mut s = self.state.borrow_mut();
        s.uniform_queries.push((program, name.to_owned()));
        s.active_uniforms.get(name).copied().unwrap_or(-1)
    }

    fn uniform(&self, location: GLint, value: Uniform<'_>) {
        let value = match value {
            Uniform::U1i(v) => UniformValue::I(v),
            Uniform::U1f(v) => UniformValue::F(v),
            Uniform::U4f(v) => UniformValue::F4(v),
            Uniform::UMatrix4fv(m) => UniformValue::Mat4(*m),
        };
        self.state.borrow_mut().uniform_updates.push((location, value));
    }

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {}

    fn clear(&self, mask: GLbitfield) {
        self.state.borrow_mut().clears.push(mask);
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum) {
        let call = DrawCall {
            mode,
            count,
            index_type,
            program: self.bound(BindingSlot::Program),
            vao: self.bound(BindingSlot::VertexArray),
            ibo: self.bound(BindingSlot::ElementArrayBuffer),
        };
        self.state.borrow_mut().draws.push(call);
    }

    fn poll_error(&self) -> Option<GLenum> {
        let mut s = self.state.borrow_mut();
        if s.pending_errors.is_empty() {
            None
        } else {
            Some(s.pending_errors.remove(0))
        }
    }
}

pub const BASIC_SHADER: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec4 position;
void main() { gl_Position = position; }
#shader fragment
#version 330 core
layout(location = 0) out vec4 color;
uniform vec4 u_Color;
void main() { color = u_Color; }
";

pub const QUAD_POSITIONS: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];
