use crate::buffer::VertexBuffer;
use crate::context::Gl;
use crate::error::GlResult;
use crate::handle::{allocate, Bindable, ContextObject, ObjectKind};
use crate::layout::VertexLayout;
use gl::types::*;

// vertex array: remembers which buffers feed which attribute slots, and the element buffer

pub struct VertexArray {
    handle: ContextObject,
    /// Next free attribute slot.
    next_attribute: GLuint,
}

impl_bindable!(VertexArray => VertexArray);

impl VertexArray {
    pub fn new(gl: &Gl) -> GlResult<VertexArray> {
        let handle = allocate(gl, ObjectKind::VertexArray, |gl| gl.gen_vertex_array())?;
        Ok(VertexArray {
            handle,
            next_attribute: 0,
        })
    }

    /// Registers the attributes of `layout`, sourced from `buffer`, on this vertex array.
    ///
    /// Attributes take consecutive slots following those registered by earlier calls. Once
    /// registered, the array keeps reading from `buffer` without it being bound again.
    /// Leaves this array and `buffer` bound.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexLayout) {
        self.bind();
        buffer.bind();

        let gl = &self.handle.gl;
        let stride = layout.stride() as GLsizei;
        for (attribute, offset) in layout.offsets() {
            let index = self.next_attribute;
            gl.enable_vertex_attrib_array(index);
            gl.vertex_attrib_pointer(
                index,
                attribute.count as GLint,
                attribute.ty.gl_type(),
                attribute.normalized,
                stride,
                offset,
            );
            self.next_attribute += 1;
        }

        tracing::trace!(
            vao = self.handle.obj,
            vbo = buffer.raw(),
            attributes = layout.attributes().len(),
            stride,
            "add_buffer"
        );
    }

    /// Number of attribute slots registered so far.
    pub fn attribute_count(&self) -> u32 {
        self.next_attribute
    }
}
