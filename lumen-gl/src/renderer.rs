use crate::buffer::IndexBuffer;
use crate::context::Gl;
use crate::handle::Bindable;
use crate::shader::ShaderProgram;
use crate::vertex_array::VertexArray;
use gl::types::GLsizei;

/// Issues draw calls. Holds no state besides the context.
pub struct Renderer {
    gl: Gl,
}

impl Renderer {
    pub fn new(gl: &Gl) -> Renderer {
        Renderer { gl: gl.clone() }
    }

    pub fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    /// Clears the color buffer.
    pub fn clear(&self) {
        self.gl.clear(gl::COLOR_BUFFER_BIT);
    }

    /// Draws the triangles indexed by `index_buffer`, with `program` and the attributes of
    /// `vertex_array`.
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        program: &ShaderProgram,
    ) {
        program.bind();
        vertex_array.bind();
        index_buffer.bind();
        self.gl.draw_elements(
            gl::TRIANGLES,
            index_buffer.count() as GLsizei,
            index_buffer.index_type(),
        );
    }
}
