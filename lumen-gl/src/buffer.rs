use crate::context::{BindingSlot, Gl};
use crate::error::GlResult;
use crate::handle::{allocate, ContextObject, ObjectKind};
use bytemuck::Pod;
use gl::types::*;

/// Describes the type of indices contained in an index buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IndexFormat {
    /// 16-bit unsigned integer indices
    U16,
    /// 32-bit unsigned integer indices
    U32,
}

impl IndexFormat {
    pub fn gl_type(self) -> GLenum {
        match self {
            IndexFormat::U16 => gl::UNSIGNED_SHORT,
            IndexFormat::U32 => gl::UNSIGNED_INT,
        }
    }
}

/// Trait implemented by types that can serve as indices.
pub unsafe trait IndexData: Pod {
    const FORMAT: IndexFormat;
}

macro_rules! impl_index_data {
    ($t:ty, $fmt:ident) => {
        unsafe impl IndexData for $t {
            const FORMAT: IndexFormat = IndexFormat::$fmt;
        }
    };
}

impl_index_data!(u16, U16);
impl_index_data!(u32, U32);

/// Allocates a buffer, binds it to `slot` and uploads `data` as static data.
fn create_static_buffer(
    gl: &Gl,
    kind: ObjectKind,
    slot: BindingSlot,
    target: GLenum,
    data: &[u8],
) -> GlResult<ContextObject> {
    let handle = allocate(gl, kind, |gl| gl.gen_buffer())?;
    gl.set_current(slot, handle.obj);
    gl.buffer_data(target, data, gl::STATIC_DRAW);
    Ok(handle)
}

/// Vertex data uploaded once to the GPU.
pub struct VertexBuffer {
    handle: ContextObject,
    size: usize,
}

impl VertexBuffer {
    /// Creates a vertex buffer holding a copy of `data`. The buffer stays bound afterwards.
    pub fn new<T: Pod>(gl: &Gl, data: &[T]) -> GlResult<VertexBuffer> {
        VertexBuffer::from_bytes(gl, bytemuck::cast_slice(data))
    }

    pub fn from_bytes(gl: &Gl, data: &[u8]) -> GlResult<VertexBuffer> {
        let handle = create_static_buffer(
            gl,
            ObjectKind::VertexBuffer,
            BindingSlot::ArrayBuffer,
            gl::ARRAY_BUFFER,
            data,
        )?;
        Ok(VertexBuffer {
            handle,
            size: data.len(),
        })
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl_bindable!(VertexBuffer => ArrayBuffer);

/// Element indices uploaded once to the GPU.
pub struct IndexBuffer {
    handle: ContextObject,
    count: usize,
    format: IndexFormat,
}

impl IndexBuffer {
    /// Creates an index buffer holding a copy of `indices`. The buffer stays bound afterwards,
    /// which also attaches it to the currently bound vertex array.
    pub fn new<I: IndexData>(gl: &Gl, indices: &[I]) -> GlResult<IndexBuffer> {
        let handle = create_static_buffer(
            gl,
            ObjectKind::IndexBuffer,
            BindingSlot::ElementArrayBuffer,
            gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices),
        )?;
        Ok(IndexBuffer {
            handle,
            count: indices.len(),
            format: I::FORMAT,
        })
    }

    /// Number of indices.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// The element type passed to indexed draw calls.
    pub fn index_type(&self) -> GLenum {
        self.format.gl_type()
    }
}

impl_bindable!(IndexBuffer => ElementArrayBuffer);
