//! Ownership and bind/unbind lifecycle for OpenGL buffers, vertex arrays and shader programs.
//!
//! All wrappers go through a [`GraphicsContext`], which is either the real driver
//! ([`GlContext`]) or a substitute. Wrappers are not `Send`: everything happens on the thread that
//! owns the context.

#[macro_use]
mod handle;
pub mod buffer;
pub mod context;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod shader;
pub mod shader_source;
pub mod uniform;
pub mod vertex_array;

pub use crate::buffer::{IndexBuffer, IndexData, IndexFormat, VertexBuffer};
pub use crate::context::{drain_errors, BindingSlot, Gl, GlContext, GraphicsContext};
pub use crate::error::{Error, GlResult};
pub use crate::handle::{Bindable, ContextObject, ObjectKind};
pub use crate::layout::{ComponentType, VertexAttribute, VertexLayout};
pub use crate::renderer::Renderer;
pub use crate::shader::{ShaderProgram, ShaderStage};
pub use crate::shader_source::ShaderSource;
pub use crate::uniform::{Uniform, UniformLocationCache};
pub use crate::vertex_array::VertexArray;

pub use gl;
