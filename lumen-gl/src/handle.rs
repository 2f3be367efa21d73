use crate::context::{BindingSlot, Gl};
use gl::types::GLuint;

/// The kinds of driver objects owned by the wrappers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    VertexBuffer,
    IndexBuffer,
    VertexArray,
    Shader,
    Program,
}

/// Exclusive owner of one driver object.
///
/// Released when dropped. A zero handle is never released.
pub struct ContextObject {
    pub gl: Gl,
    pub obj: GLuint,
    kind: ObjectKind,
}

impl ContextObject {
    /// Takes ownership of `obj`.
    ///
    /// # Safety
    /// `obj` must be a live object of the given kind that nothing else will delete.
    pub unsafe fn from_raw(gl: &Gl, kind: ObjectKind, obj: GLuint) -> ContextObject {
        ContextObject {
            gl: gl.clone(),
            obj,
            kind,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
}

impl Drop for ContextObject {
    fn drop(&mut self) {
        if self.obj == 0 {
            return;
        }
        tracing::trace!(obj = self.obj, kind = ?self.kind, "delete");
        match self.kind {
            ObjectKind::VertexBuffer | ObjectKind::IndexBuffer => self.gl.delete_buffer(self.obj),
            ObjectKind::VertexArray => self.gl.delete_vertex_array(self.obj),
            ObjectKind::Shader => self.gl.delete_shader(self.obj),
            ObjectKind::Program => self.gl.delete_program(self.obj),
        }
        self.obj = 0;
    }
}

/// Objects that can be made current on their binding slot.
pub trait Bindable {
    fn context(&self) -> &Gl;
    fn raw(&self) -> GLuint;
    fn slot(&self) -> BindingSlot;

    /// Makes this object current for subsequent layout and draw calls.
    fn bind(&self) {
        self.context().set_current(self.slot(), self.raw());
    }

    /// Clears the binding slot if this object is the one bound to it.
    fn unbind(&self) {
        let gl = self.context();
        let slot = self.slot();
        if self.raw() != 0 && gl.current(slot) == self.raw() {
            gl.set_current(slot, 0);
        }
    }

    /// Returns whether this object holds a live driver handle.
    fn is_valid(&self) -> bool {
        self.raw() != 0
    }

    fn is_bound(&self) -> bool {
        self.is_valid() && self.context().current(self.slot()) == self.raw()
    }
}

/// Implements `Bindable` for a wrapper holding its `ContextObject` in a field named `handle`.
macro_rules! impl_bindable {
    ($name:ident => $slot:ident) => {
        impl $crate::handle::Bindable for $name {
            fn context(&self) -> &$crate::context::Gl {
                &self.handle.gl
            }
            fn raw(&self) -> gl::types::GLuint {
                self.handle.obj
            }
            fn slot(&self) -> $crate::context::BindingSlot {
                $crate::context::BindingSlot::$slot
            }
        }
    };
}

/// Allocates one object with `gen` and wraps it, failing if the driver hands back 0.
pub(crate) fn allocate(
    gl: &Gl,
    kind: ObjectKind,
    gen: impl FnOnce(&Gl) -> GLuint,
) -> crate::GlResult<ContextObject> {
    let obj = gen(gl);
    if obj == 0 {
        tracing::error!(?kind, "allocation failed");
        return Err(crate::Error::AllocationFailure(kind));
    }
    tracing::trace!(obj, ?kind, "allocate");
    // SAFETY: freshly allocated, owned by nobody else
    Ok(unsafe { ContextObject::from_raw(gl, kind, obj) })
}
