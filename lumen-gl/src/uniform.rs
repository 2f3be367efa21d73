use crate::error::{Error, GlResult};
use crate::shader::ShaderProgram;
use gl::types::GLint;
use std::cell::RefCell;
use std::collections::HashMap;

/// A uniform value, as handed to the driver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Uniform<'a> {
    U1i(i32),
    U1f(f32),
    U4f([f32; 4]),
    /// Column-major 4x4 matrix.
    UMatrix4fv(&'a [f32; 16]),
}

/// Uniform name to location, filled on first query.
///
/// Unknown names are stored as -1 so that they are only ever queried once.
#[derive(Debug, Default)]
pub struct UniformLocationCache {
    locations: RefCell<HashMap<String, GLint>>,
}

impl UniformLocationCache {
    pub fn new() -> UniformLocationCache {
        UniformLocationCache::default()
    }

    /// Returns the cached location of `name`, calling `query` on a miss.
    pub fn get_or_query(&self, name: &str, query: impl FnOnce(&str) -> GLint) -> GLint {
        if let Some(&location) = self.locations.borrow().get(name) {
            return location;
        }
        let location = query(name);
        self.locations.borrow_mut().insert(name.to_owned(), location);
        location
    }

    pub fn get(&self, name: &str) -> Option<GLint> {
        self.locations.borrow().get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Setting uniforms
//
// All setters act on the program currently in use: bind the program first. A name that doesn't
// resolve to an active uniform is reported once and the update is skipped.
impl ShaderProgram {
    /// Location of the uniform `name`, or -1 if there is no such active uniform.
    ///
    /// The driver is queried at most once per name.
    pub fn uniform_location(&self, name: &str) -> GLint {
        let gl = &self.handle.gl;
        let program = self.handle.obj;
        self.uniforms.get_or_query(name, |name| {
            let location = gl.uniform_location(program, name);
            if location == -1 {
                tracing::warn!(program, "uniform `{}` doesn't exist", name);
            }
            location
        })
    }

    /// Like `uniform_location`, but a missing uniform is an error.
    pub fn try_uniform_location(&self, name: &str) -> GlResult<GLint> {
        match self.uniform_location(name) {
            -1 => Err(Error::UniformNotFound(name.to_owned())),
            location => Ok(location),
        }
    }

    /// The uniform locations resolved so far.
    pub fn uniform_cache(&self) -> &UniformLocationCache {
        &self.uniforms
    }

    pub fn set_uniform(&self, name: &str, value: Uniform) {
        let location = self.uniform_location(name);
        if location != -1 {
            self.handle.gl.uniform(location, value);
        }
    }

    pub fn set_uniform_1i(&self, name: &str, v: i32) {
        self.set_uniform(name, Uniform::U1i(v));
    }

    pub fn set_uniform_1f(&self, name: &str, v: f32) {
        self.set_uniform(name, Uniform::U1f(v));
    }

    pub fn set_uniform_4f(&self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) {
        self.set_uniform(name, Uniform::U4f([v0, v1, v2, v3]));
    }

    pub fn set_uniform_mat4f(&self, name: &str, m: &[f32; 16]) {
        self.set_uniform(name, Uniform::UMatrix4fv(m));
    }
}
