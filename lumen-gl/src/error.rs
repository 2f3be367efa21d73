use crate::handle::ObjectKind;
use crate::shader::ShaderStage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the driver could not allocate a {0:?} object")]
    AllocationFailure(ObjectKind),
    #[error("failed to compile {stage} shader: {log}")]
    CompileFailure { stage: ShaderStage, log: String },
    #[error("failed to link program: {0}")]
    LinkFailure(String),
    #[error("could not read shader source `{}`", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no active uniform named `{0}`")]
    UniformNotFound(String),
}

pub type GlResult<T> = Result<T, Error>;
