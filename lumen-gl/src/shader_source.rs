//! Splitting of single-file shaders into per-stage sources.
//!
//! A shader file holds both stages, each introduced by a directive line:
//!
//! ```text
//! #shader vertex
//! #version 330 core
//! ...
//! #shader fragment
//! #version 330 core
//! ...
//! ```
//!
//! Any line containing `#shader` is a directive; `vertex` is checked before `fragment`. Lines that
//! appear before the first directive belong to no stage and are dropped.
use crate::error::{Error, GlResult};
use std::fs;
use std::path::Path;

/// The source text of both stages of a program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Section {
    None,
    Vertex,
    Fragment,
}

const DIRECTIVE: &str = "#shader";

/// Splits `text` into vertex and fragment sources.
pub fn parse(text: &str) -> ShaderSource {
    let mut source = ShaderSource::default();
    let mut section = Section::None;
    let mut dropped = 0usize;

    for line in text.lines() {
        if line.contains(DIRECTIVE) {
            if line.contains("vertex") {
                section = Section::Vertex;
            } else if line.contains("fragment") {
                section = Section::Fragment;
            }
            continue;
        }

        let out = match section {
            Section::Vertex => &mut source.vertex,
            Section::Fragment => &mut source.fragment,
            Section::None => {
                dropped += 1;
                continue;
            }
        };
        out.push_str(line);
        out.push('\n');
    }

    if dropped > 0 {
        tracing::trace!(dropped, "ignored lines before the first #shader directive");
    }

    source
}

/// Reads and splits the shader file at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> GlResult<ShaderSource> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}
