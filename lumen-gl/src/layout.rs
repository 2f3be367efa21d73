use gl::types::GLenum;

/// Scalar type of the components of a vertex attribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComponentType {
    Float,
    UnsignedInt,
    UnsignedByte,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            ComponentType::Float => 4,
            ComponentType::UnsignedInt => 4,
            ComponentType::UnsignedByte => 1,
        }
    }

    pub fn gl_type(self) -> GLenum {
        match self {
            ComponentType::Float => gl::FLOAT,
            ComponentType::UnsignedInt => gl::UNSIGNED_INT,
            ComponentType::UnsignedByte => gl::UNSIGNED_BYTE,
        }
    }

    /// Whether attributes of this type are normalized when no flag is given.
    ///
    /// Bytes are usually colors, read as [0,1] in the shader.
    pub fn normalized_by_default(self) -> bool {
        matches!(self, ComponentType::UnsignedByte)
    }
}

/// One attribute of an interleaved vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    pub ty: ComponentType,
    /// Number of components (1 to 4).
    pub count: u32,
    pub normalized: bool,
}

impl VertexAttribute {
    /// Size of the attribute in bytes.
    pub fn size(&self) -> usize {
        self.count as usize * self.ty.size()
    }
}

/// Describes the layout of interleaved vertex data inside a single vertex buffer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> VertexLayout {
        VertexLayout::default()
    }

    /// Appends an attribute of `count` components, normalized according to the component type.
    ///
    /// # Panics
    /// If `count` is not in `1..=4`.
    pub fn push(&mut self, ty: ComponentType, count: u32) -> &mut Self {
        self.push_normalized(ty, count, ty.normalized_by_default())
    }

    /// Appends an attribute with an explicit normalization flag.
    ///
    /// # Panics
    /// If `count` is not in `1..=4`.
    pub fn push_normalized(&mut self, ty: ComponentType, count: u32, normalized: bool) -> &mut Self {
        assert!(
            (1..=4).contains(&count),
            "vertex attribute component count must be between 1 and 4, got {}",
            count
        );
        let attribute = VertexAttribute {
            ty,
            count,
            normalized,
        };
        self.stride += attribute.size();
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Number of bytes to go to the next vertex.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The attributes in order, paired with their byte offset inside a vertex.
    pub fn offsets(&self) -> impl Iterator<Item = (&VertexAttribute, usize)> + '_ {
        self.attributes.iter().scan(0usize, |offset, attribute| {
            let current = *offset;
            *offset += attribute.size();
            Some((attribute, current))
        })
    }
}
