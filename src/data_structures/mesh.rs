//! Mesh geometry as stored in the container.
//!
//! A [`Mesh`] is a list of [`PrimGroup`]s, one per shader. Attributes are kept as
//! separate streams the way they are stored; [`PrimGroup::vertices`] interleaves them
//! into [`MeshVertex`] records that can be copied straight into a vertex buffer.

/// Interleaved vertex ready for upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    /// RGBA
    pub colour: [u8; 4],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrimitiveType {
    #[default]
    TriangleList,
    TriangleStrip,
    LineList,
    LineStrip,
}

impl PrimitiveType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(PrimitiveType::TriangleList),
            1 => Some(PrimitiveType::TriangleStrip),
            2 => Some(PrimitiveType::LineList),
            3 => Some(PrimitiveType::LineStrip),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimGroup {
    pub shader: String,
    pub primitive: PrimitiveType,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colours: Vec<[u8; 4]>,
    pub indices: Vec<u32>,
}

impl PrimGroup {
    /// Interleaves the attribute streams. Missing attributes default to zero
    /// (white for colours).
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| MeshVertex {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or_default(),
                tex_coords: self.uvs.get(i).copied().unwrap_or_default(),
                colour: self.colours.get(i).copied().unwrap_or([255; 4]),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub prim_groups: Vec<PrimGroup>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.prim_groups.iter().map(|group| group.positions.len()).sum()
    }

    /// Names of all shaders this mesh is drawn with.
    pub fn shaders(&self) -> impl Iterator<Item = &str> {
        self.prim_groups.iter().map(|group| group.shader.as_str())
    }
}
