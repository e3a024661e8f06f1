//! Chunked container primitives.
//!
//! A P3D container is a header-less list of chunks. Each chunk is
//! `[tag: u32][payload length: u32][payload]`, little-endian, and a payload may end
//! with a list of nested chunks. [`file::ChunkFile`] walks that structure and
//! [`registry::Registry`] maps tags to decoders.

use std::fmt;

pub mod file;
pub mod registry;

pub use file::{ChunkFile, MAX_DEPTH};
pub use registry::{Decoded, DispatchReport, Entity, Registry, Sinks};

/// Size of a chunk header in bytes.
pub const HEADER_SIZE: u64 = 8;

/// Numeric chunk type. Any value is representable; unknown tags are skipped, not rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

impl ChunkId {
    // Geometry
    pub const MESH: ChunkId = ChunkId(0x0001_0000);
    pub const PRIM_GROUP: ChunkId = ChunkId(0x0001_0002);
    pub const BOUNDING_BOX: ChunkId = ChunkId(0x0001_0003);
    pub const BOUNDING_SPHERE: ChunkId = ChunkId(0x0001_0004);
    pub const POSITION_LIST: ChunkId = ChunkId(0x0001_0005);
    pub const NORMAL_LIST: ChunkId = ChunkId(0x0001_0006);
    pub const UV_LIST: ChunkId = ChunkId(0x0001_0007);
    pub const COLOUR_LIST: ChunkId = ChunkId(0x0001_0008);
    pub const INDEX_LIST: ChunkId = ChunkId(0x0001_000A);

    // Shading
    pub const SHADER: ChunkId = ChunkId(0x0001_1000);
    pub const SHADER_TEXTURE_PARAM: ChunkId = ChunkId(0x0001_1002);
    pub const SHADER_INT_PARAM: ChunkId = ChunkId(0x0001_1003);
    pub const SHADER_FLOAT_PARAM: ChunkId = ChunkId(0x0001_1004);
    pub const SHADER_COLOUR_PARAM: ChunkId = ChunkId(0x0001_1005);

    // Textures
    pub const TEXTURE: ChunkId = ChunkId(0x0001_9000);
    pub const IMAGE: ChunkId = ChunkId(0x0001_9001);
    pub const IMAGE_DATA: ChunkId = ChunkId(0x0001_9002);
    pub const SET: ChunkId = ChunkId(0x0001_9005);

    // Animated models
    pub const SKELETON: ChunkId = ChunkId(0x0000_4500);
    pub const SKELETON_JOINT: ChunkId = ChunkId(0x0000_4501);
    pub const COMPOSITE_DRAWABLE: ChunkId = ChunkId(0x0000_4512);
    pub const COMPOSITE_DRAWABLE_PROP_LIST: ChunkId = ChunkId(0x0000_4514);
    pub const COMPOSITE_DRAWABLE_PROP: ChunkId = ChunkId(0x0000_4516);

    // Scenegraph
    pub const SCENEGRAPH: ChunkId = ChunkId(0x0012_0100);
    pub const SCENEGRAPH_ROOT: ChunkId = ChunkId(0x0012_0101);
    pub const SCENEGRAPH_BRANCH: ChunkId = ChunkId(0x0012_0102);
    pub const SCENEGRAPH_TRANSFORM: ChunkId = ChunkId(0x0012_0103);
    pub const SCENEGRAPH_DRAWABLE: ChunkId = ChunkId(0x0012_0107);

    // World
    pub const FENCE: ChunkId = ChunkId(0x0300_0000);
    pub const LOCATOR: ChunkId = ChunkId(0x0300_0005);
    pub const TRIGGER_VOLUME: ChunkId = ChunkId(0x0300_0006);
    pub const STATIC_ENTITY: ChunkId = ChunkId(0x03F0_0000);
    pub const STATIC_PHYSICS: ChunkId = ChunkId(0x03F0_0001);
    pub const DYNAMIC_PHYSICS: ChunkId = ChunkId(0x03F0_0002);
    pub const INTERSECT: ChunkId = ChunkId(0x03F0_0003);
    pub const FENCE_WRAPPER: ChunkId = ChunkId(0x03F0_0007);
    pub const INSTANCE_LIST: ChunkId = ChunkId(0x03F0_0008);
    pub const INSTANCED_STATIC_PHYSICS: ChunkId = ChunkId(0x03F0_000A);
    pub const WORLD_SPHERE: ChunkId = ChunkId(0x03F0_000B);
    pub const ANIM_DYNAMIC_PHYSICS: ChunkId = ChunkId(0x03F0_000E);
    pub const TERRAIN_TYPE_LIST: ChunkId = ChunkId(0x03F0_000F);
    pub const ANIM_OBJECT_WRAPPER: ChunkId = ChunkId(0x03F0_0011);

    // Collision
    pub const COLLISION_OBJECT: ChunkId = ChunkId(0x0701_0000);
    pub const COLLISION_VOLUME: ChunkId = ChunkId(0x0701_0001);
    pub const COLLISION_SPHERE: ChunkId = ChunkId(0x0701_0002);
    pub const COLLISION_CYLINDER: ChunkId = ChunkId(0x0701_0003);
    pub const COLLISION_OBBOX: ChunkId = ChunkId(0x0701_0004);
    pub const COLLISION_WALL: ChunkId = ChunkId(0x0701_0005);
    pub const COLLISION_BBOX: ChunkId = ChunkId(0x0701_0006);
    pub const COLLISION_VECTOR: ChunkId = ChunkId(0x0701_0007);

    /// Human readable name for known tags.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::MESH => "Mesh",
            Self::PRIM_GROUP => "PrimGroup",
            Self::BOUNDING_BOX => "BoundingBox",
            Self::BOUNDING_SPHERE => "BoundingSphere",
            Self::POSITION_LIST => "PositionList",
            Self::NORMAL_LIST => "NormalList",
            Self::UV_LIST => "UVList",
            Self::COLOUR_LIST => "ColourList",
            Self::INDEX_LIST => "IndexList",
            Self::SHADER => "Shader",
            Self::SHADER_TEXTURE_PARAM => "ShaderTextureParam",
            Self::SHADER_INT_PARAM => "ShaderIntParam",
            Self::SHADER_FLOAT_PARAM => "ShaderFloatParam",
            Self::SHADER_COLOUR_PARAM => "ShaderColourParam",
            Self::TEXTURE => "Texture",
            Self::IMAGE => "Image",
            Self::IMAGE_DATA => "ImageData",
            Self::SET => "Set",
            Self::SKELETON => "Skeleton",
            Self::SKELETON_JOINT => "SkeletonJoint",
            Self::COMPOSITE_DRAWABLE => "CompositeDrawable",
            Self::COMPOSITE_DRAWABLE_PROP_LIST => "CompositeDrawablePropList",
            Self::COMPOSITE_DRAWABLE_PROP => "CompositeDrawableProp",
            Self::SCENEGRAPH => "Scenegraph",
            Self::SCENEGRAPH_ROOT => "ScenegraphRoot",
            Self::SCENEGRAPH_BRANCH => "ScenegraphBranch",
            Self::SCENEGRAPH_TRANSFORM => "ScenegraphTransform",
            Self::SCENEGRAPH_DRAWABLE => "ScenegraphDrawable",
            Self::FENCE => "Fence",
            Self::LOCATOR => "Locator",
            Self::TRIGGER_VOLUME => "TriggerVolume",
            Self::STATIC_ENTITY => "StaticEntity",
            Self::STATIC_PHYSICS => "StaticPhysics",
            Self::DYNAMIC_PHYSICS => "DynamicPhysics",
            Self::INTERSECT => "Intersect",
            Self::FENCE_WRAPPER => "FenceWrapper",
            Self::INSTANCE_LIST => "InstanceList",
            Self::INSTANCED_STATIC_PHYSICS => "InstancedStaticPhysics",
            Self::WORLD_SPHERE => "WorldSphere",
            Self::ANIM_DYNAMIC_PHYSICS => "AnimDynamicPhysics",
            Self::TERRAIN_TYPE_LIST => "TerrainTypeList",
            Self::ANIM_OBJECT_WRAPPER => "AnimObjectWrapper",
            Self::COLLISION_OBJECT => "CollisionObject",
            Self::COLLISION_VOLUME => "CollisionVolume",
            Self::COLLISION_SPHERE => "CollisionSphere",
            Self::COLLISION_CYLINDER => "CollisionCylinder",
            Self::COLLISION_OBBOX => "CollisionOBBox",
            Self::COLLISION_WALL => "CollisionWall",
            Self::COLLISION_BBOX => "CollisionBBox",
            Self::COLLISION_VECTOR => "CollisionVector",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#010x})", self.0),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

impl From<u32> for ChunkId {
    fn from(value: u32) -> Self {
        ChunkId(value)
    }
}
