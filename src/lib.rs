//! p3d-ngin
//!
//! A loader for chunked P3D asset containers. A container is a tree of
//! size-delimited chunks; this crate walks that tree, decodes the chunk kinds a
//! level or model file contains and assembles them into a renderer agnostic scene
//! model. Rendering, shader compilation and physics simulation are left to the
//! caller, which receives textures, shaders and collision data through sink traits.
//!
//! High-level modules
//! - `chunk`: the chunk cursor and the tag to decoder registry
//! - `config`: art root, world shader and vehicle list
//! - `data_structures`: decoded entities (textures, shaders, meshes, models, physics)
//! - `error`: typed parse errors
//! - `level`: level assembly, vehicle placement and region streaming
//! - `region`: region command parsing
//! - `resources`: one decoder per chunk kind, the PNG pipeline and the resource sink
//! - `gpu` (feature `gpu`): texture and mesh upload through wgpu
//!

pub mod chunk;
pub mod config;
pub mod data_structures;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod level;
pub mod region;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use chunk::{ChunkFile, ChunkId, DispatchReport, Registry};
pub use config::LevelConfig;
pub use data_structures::physics::{PhysicsSink, WorldPhysics};
pub use error::{P3dError, Result};
pub use level::Level;
pub use resources::{ResourceManager, ResourceSink};
