//! Engine data structures: textures, shaders, meshes, models, locators and physics data.
//!
//! This module contains the CPU-side types the loader produces:
//!
//! - `texture` contains decoded pixel buffers and texture sets
//! - `shader` contains material descriptions
//! - `mesh` contains geometry streams and an interleaved vertex type
//! - `model` holds static, placed and composite models plus the world sphere
//! - `locator` holds named placement markers and their trigger volumes
//! - `physics` holds collision volumes, intersects, fences and the physics sink
//! - `scene_graph` resolves instance lists into placed drawables

pub mod locator;
pub mod mesh;
pub mod model;
pub mod physics;
pub mod scene_graph;
pub mod shader;
pub mod texture;
