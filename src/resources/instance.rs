//! Instanced and dynamic physics chunks.
//!
//! Both carry a set of meshes plus an instance list: a small scene graph whose
//! drawables name the mesh to place. Decoding flattens the graph and resolves every
//! drawable against the chunk's own meshes. A drawable naming a mesh the chunk
//! doesn't contain fails the whole chunk with [`P3dError::DanglingReference`].

use std::{
    collections::HashMap,
    io::{Read, Seek},
    sync::Arc,
};

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Entity, Sinks},
    data_structures::{
        mesh::Mesh,
        model::PlacedEntity,
        scene_graph::{NodeKind, SceneNode},
    },
    error::{P3dError, Result},
    resources::mesh,
};

pub const PHYSICS_OBJECT_VERSION: u32 = 0;
pub const SCENEGRAPH_VERSION: u32 = 0;

/// Reads an opened `InstanceList` chunk into its scene graph root.
pub fn read_instance_list<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<SceneNode> {
    let name = file.read_string()?;
    let mut root = None;
    file.children(|file, id| {
        if id == ChunkId::SCENEGRAPH && root.is_none() {
            root = Some(read_scenegraph(file)?);
        }
        Ok(())
    })?;
    root.ok_or_else(|| P3dError::Malformed(format!("instance list {name} has no scenegraph")))
}

fn read_scenegraph<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<SceneNode> {
    let name = file.read_string()?;
    file.expect_version("Scenegraph", SCENEGRAPH_VERSION)?;
    let mut root = SceneNode::new(name, NodeKind::Root);
    file.children(|file, id| {
        if id == ChunkId::SCENEGRAPH_ROOT {
            read_nodes(file, &mut root)?;
        }
        Ok(())
    })?;
    Ok(root)
}

fn read_nodes<R: Read + Seek>(file: &mut ChunkFile<R>, parent: &mut SceneNode) -> Result<()> {
    file.children(|file, id| {
        let mut node = match id {
            ChunkId::SCENEGRAPH_BRANCH => {
                let name = file.read_string()?;
                let _child_count = file.read_u32()?;
                SceneNode::new(name, NodeKind::Branch)
            }
            ChunkId::SCENEGRAPH_TRANSFORM => {
                let name = file.read_string()?;
                let _child_count = file.read_u32()?;
                let matrix = file.read_matrix()?;
                SceneNode::new(name, NodeKind::Transform(matrix))
            }
            ChunkId::SCENEGRAPH_DRAWABLE => {
                let name = file.read_string()?;
                let drawable = file.read_string()?;
                let is_translucent = file.read_u32()? != 0;
                SceneNode::new(
                    name,
                    NodeKind::Drawable {
                        drawable,
                        is_translucent,
                    },
                )
            }
            _ => {
                log::debug!("Unhandled chunk {id} in scenegraph {}", parent.name);
                return Ok(());
            }
        };
        read_nodes(file, &mut node)?;
        parent.children.push(node);
        Ok(())
    })
}

struct PhysicsObject {
    name: String,
    meshes: Vec<Mesh>,
    instances: Option<SceneNode>,
}

fn read_physics_object<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    kind: &'static str,
) -> Result<PhysicsObject> {
    let name = file.read_string()?;
    file.expect_version(kind, PHYSICS_OBJECT_VERSION)?;
    let _has_alpha = file.read_u32()?;

    let mut meshes = Vec::new();
    let mut instances = None;
    file.children(|file, id| {
        match id {
            ChunkId::MESH => meshes.push(mesh::read_mesh(file)?),
            ChunkId::INSTANCE_LIST => instances = Some(read_instance_list(file)?),
            _ => log::debug!("Unhandled chunk {id} in {kind} {name}"),
        }
        Ok(())
    })?;

    Ok(PhysicsObject {
        name,
        meshes,
        instances,
    })
}

/// Resolves every drawable of `instances` against `meshes`.
///
/// Drawables are matched by node name first and by their drawable reference second.
/// When several meshes share a name the first one wins.
pub fn place_instances(
    meshes: Vec<Mesh>,
    instances: &SceneNode,
    dynamic: bool,
) -> Result<Vec<PlacedEntity>> {
    let meshes: Vec<Arc<Mesh>> = meshes.into_iter().map(Arc::new).collect();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, mesh) in meshes.iter().enumerate() {
        index.entry(mesh.name.as_str()).or_insert(i);
    }

    instances
        .drawables()
        .into_iter()
        .map(|instance| {
            let i = index
                .get(instance.node.as_str())
                .or_else(|| index.get(instance.drawable.as_str()))
                .copied()
                .ok_or_else(|| P3dError::DanglingReference {
                    kind: "drawable",
                    name: instance.node.clone(),
                })?;
            Ok(PlacedEntity {
                name: instance.node,
                mesh: Arc::clone(&meshes[i]),
                transform: instance.transform,
                dynamic,
            })
        })
        .collect()
}

fn decode_placed<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    kind: &'static str,
    dynamic: bool,
) -> Result<Decoded> {
    let object = read_physics_object(file, kind)?;
    let instances = object.instances.ok_or_else(|| {
        P3dError::Malformed(format!("{kind} {} has no instance list", object.name))
    })?;
    let placed = place_instances(object.meshes, &instances, dynamic)?;
    Ok(Decoded::Entity(Entity::Placed(placed)))
}

pub fn decode_instanced_static_physics<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    decode_placed(file, "InstancedStaticPhysics", false)
}

pub fn decode_dynamic_physics<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    decode_placed(file, "DynamicPhysics", true)
}
