use std::io::{Read, Seek};

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Entity, Sinks},
    data_structures::mesh::{Mesh, PrimGroup, PrimitiveType},
    error::{P3dError, Result},
    resources::shader::argb_to_rgba,
};

pub const MESH_VERSION: u32 = 0;
pub const PRIM_GROUP_VERSION: u32 = 0;

/**
 * Reads an opened `Mesh` chunk. The declared group count is informational; every
 * `PrimGroup` child is read.
 */
pub fn read_mesh<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<Mesh> {
    let name = file.read_string()?;
    file.expect_version("Mesh", MESH_VERSION)?;
    let _group_count = file.read_u32()?;

    let mut prim_groups = Vec::new();
    file.children(|file, id| {
        match id {
            ChunkId::PRIM_GROUP => prim_groups.push(read_prim_group(file)?),
            _ => log::debug!("Unhandled chunk {id} in mesh {name}"),
        }
        Ok(())
    })?;

    Ok(Mesh { name, prim_groups })
}

fn read_prim_group<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<PrimGroup> {
    file.expect_version("PrimGroup", PRIM_GROUP_VERSION)?;
    let shader = file.read_string()?;
    let raw_primitive = file.read_u32()?;
    let primitive = PrimitiveType::from_raw(raw_primitive)
        .ok_or_else(|| P3dError::Malformed(format!("unknown primitive type {raw_primitive}")))?;
    let _vertex_types = file.read_u32()?;
    let _vertex_count = file.read_u32()?;
    let _index_count = file.read_u32()?;
    let _matrix_count = file.read_u32()?;

    let mut group = PrimGroup {
        shader,
        primitive,
        ..Default::default()
    };
    let mut has_uvs = false;

    file.children(|file, id| {
        match id {
            ChunkId::POSITION_LIST => group.positions = file.read_list(12, |f| f.read_f32s::<3>())?,
            ChunkId::NORMAL_LIST => group.normals = file.read_list(12, |f| f.read_f32s::<3>())?,
            ChunkId::UV_LIST => {
                let count = file.read_count(8)?;
                let channel = file.read_u32()?;
                // extra channels (lightmaps) aren't used
                if channel == 0 && !has_uvs {
                    group.uvs = (0..count)
                        .map(|_| file.read_f32s::<2>())
                        .collect::<Result<_>>()?;
                    has_uvs = true;
                }
            }
            ChunkId::COLOUR_LIST => {
                group.colours = file.read_list(4, |f| Ok(argb_to_rgba(f.read_u32()?)))?
            }
            ChunkId::INDEX_LIST => group.indices = file.read_list(4, |f| f.read_u32())?,
            _ => log::debug!("Unhandled chunk {id} in prim group"),
        }
        Ok(())
    })?;

    Ok(group)
}

/// Reads every `Mesh` child of the current chunk.
pub fn read_mesh_children<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<Vec<Mesh>> {
    let mut meshes = Vec::new();
    file.children(|file, id| {
        if id == ChunkId::MESH {
            meshes.push(read_mesh(file)?);
        }
        Ok(())
    })?;
    Ok(meshes)
}

pub fn decode_mesh_entity<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    Ok(Decoded::Entity(Entity::Mesh(read_mesh(file)?)))
}
