use std::io::{Read, Seek};

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Entity, Sinks},
    data_structures::{
        locator::{Locator, LocatorKind, TriggerVolume},
        model::{StaticEntity, WorldSphere},
    },
    error::{P3dError, Result},
    resources::mesh,
};

pub const STATIC_ENTITY_VERSION: u32 = 0;
pub const WORLD_SPHERE_VERSION: u32 = 1;

pub fn decode_static_entity<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("StaticEntity", STATIC_ENTITY_VERSION)?;
    let has_alpha = file.read_u32()? != 0;

    let mut found = None;
    file.children(|file, id| {
        match id {
            ChunkId::MESH if found.is_none() => found = Some(mesh::read_mesh(file)?),
            _ => log::debug!("Unhandled chunk {id} in static entity {name}"),
        }
        Ok(())
    })?;

    let mesh =
        found.ok_or_else(|| P3dError::Malformed(format!("static entity {name} has no mesh")))?;
    Ok(Decoded::Entity(Entity::Static(StaticEntity {
        name,
        has_alpha,
        mesh,
    })))
}

pub fn decode_world_sphere<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("WorldSphere", WORLD_SPHERE_VERSION)?;
    let _mesh_count = file.read_u32()?;
    // billboards aren't drawn
    let _old_billboard_count = file.read_u32()?;
    let _billboard_group_count = file.read_u32()?;

    let meshes = mesh::read_mesh_children(file)?;
    Ok(Decoded::Entity(Entity::WorldSphere(WorldSphere {
        name,
        meshes,
    })))
}

pub fn decode_locator<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    let kind = LocatorKind::from(file.read_u32()?);
    let data = file.read_list(4, |f| f.read_u32())?;
    let position = file.read_vec3()?;
    let _trigger_count = file.read_u32()?;

    let mut triggers = Vec::new();
    file.children(|file, id| {
        if id == ChunkId::TRIGGER_VOLUME {
            triggers.push(TriggerVolume {
                name: file.read_string()?,
                kind: file.read_u32()?,
                half_extents: file.read_vec3()?,
                transform: file.read_matrix()?,
            });
        }
        Ok(())
    })?;

    Ok(Decoded::Entity(Entity::Locator(Locator {
        name,
        kind,
        data,
        position,
        triggers,
    })))
}
