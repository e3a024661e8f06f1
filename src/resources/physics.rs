//! Decoders for collision data: static physics volumes, intersect meshes and fences.
//!
//! None of these produce entities. Everything goes to the [`PhysicsSink`] in
//! [`Sinks`].
//!
//! [`PhysicsSink`]: crate::data_structures::physics::PhysicsSink

use std::io::{Read, Seek};

use cgmath::Vector3;

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Sinks},
    data_structures::physics::{
        Aabb, BoundingSphere, CollisionObject, CollisionShape, CollisionVolume, Fence, Intersect,
    },
    error::{P3dError, Result},
};

pub const STATIC_PHYSICS_VERSION: u32 = 0;
pub const COLLISION_OBJECT_VERSION: u32 = 0;
pub const INTERSECT_VERSION: u32 = 0;
pub const TERRAIN_TYPE_LIST_VERSION: u32 = 0;

pub fn decode_static_physics<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("StaticPhysics", STATIC_PHYSICS_VERSION)?;

    let mut object = None;
    file.children(|file, id| {
        if id == ChunkId::COLLISION_OBJECT && object.is_none() {
            object = Some(read_collision_object(file)?);
        }
        Ok(())
    })?;

    let object = object.ok_or_else(|| {
        P3dError::Malformed(format!("static physics {name} has no collision object"))
    })?;
    if object.volume.is_none() {
        return Ok(Decoded::Skipped(format!(
            "collision object {} has no volume",
            object.name
        )));
    }
    sinks.physics.add_collision_volume(object);
    Ok(Decoded::Applied)
}

pub fn read_collision_object<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<CollisionObject> {
    let name = file.read_string()?;
    file.expect_version("CollisionObject", COLLISION_OBJECT_VERSION)?;
    let material = file.read_string()?;
    let _sub_object_count = file.read_u32()?;
    let _owner_count = file.read_u32()?;

    let mut volume = None;
    file.children(|file, id| {
        match id {
            ChunkId::COLLISION_VOLUME if volume.is_none() => volume = Some(read_volume(file)?),
            _ => log::debug!("Unhandled chunk {id} in collision object {name}"),
        }
        Ok(())
    })?;

    Ok(CollisionObject {
        name,
        material,
        volume,
    })
}

fn read_volume<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<CollisionVolume> {
    let mut volume = CollisionVolume {
        object_ref: file.read_u32()?,
        owner_index: file.read_i32()?,
        ..Default::default()
    };
    let _sub_volume_count = file.read_u32()?;

    file.children(|file, id| {
        match id {
            ChunkId::COLLISION_VOLUME => volume.sub_volumes.push(read_volume(file)?),
            ChunkId::COLLISION_SPHERE => {
                let radius = file.read_f32()?;
                let [centre] = read_vectors::<_, 1>(file, "sphere")?;
                volume.shape = Some(CollisionShape::Sphere { centre, radius });
            }
            ChunkId::COLLISION_CYLINDER => {
                let radius = file.read_f32()?;
                let half_length = file.read_f32()?;
                let flat_end = file.read_u16()? != 0;
                let [centre, axis] = read_vectors::<_, 2>(file, "cylinder")?;
                volume.shape = Some(CollisionShape::Cylinder {
                    centre,
                    axis,
                    radius,
                    half_length,
                    flat_end,
                });
            }
            ChunkId::COLLISION_OBBOX => {
                let half_extents = file.read_vec3()?;
                let [centre, x, y, z] = read_vectors::<_, 4>(file, "oriented box")?;
                volume.shape = Some(CollisionShape::OrientedBox {
                    centre,
                    axes: [x, y, z],
                    half_extents,
                });
            }
            ChunkId::COLLISION_WALL => {
                let [point, normal] = read_vectors::<_, 2>(file, "wall")?;
                volume.shape = Some(CollisionShape::Wall { point, normal });
            }
            ChunkId::COLLISION_BBOX => volume.shape = Some(CollisionShape::BoundingBox),
            _ => log::debug!("Unhandled chunk {id} in collision volume"),
        }
        Ok(())
    })?;

    Ok(volume)
}

/// Reads the `CollisionVector` children of a shape, failing if there are fewer than `N`.
fn read_vectors<R: Read + Seek, const N: usize>(
    file: &mut ChunkFile<R>,
    shape: &str,
) -> Result<[Vector3<f32>; N]> {
    let mut vectors = Vec::with_capacity(N);
    file.children(|file, id| {
        if id == ChunkId::COLLISION_VECTOR {
            vectors.push(file.read_vec3()?);
        }
        Ok(())
    })?;

    let found = vectors.len();
    vectors.truncate(N);
    vectors.try_into().map_err(|_| {
        P3dError::Malformed(format!("collision {shape} needs {N} vectors, found {found}"))
    })
}

pub fn decode_intersect<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("Intersect", INTERSECT_VERSION)?;
    let mut intersect = Intersect {
        name,
        indices: file.read_list(4, |f| f.read_u32())?,
        positions: file.read_list(12, |f| f.read_vec3())?,
        normals: file.read_list(12, |f| f.read_vec3())?,
        ..Default::default()
    };

    file.children(|file, id| {
        match id {
            ChunkId::BOUNDING_BOX => {
                intersect.bounds = Some(Aabb {
                    min: file.read_vec3()?,
                    max: file.read_vec3()?,
                })
            }
            ChunkId::BOUNDING_SPHERE => {
                intersect.sphere = Some(BoundingSphere {
                    centre: file.read_vec3()?,
                    radius: file.read_f32()?,
                })
            }
            ChunkId::TERRAIN_TYPE_LIST => {
                file.expect_version("TerrainTypeList", TERRAIN_TYPE_LIST_VERSION)?;
                intersect.terrain_types = file.read_list(1, |f| f.read_u8())?;
            }
            _ => log::debug!("Unhandled chunk {id} in intersect {}", intersect.name),
        }
        Ok(())
    })?;

    sinks.physics.add_intersect(intersect);
    Ok(Decoded::Applied)
}

pub fn decode_fence_wrapper<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let mut fences = Vec::new();
    file.children(|file, id| {
        if id == ChunkId::FENCE {
            fences.push(Fence {
                start: file.read_vec3()?,
                end: file.read_vec3()?,
                normal: file.read_vec3()?,
            });
        }
        Ok(())
    })?;

    if fences.is_empty() {
        return Err(P3dError::Malformed("fence wrapper without a fence".into()));
    }
    for fence in fences {
        sinks.physics.add_fence(fence);
    }
    Ok(Decoded::Applied)
}
