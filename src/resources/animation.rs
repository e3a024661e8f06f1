//! Skeletons, composite drawables and animated objects.
//!
//! An animated object wrapper bundles meshes, a skeleton and a composite drawable
//! that attaches props to joints. The bundle is decoded once into a [`ModelData`]
//! and shared by `Arc` between every placed [`CompositeModel`]. Playback is not
//! handled here.
//!
//! Stand-alone model files (vehicles) hold the same parts as top-level chunks;
//! [`load_composite_model`] assembles them.

use std::{
    io::{Cursor, Read, Seek},
    path::Path,
    sync::Arc,
};

use anyhow::Context;

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Entity, Registry, Sinks},
    data_structures::{
        model::{
            CompositeDrawable, CompositeModel, CompositeProp, ModelData, Skeleton, SkeletonJoint,
        },
        physics::PhysicsSink,
    },
    error::{P3dError, Result},
    resources::{self, ResourceSink, instance, mesh},
};

pub const SKELETON_VERSION: u32 = 0;
pub const ANIM_OBJECT_WRAPPER_VERSION: u32 = 0;
pub const ANIM_DYNAMIC_PHYSICS_VERSION: u32 = 0;

pub fn read_skeleton<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<Skeleton> {
    let name = file.read_string()?;
    file.expect_version("Skeleton", SKELETON_VERSION)?;
    let _joint_count = file.read_u32()?;

    let mut joints = Vec::new();
    file.children(|file, id| {
        if id == ChunkId::SKELETON_JOINT {
            joints.push(SkeletonJoint {
                name: file.read_string()?,
                parent: file.read_u32()?,
                dof: file.read_i32()?,
                free_axis: file.read_i32()?,
                primary_axis: file.read_i32()?,
                secondary_axis: file.read_i32()?,
                twist_axis: file.read_i32()?,
                rest_pose: file.read_matrix()?,
            });
        }
        Ok(())
    })?;

    Ok(Skeleton { name, joints })
}

pub fn read_composite_drawable<R: Read + Seek>(
    file: &mut ChunkFile<R>,
) -> Result<CompositeDrawable> {
    let name = file.read_string()?;
    let skeleton = file.read_string()?;

    let mut props = Vec::new();
    file.children(|file, id| {
        if id != ChunkId::COMPOSITE_DRAWABLE_PROP_LIST {
            log::debug!("Unhandled chunk {id} in composite drawable");
            return Ok(());
        }
        let _count = file.read_u32()?;
        file.children(|file, id| {
            if id == ChunkId::COMPOSITE_DRAWABLE_PROP {
                props.push(CompositeProp {
                    name: file.read_string()?,
                    is_translucent: file.read_u32()? != 0,
                    skeleton_joint: file.read_u32()?,
                });
            }
            Ok(())
        })
    })?;

    Ok(CompositeDrawable {
        name,
        skeleton,
        props,
    })
}

fn read_anim_object_wrapper<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<ModelData> {
    let mut data = ModelData {
        name: file.read_string()?,
        ..Default::default()
    };
    file.expect_version("AnimObjectWrapper", ANIM_OBJECT_WRAPPER_VERSION)?;
    data.has_alpha = file.read_u32()? != 0;

    file.children(|file, id| {
        match id {
            ChunkId::MESH => data.meshes.push(mesh::read_mesh(file)?),
            ChunkId::SKELETON => data.skeleton = Some(read_skeleton(file)?),
            ChunkId::COMPOSITE_DRAWABLE => data.drawable = Some(read_composite_drawable(file)?),
            _ => log::debug!("Unhandled chunk {id} in anim object {}", data.name),
        }
        Ok(())
    })?;

    Ok(data)
}

/// One composite model per instance, all sharing the wrapper's data.
pub fn decode_anim_dynamic_physics<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("AnimDynamicPhysics", ANIM_DYNAMIC_PHYSICS_VERSION)?;
    let _has_alpha = file.read_u32()?;

    let mut data = None;
    let mut instances = None;
    file.children(|file, id| {
        match id {
            ChunkId::ANIM_OBJECT_WRAPPER => data = Some(Arc::new(read_anim_object_wrapper(file)?)),
            ChunkId::INSTANCE_LIST => instances = Some(instance::read_instance_list(file)?),
            _ => log::debug!("Unhandled chunk {id} in anim dynamic physics {name}"),
        }
        Ok(())
    })?;

    let data = data.ok_or_else(|| {
        P3dError::Malformed(format!("anim dynamic physics {name} has no object wrapper"))
    })?;
    let instances = instances.ok_or_else(|| {
        P3dError::Malformed(format!("anim dynamic physics {name} has no instance list"))
    })?;

    let models = instances
        .drawables()
        .into_iter()
        .map(|drawable| {
            let mut model = CompositeModel::new(drawable.node, Arc::clone(&data));
            model.set_transform(drawable.transform);
            model
        })
        .collect();
    Ok(Decoded::Entity(Entity::Composites(models)))
}

pub fn decode_skeleton_entity<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    Ok(Decoded::Entity(Entity::Skeleton(read_skeleton(file)?)))
}

pub fn decode_composite_drawable_entity<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    _sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    Ok(Decoded::Entity(Entity::CompositeDrawable(
        read_composite_drawable(file)?,
    )))
}

/// Assembles a composite model from a stand-alone model file.
///
/// Shaders and textures in the file go to `resources`. Returns `Ok(None)` if the file
/// doesn't exist or contains no meshes. The model is named after the file stem and
/// placed at the origin.
pub fn load_composite_model(
    path: &Path,
    resources: &mut dyn ResourceSink,
    physics: &mut dyn PhysicsSink,
) -> anyhow::Result<Option<CompositeModel>> {
    if !path.exists() {
        log::info!("Model not found: {}", path.display());
        return Ok(None);
    }

    let bytes = resources::load_binary(path)?;
    let mut file = ChunkFile::new(Cursor::new(bytes))?;
    let mut sinks = Sinks::new(resources, physics);

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut data = ModelData {
        name: name.clone(),
        ..Default::default()
    };

    let report = Registry::composite()
        .dispatch(&mut file, &mut sinks, |entity| match entity {
            Entity::Mesh(mesh) => data.meshes.push(mesh),
            Entity::Skeleton(skeleton) => data.skeleton = Some(skeleton),
            Entity::CompositeDrawable(drawable) => data.drawable = Some(drawable),
            other => log::debug!("Ignoring {other:?} in model file"),
        })
        .with_context(|| format!("parse model file: {}", path.display()))?;

    if !report.failures.is_empty() {
        log::warn!(
            "{} chunk(s) of {} failed to decode",
            report.failures.len(),
            path.display()
        );
    }
    if data.meshes.is_empty() {
        log::warn!("Model file {} contains no meshes", path.display());
        return Ok(None);
    }

    log::debug!(
        "Loaded model {name}: {} meshes, {} shaders/textures",
        data.meshes.len(),
        report.applied
    );
    Ok(Some(CompositeModel::new(name, Arc::new(data))))
}
