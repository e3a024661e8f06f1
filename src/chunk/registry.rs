//! Tag to decoder dispatch.
//!
//! A [`Registry`] maps [`ChunkId`]s to decode functions. [`Registry::dispatch`]
//! walks the sibling chunks under the cursor, hands each one to its decoder and
//! always closes the chunk afterwards, so an unknown or broken chunk costs exactly
//! its own bytes and nothing else.
//!
//! Decoders either produce an [`Entity`] for the caller, apply a side effect to the
//! injected [`Sinks`] (texture registration, collision volumes), or report that they
//! skipped the chunk. All three come back as a [`Decoded`] value.

use std::{
    collections::HashMap,
    io::{Read, Seek},
};

use crate::{
    chunk::{ChunkFile, ChunkId},
    data_structures::{
        locator::Locator,
        mesh::Mesh,
        model::{CompositeDrawable, CompositeModel, PlacedEntity, Skeleton, StaticEntity, WorldSphere},
        physics::PhysicsSink,
    },
    error::{P3dError, Result},
    resources::{self, ResourceSink},
};

/// The receivers a decoder may push into instead of returning a value.
pub struct Sinks<'a> {
    pub resources: &'a mut dyn ResourceSink,
    pub physics: &'a mut dyn PhysicsSink,
}

impl<'a> Sinks<'a> {
    pub fn new(resources: &'a mut dyn ResourceSink, physics: &'a mut dyn PhysicsSink) -> Self {
        Self { resources, physics }
    }
}

/// Values decoders hand back to the caller of [`Registry::dispatch`].
#[derive(Debug)]
pub enum Entity {
    Static(StaticEntity),
    Placed(Vec<PlacedEntity>),
    Composites(Vec<CompositeModel>),
    WorldSphere(WorldSphere),
    Locator(Locator),
    Mesh(Mesh),
    Skeleton(Skeleton),
    CompositeDrawable(CompositeDrawable),
}

#[derive(Debug)]
pub enum Decoded {
    /// The decoder produced a value for the caller.
    Entity(Entity),
    /// The decoder pushed its result into a sink.
    Applied,
    /// The chunk was read but yielded nothing usable.
    Skipped(String),
}

pub type DecodeFn<R> = fn(&mut ChunkFile<R>, &mut Sinks<'_>) -> Result<Decoded>;

/// A chunk whose decoder failed. Its siblings were still decoded.
#[derive(Debug)]
pub struct ChunkFailure {
    pub id: ChunkId,
    /// Offset of the chunk's payload.
    pub offset: u64,
    pub error: P3dError,
}

/// Summary of one [`Registry::dispatch`] pass.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub entities: usize,
    pub applied: usize,
    pub skipped: usize,
    pub unknown: usize,
    pub failures: Vec<ChunkFailure>,
}

impl DispatchReport {
    pub fn chunks(&self) -> usize {
        self.entities + self.applied + self.skipped + self.unknown + self.failures.len()
    }
}

pub struct Registry<R> {
    decoders: HashMap<ChunkId, DecodeFn<R>>,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }
}

impl<R: Read + Seek> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoders for every chunk kind a level file contains.
    pub fn level() -> Self {
        let mut registry = Self::new();
        registry
            .register(ChunkId::SHADER, resources::shader::decode_shader)
            .register(ChunkId::TEXTURE, resources::texture::decode_texture)
            .register(ChunkId::SET, resources::texture::decode_set)
            .register(ChunkId::STATIC_ENTITY, resources::world::decode_static_entity)
            .register(ChunkId::STATIC_PHYSICS, resources::physics::decode_static_physics)
            .register(
                ChunkId::INSTANCED_STATIC_PHYSICS,
                resources::instance::decode_instanced_static_physics,
            )
            .register(ChunkId::DYNAMIC_PHYSICS, resources::instance::decode_dynamic_physics)
            .register(
                ChunkId::ANIM_DYNAMIC_PHYSICS,
                resources::animation::decode_anim_dynamic_physics,
            )
            .register(ChunkId::INTERSECT, resources::physics::decode_intersect)
            .register(ChunkId::WORLD_SPHERE, resources::world::decode_world_sphere)
            .register(ChunkId::LOCATOR, resources::world::decode_locator)
            .register(ChunkId::FENCE_WRAPPER, resources::physics::decode_fence_wrapper);
        registry
    }

    /// Decoders for stand-alone model files (vehicles, props).
    pub fn composite() -> Self {
        let mut registry = Self::new();
        registry
            .register(ChunkId::SHADER, resources::shader::decode_shader)
            .register(ChunkId::TEXTURE, resources::texture::decode_texture)
            .register(ChunkId::SET, resources::texture::decode_set)
            .register(ChunkId::MESH, resources::mesh::decode_mesh_entity)
            .register(ChunkId::SKELETON, resources::animation::decode_skeleton_entity)
            .register(
                ChunkId::COMPOSITE_DRAWABLE,
                resources::animation::decode_composite_drawable_entity,
            );
        registry
    }

    /// Adds or replaces the decoder for `id`.
    pub fn register(&mut self, id: ChunkId, decoder: DecodeFn<R>) -> &mut Self {
        self.decoders.insert(id, decoder);
        self
    }

    pub fn decoder(&self, id: ChunkId) -> Option<DecodeFn<R>> {
        self.decoders.get(&id).copied()
    }

    pub fn is_registered(&self, id: ChunkId) -> bool {
        self.decoders.contains_key(&id)
    }

    /// Decodes every remaining sibling chunk at the cursor's level.
    ///
    /// Per-chunk decode errors are logged, recorded in the report and skipped.
    /// Errors reading a chunk header, unbalanced frames and IO errors abort the walk
    /// because the next sibling can't be located reliably after them.
    pub fn dispatch(
        &self,
        file: &mut ChunkFile<R>,
        sinks: &mut Sinks<'_>,
        mut on_entity: impl FnMut(Entity),
    ) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        while file.chunks_remaining() {
            let id = file.begin_chunk()?;
            let offset = file.position();

            let Some(decoder) = self.decoder(id) else {
                log::debug!("Unhandled chunk {id} at {offset}");
                report.unknown += 1;
                file.end_chunk()?;
                continue;
            };

            let decoded = file.scoped(|file| decoder(file, sinks));
            let closed = file.end_chunk();

            let decoded = match (decoded, closed) {
                (_, Err(error)) if error.is_fatal() => return Err(error),
                (Err(error), _) | (Ok(_), Err(error)) => Err(error),
                (Ok(decoded), Ok(())) => Ok(decoded),
            };

            match decoded {
                Ok(Decoded::Entity(entity)) => {
                    report.entities += 1;
                    on_entity(entity);
                }
                Ok(Decoded::Applied) => report.applied += 1,
                Ok(Decoded::Skipped(reason)) => {
                    log::debug!("Skipped chunk {id} at {offset}: {reason}");
                    report.skipped += 1;
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    log::warn!("Failed to decode chunk {id} at {offset}: {error}");
                    report.failures.push(ChunkFailure { id, offset, error });
                }
            }
        }

        Ok(report)
    }
}
