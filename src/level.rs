//! Level assembly.
//!
//! A [`Level`] owns everything a level file places in the world. Loading runs one
//! [`Registry::level`] pass over the file's root chunks and routes each decoded
//! entity to its collection; shaders and textures go to the caller's
//! [`ResourceSink`], collision data to the [`PhysicsSink`].
//!
//! Loads are additive. Regions streamed in with [`Level::dyna_load_data`] append to
//! the same collections.

use std::io::Cursor;

use anyhow::Context;
use cgmath::{Matrix4, Vector3};

use crate::{
    chunk::{ChunkFile, DispatchReport, Entity, Registry, Sinks},
    config::LevelConfig,
    data_structures::{
        locator::Locator,
        model::{CompositeModel, PlacedEntity, StaticEntity, WorldSphere},
        physics::PhysicsSink,
    },
    error::Result,
    region,
    resources::{self, ResourceSink, animation},
};

/// Where the first vehicle is parked. Each further vehicle moves `VEHICLE_SPACING`
/// along x.
const VEHICLE_ORIGIN: Vector3<f32> = Vector3 {
    x: 240.0,
    y: 4.6,
    z: -160.0,
};
const VEHICLE_SPACING: f32 = 3.0;

#[derive(Debug, Default)]
pub struct Level {
    config: LevelConfig,
    pub entities: Vec<StaticEntity>,
    pub placed: Vec<PlacedEntity>,
    pub composite_models: Vec<CompositeModel>,
    pub world_sphere: Option<WorldSphere>,
    pub locators: Vec<Locator>,
    /// Regions named by unload commands, in the order they were processed.
    pub unloaded_regions: Vec<String>,
}

impl Level {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Shader program world geometry is drawn with.
    pub fn world_shader(&self) -> &str {
        &self.config.world_shader
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.placed.is_empty()
            && self.composite_models.is_empty()
            && self.world_sphere.is_none()
            && self.locators.is_empty()
    }

    /// Loads a level file relative to the art root.
    ///
    /// A missing file is not an error: it is logged and `Ok(None)` is returned with the
    /// level unchanged.
    pub fn load_p3d(
        &mut self,
        filename: &str,
        resources: &mut dyn ResourceSink,
        physics: &mut dyn PhysicsSink,
    ) -> anyhow::Result<Option<DispatchReport>> {
        let path = self.config.art_root.join(filename);
        if !path.is_file() {
            log::info!("Level not found: {filename}");
            return Ok(None);
        }

        log::info!("Loading level: {filename}");
        let bytes = resources::load_binary(&path)?;
        let report = self
            .load_bytes(filename, bytes, resources, physics)
            .with_context(|| format!("load level: {}", path.display()))?;
        Ok(Some(report))
    }

    /// Decodes an in-memory level file. `label` is only used for logging.
    ///
    /// Entities decoded before a fatal error stay in the level.
    pub fn load_bytes(
        &mut self,
        label: &str,
        bytes: Vec<u8>,
        resources: &mut dyn ResourceSink,
        physics: &mut dyn PhysicsSink,
    ) -> Result<DispatchReport> {
        let mut file = ChunkFile::new(Cursor::new(bytes))?;
        let mut sinks = Sinks::new(resources, physics);

        let report = Registry::level().dispatch(&mut file, &mut sinks, |entity| match entity {
            Entity::Static(entity) => self.entities.push(entity),
            Entity::Placed(placed) => self.placed.extend(placed),
            Entity::Composites(models) => self.composite_models.extend(models),
            Entity::WorldSphere(sphere) => {
                if self.world_sphere.is_some() {
                    log::debug!("Replacing world sphere with {}", sphere.name);
                }
                self.world_sphere = Some(sphere);
            }
            Entity::Locator(locator) => self.locators.push(locator),
            other => log::debug!("Ignoring {other:?} in level file"),
        })?;

        log::info!(
            "Loaded {label}: {} entities, {} applied, {} skipped, {} unknown, {} failed",
            report.entities,
            report.applied,
            report.skipped,
            report.unknown,
            report.failures.len()
        );
        Ok(report)
    }

    /// Loads the configured vehicles and parks them side by side.
    ///
    /// Returns how many were loaded. Missing or unreadable vehicle files are logged
    /// and skipped without taking up a parking spot.
    pub fn load_vehicles(
        &mut self,
        resources: &mut dyn ResourceSink,
        physics: &mut dyn PhysicsSink,
    ) -> usize {
        let mut offset = 0.0;
        let mut loaded = 0;
        for vehicle in &self.config.vehicles {
            let path = self.config.art_root.join(vehicle);
            match animation::load_composite_model(&path, resources, physics) {
                Ok(Some(mut model)) => {
                    let position = VEHICLE_ORIGIN + Vector3::new(offset, 0.0, 0.0);
                    model.set_transform(Matrix4::from_translation(position));
                    self.composite_models.push(model);
                    offset += VEHICLE_SPACING;
                    loaded += 1;
                }
                Ok(None) => {}
                Err(error) => log::warn!("Failed to load vehicle {vehicle}: {error:#}"),
            }
        }
        loaded
    }

    /// Applies a region command string (see [`region`]). Unloads are processed
    /// before loads. Interior commands are only logged.
    pub fn dyna_load_data(
        &mut self,
        data: &str,
        resources: &mut dyn ResourceSink,
        physics: &mut dyn PhysicsSink,
    ) -> anyhow::Result<()> {
        let commands = region::parse_dyna_load(data);

        for name in commands.region_unloads {
            log::info!("Unload region: {name}");
            self.unloaded_regions.push(name);
        }
        for name in commands.region_loads {
            log::info!("Load region: {name}");
            self.load_p3d(&name, resources, physics)?;
        }
        for name in commands
            .interior_loads
            .iter()
            .chain(&commands.interior_unloads)
        {
            log::debug!("Interior command for {name} not handled");
        }
        Ok(())
    }
}
