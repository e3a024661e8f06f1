//! Collision data handed to the physics collaborator.
//!
//! The loader never runs physics. It decodes volumes, intersect meshes and fences
//! and pushes them into a [`PhysicsSink`]. [`WorldPhysics`] is a plain accumulator
//! implementing the sink for callers (and tests) that just want the data.

use cgmath::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionShape {
    Sphere {
        centre: Vector3<f32>,
        radius: f32,
    },
    Cylinder {
        centre: Vector3<f32>,
        axis: Vector3<f32>,
        radius: f32,
        half_length: f32,
        flat_end: bool,
    },
    OrientedBox {
        centre: Vector3<f32>,
        axes: [Vector3<f32>; 3],
        half_extents: Vector3<f32>,
    },
    Wall {
        point: Vector3<f32>,
        normal: Vector3<f32>,
    },
    /// Marks a volume whose extent is the union of its sub-volumes.
    BoundingBox,
}

/// A node in a collision volume tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionVolume {
    pub object_ref: u32,
    pub owner_index: i32,
    pub shape: Option<CollisionShape>,
    pub sub_volumes: Vec<CollisionVolume>,
}

impl CollisionVolume {
    /// Every shape in this tree, depth first.
    pub fn shapes(&self) -> Vec<CollisionShape> {
        let mut out = Vec::new();
        self.collect_shapes(&mut out);
        out
    }

    fn collect_shapes(&self, out: &mut Vec<CollisionShape>) {
        if let Some(shape) = self.shape {
            out.push(shape);
        }
        for sub in &self.sub_volumes {
            sub.collect_shapes(out);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionObject {
    pub name: String,
    pub material: String,
    pub volume: Option<CollisionVolume>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub centre: Vector3<f32>,
    pub radius: f32,
}

/// Ground geometry used for ray casts (terrain height, surface type).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersect {
    pub name: String,
    pub indices: Vec<u32>,
    pub positions: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub bounds: Option<Aabb>,
    pub sphere: Option<BoundingSphere>,
    /// One entry per triangle.
    pub terrain_types: Vec<u8>,
}

impl Intersect {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A one-sided wall the player can't pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fence {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub normal: Vector3<f32>,
}

/// Receiver for decoded collision data.
pub trait PhysicsSink {
    fn add_collision_volume(&mut self, object: CollisionObject);
    fn add_intersect(&mut self, intersect: Intersect);
    fn add_fence(&mut self, fence: Fence);
}

#[derive(Clone, Debug, Default)]
pub struct WorldPhysics {
    pub collision_objects: Vec<CollisionObject>,
    pub intersects: Vec<Intersect>,
    pub fences: Vec<Fence>,
}

impl PhysicsSink for WorldPhysics {
    fn add_collision_volume(&mut self, object: CollisionObject) {
        self.collision_objects.push(object);
    }

    fn add_intersect(&mut self, intersect: Intersect) {
        self.intersects.push(intersect);
    }

    fn add_fence(&mut self, fence: Fence) {
        self.fences.push(fence);
    }
}
