//! Placed and composite models.
//!
//! - [`StaticEntity`] is world-fixed geometry with no transform of its own
//! - [`PlacedEntity`] is one instance of a mesh from an instanced physics chunk
//! - [`ModelData`] is the shared part of an animated/multi-part model
//! - [`CompositeModel`] is a transform-bearing instance of [`ModelData`]
//! - [`WorldSphere`] is the sky/backdrop geometry surrounding a level

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use crate::data_structures::mesh::Mesh;

#[derive(Clone, Debug, PartialEq)]
pub struct StaticEntity {
    pub name: String,
    pub has_alpha: bool,
    pub mesh: Mesh,
}

/// A mesh placed in the world by an instance list.
///
/// Instances of the same chunk share their mesh.
#[derive(Clone, Debug)]
pub struct PlacedEntity {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub transform: Matrix4<f32>,
    /// True for dynamic (movable) physics objects.
    pub dynamic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonJoint {
    pub name: String,
    pub parent: u32,
    pub dof: i32,
    pub free_axis: i32,
    pub primary_axis: i32,
    pub secondary_axis: i32,
    pub twist_axis: i32,
    pub rest_pose: Matrix4<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    pub name: String,
    pub joints: Vec<SkeletonJoint>,
}

impl Skeleton {
    /// Object space rest pose of every joint, parents multiplied in.
    ///
    /// Joints refer to their parent by index and parents always come first; the root
    /// refers to itself.
    pub fn world_rest_poses(&self) -> Vec<Matrix4<f32>> {
        let mut poses: Vec<Matrix4<f32>> = Vec::with_capacity(self.joints.len());
        for (i, joint) in self.joints.iter().enumerate() {
            let parent = joint.parent as usize;
            let pose = if parent < i {
                poses[parent] * joint.rest_pose
            } else {
                joint.rest_pose
            };
            poses.push(pose);
        }
        poses
    }
}

/// One drawable of a composite, attached to a skeleton joint.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeProp {
    pub name: String,
    pub is_translucent: bool,
    pub skeleton_joint: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeDrawable {
    pub name: String,
    pub skeleton: String,
    pub props: Vec<CompositeProp>,
}

/// Everything a composite model shares between its instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub has_alpha: bool,
    pub meshes: Vec<Mesh>,
    pub skeleton: Option<Skeleton>,
    pub drawable: Option<CompositeDrawable>,
}

impl ModelData {
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }
}

/// A named hierarchical model (a car, an animated prop) with its own placement.
#[derive(Clone, Debug)]
pub struct CompositeModel {
    pub name: String,
    data: Arc<ModelData>,
    transform: Matrix4<f32>,
}

impl CompositeModel {
    pub fn new(name: impl Into<String>, data: Arc<ModelData>) -> Self {
        Self {
            name: name.into(),
            data,
            transform: Matrix4::identity(),
        }
    }

    pub fn data(&self) -> &Arc<ModelData> {
        &self.data
    }

    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldSphere {
    pub name: String,
    pub meshes: Vec<Mesh>,
}
