//! Scene graph of an instance list.
//!
//! Instanced physics chunks place their meshes through a small scene graph of
//! branches, transforms and drawables. The graph is only needed while decoding:
//! [`SceneNode::drawables`] flattens it into (drawable name, world transform) pairs.

use cgmath::{Matrix4, SquareMatrix};

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Branch,
    /// Local transform applied to every child.
    Transform(Matrix4<f32>),
    Drawable {
        /// Name of the mesh (or other drawable) to place.
        drawable: String,
        is_translucent: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

/// A drawable reference with its accumulated transform.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawableInstance {
    pub node: String,
    pub drawable: String,
    pub transform: Matrix4<f32>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn local_transform(&self) -> Matrix4<f32> {
        match self.kind {
            NodeKind::Transform(matrix) => matrix,
            _ => Matrix4::identity(),
        }
    }

    /// All drawables below this node in depth-first order, each with the product of
    /// the transforms above it.
    pub fn drawables(&self) -> Vec<DrawableInstance> {
        let mut out = Vec::new();
        self.collect_drawables(Matrix4::identity(), &mut out);
        out
    }

    fn collect_drawables(&self, parent: Matrix4<f32>, out: &mut Vec<DrawableInstance>) {
        let world = parent * self.local_transform();
        if let NodeKind::Drawable { drawable, .. } = &self.kind {
            out.push(DrawableInstance {
                node: self.name.clone(),
                drawable: drawable.clone(),
                transform: world,
            });
        }
        for child in &self.children {
            child.collect_drawables(world, out);
        }
    }
}
