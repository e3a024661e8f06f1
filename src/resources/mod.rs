use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::data_structures::{
    shader::Shader,
    texture::{Texture, TextureSet},
};

/**
 * This module contains all chunk decoders: one function per chunk kind, each reading
 * a chunk the cursor has already opened. Top-level decoders have the
 * `DecodeFn` signature and are wired up in `chunk::registry`.
 */
pub mod animation;
pub mod image;
pub mod instance;
pub mod mesh;
pub mod physics;
pub mod shader;
pub mod texture;
pub mod world;

/// Receiver for decoded render resources. Shaders reference textures by name, so
/// implementations are expected to key everything by name.
pub trait ResourceSink {
    fn load_texture(&mut self, texture: Texture);
    fn load_shader(&mut self, shader: Shader);
    fn load_set(&mut self, set: TextureSet);
}

/// Name-keyed store of everything registered through [`ResourceSink`].
#[derive(Debug, Default)]
pub struct ResourceManager {
    textures: HashMap<String, Texture>,
    shaders: HashMap<String, Shader>,
    sets: HashMap<String, TextureSet>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn shader(&self, name: &str) -> Option<&Shader> {
        self.shaders.get(name)
    }

    pub fn set(&self, name: &str) -> Option<&TextureSet> {
        self.sets.get(name)
    }

    pub fn textures(&self) -> impl Iterator<Item = &Texture> {
        self.textures.values()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }
}

impl ResourceSink for ResourceManager {
    fn load_texture(&mut self, texture: Texture) {
        if self.textures.contains_key(&texture.name) {
            log::debug!("Replacing texture {}", texture.name);
        }
        self.textures.insert(texture.name.clone(), texture);
    }

    fn load_shader(&mut self, shader: Shader) {
        if self.shaders.contains_key(&shader.name) {
            log::debug!("Replacing shader {}", shader.name);
        }
        self.shaders.insert(shader.name.clone(), shader);
    }

    fn load_set(&mut self, set: TextureSet) {
        self.sets.insert(set.name.clone(), set);
    }
}

/// Reads a whole container into memory. The file is closed before parsing starts.
pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read p3d file: {}", path.display()))
}
