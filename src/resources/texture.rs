use std::io::{Read, Seek};

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Sinks},
    data_structures::texture::{Texture, TextureSet},
    error::Result,
    resources::image,
};

pub const TEXTURE_VERSION: u32 = 14000;
pub const SET_VERSION: u32 = 0;

/// Reads an opened `Texture` chunk.
///
/// Only the first `Image` child is decoded; further ones are logged and ignored. A
/// broken or unsupported image is logged and leaves the texture empty; it never
/// fails the chunk. The texture takes the `Texture` chunk's name.
pub fn read_texture<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<(String, Option<Texture>)> {
    let name = file.read_string()?;
    file.expect_version("Texture", TEXTURE_VERSION)?;
    // width, height, bpp, alpha depth, mip levels, type, usage, priority
    file.skip(32)?;

    let mut texture = None;
    let mut images = 0;
    file.children(|file, id| {
        if id != ChunkId::IMAGE {
            log::debug!("Unhandled chunk {id} in texture {name}");
            return Ok(());
        }
        images += 1;
        if images > 1 {
            log::warn!("Texture {name} has more than one image, ignoring image {images}");
            return Ok(());
        }
        match file.scoped(|file| image::decode_image(file, &name)) {
            Ok(image) => texture = Some(image),
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => log::error!("Failed to decode image for texture {name}: {error}"),
        }
        Ok(())
    })?;

    Ok((name, texture))
}

pub fn decode_texture<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    match read_texture(file)? {
        (_, Some(texture)) => {
            sinks.resources.load_texture(texture);
            Ok(Decoded::Applied)
        }
        (name, None) => Ok(Decoded::Skipped(format!("texture {name} has no usable image"))),
    }
}

pub fn decode_set<R: Read + Seek>(file: &mut ChunkFile<R>, sinks: &mut Sinks<'_>) -> Result<Decoded> {
    let name = file.read_string()?;
    file.expect_version("Set", SET_VERSION)?;
    let _count = file.read_u32()?;

    let mut textures = Vec::new();
    file.children(|file, id| {
        if id == ChunkId::TEXTURE {
            if let (_, Some(texture)) = read_texture(file)? {
                textures.push(texture);
            }
        }
        Ok(())
    })?;

    sinks.resources.load_set(TextureSet { name, textures });
    Ok(Decoded::Applied)
}
