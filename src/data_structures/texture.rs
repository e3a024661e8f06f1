//! Decoded textures and texture sets.
//!
//! This module provides [`Texture`], a CPU-side pixel buffer produced by the image
//! pipeline, and [`TextureSet`], a named group of textures. Uploading to the GPU is
//! left to the render collaborator (see the `gpu` feature).

use image::{DynamicImage, RgbImage, RgbaImage};

/// Pixel layouts the loader produces. Every decoded image is normalised to one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// A decoded texture.
///
/// `pixels` is row-major, 8 bits per channel, without row padding, so its length is
/// always `width * height * format.channels()`. The name is the lookup key used by
/// shaders; it isn't unique across a load and later registrations replace earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn new(
        name: impl Into<String>,
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            width,
            height,
            pixels,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.format == PixelFormat::Rgba8
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.channels()
    }

    /// Pixel data expanded to RGBA, as most GPU APIs only take four channel formats.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Rgba8 => self.pixels.clone(),
            PixelFormat::Rgb8 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
        }
    }

    /// Wraps the pixels in an `image` buffer, e.g. for exporting. `None` if the buffer
    /// doesn't match the dimensions.
    pub fn to_image(&self) -> Option<DynamicImage> {
        match self.format {
            PixelFormat::Rgb8 => {
                RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                    .map(DynamicImage::ImageRgb8)
            }
            PixelFormat::Rgba8 => {
                RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                    .map(DynamicImage::ImageRgba8)
            }
        }
    }
}

/// A named collection of textures, e.g. the variants of a skin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureSet {
    pub name: String,
    pub textures: Vec<Texture>,
}
