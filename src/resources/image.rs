//! Embedded image decoding.
//!
//! Texture chunks carry their pixels as a compressed image stream inside an
//! `ImageData` sub-chunk. Only PNG streams are decoded. The stream is read up to
//! the chunk boundary and normalised to 8-bit RGB or RGBA:
//!
//! - palette images are expanded to RGB
//! - `tRNS` transparency becomes an explicit alpha channel
//! - 1, 2 and 4 bit samples are unpacked to 8 bits
//! - 16 bit samples are reduced to 8 bits
//!
//! Grayscale sources and every other container image format are rejected with
//! [`P3dError::UnsupportedImageFormat`].

use std::io::{BufRead, Cursor, Read, Seek};

use png::{BitDepth, ColorType, Transformations};

use crate::{
    chunk::{ChunkFile, ChunkId},
    data_structures::texture::{PixelFormat, Texture},
    error::{P3dError, Result},
};

pub const IMAGE_VERSION: u32 = 14000;

/// Image encodings a container may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Raw,
    Png,
    Tga,
    Bmp,
    Ipu,
    Dxt,
    Dxt1,
    Dxt2,
    Dxt3,
    Dxt4,
    Dxt5,
}

impl TryFrom<u32> for ImageFormat {
    type Error = P3dError;

    fn try_from(raw: u32) -> Result<Self> {
        let format = match raw {
            0 => ImageFormat::Raw,
            1 => ImageFormat::Png,
            2 => ImageFormat::Tga,
            3 => ImageFormat::Bmp,
            4 => ImageFormat::Ipu,
            5 => ImageFormat::Dxt,
            6 => ImageFormat::Dxt1,
            7 => ImageFormat::Dxt2,
            8 => ImageFormat::Dxt3,
            9 => ImageFormat::Dxt4,
            10 => ImageFormat::Dxt5,
            other => {
                return Err(P3dError::UnsupportedImageFormat(format!(
                    "unknown image format tag {other}"
                )));
            }
        };
        Ok(format)
    }
}

/// Pixels decoded from an image stream.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes an opened `Image` chunk into a texture called `name`.
///
/// The image's own name is ignored; textures are known by their parent chunk's name.
pub fn decode_image<R: Read + Seek>(file: &mut ChunkFile<R>, name: &str) -> Result<Texture> {
    let _image_name = file.read_string()?;
    file.expect_version("Image", IMAGE_VERSION)?;
    // width, height, bpp, palettized: the stream header is authoritative
    file.skip(16)?;
    let _has_alpha = file.read_u32()?;
    let format = ImageFormat::try_from(file.read_u32()?)?;
    if format != ImageFormat::Png {
        return Err(P3dError::UnsupportedImageFormat(format!(
            "{format:?} image data can't be decoded"
        )));
    }

    if !file.chunks_remaining() {
        return Err(P3dError::Malformed(format!("image {name} has no image data")));
    }
    let id = file.begin_chunk()?;
    if id != ChunkId::IMAGE_DATA {
        return Err(P3dError::UnexpectedChunk {
            expected: ChunkId::IMAGE_DATA,
            found: id,
        });
    }
    // declared stream size; the chunk bounds the stream
    let _size = file.read_u32()?;
    let mut stream = Vec::with_capacity(file.remaining() as usize);
    file.read_to_end(&mut stream)?;
    let image = decode_png(Cursor::new(stream))?;
    file.end_chunk()?;

    Ok(Texture::new(
        name,
        image.format,
        image.width,
        image.height,
        image.pixels,
    ))
}

/// Decodes a PNG stream into tightly packed 8-bit RGB or RGBA rows.
pub fn decode_png(reader: impl BufRead + Seek) -> Result<DecodedImage> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let source = reader.info().color_type;
    if !matches!(source, ColorType::Indexed | ColorType::Rgb | ColorType::Rgba) {
        return Err(P3dError::UnsupportedImageFormat(format!(
            "png colour type {source:?}"
        )));
    }

    let size = reader
        .output_buffer_size()
        .ok_or_else(|| P3dError::Malformed("png frame doesn't fit in memory".into()))?;
    let mut buf = vec![0; size];
    let frame = reader.next_frame(&mut buf)?;

    let format = match (frame.color_type, frame.bit_depth) {
        (ColorType::Rgb, BitDepth::Eight) => PixelFormat::Rgb8,
        (ColorType::Rgba, BitDepth::Eight) => PixelFormat::Rgba8,
        (color_type, bit_depth) => {
            return Err(P3dError::UnsupportedImageFormat(format!(
                "png normalised to {color_type:?}/{bit_depth:?}"
            )));
        }
    };

    let row = frame.width as usize * format.channels();
    let height = frame.height as usize;
    let pixels = if frame.line_size == row {
        buf.truncate(row * height);
        buf
    } else {
        buf.chunks(frame.line_size)
            .take(height)
            .flat_map(|line| &line[..row])
            .copied()
            .collect()
    };

    Ok(DecodedImage {
        format,
        width: frame.width,
        height: frame.height,
        pixels,
    })
}
