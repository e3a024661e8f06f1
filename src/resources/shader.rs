use std::io::{Read, Seek};

use crate::{
    chunk::{ChunkFile, ChunkId, Decoded, Sinks},
    data_structures::shader::{Shader, ShaderParam, ShaderParamValue},
    error::Result,
};

pub const SHADER_VERSION: u32 = 0;

pub fn read_shader<R: Read + Seek>(file: &mut ChunkFile<R>) -> Result<Shader> {
    let name = file.read_string()?;
    file.expect_version("Shader", SHADER_VERSION)?;
    let pddi_shader = file.read_string()?;
    let has_translucency = file.read_u32()? != 0;
    let vertex_needs = file.read_u32()?;
    let vertex_mask = file.read_u32()?;
    let _param_count = file.read_u32()?;

    let mut params = Vec::new();
    file.children(|file, id| {
        if !matches!(
            id,
            ChunkId::SHADER_TEXTURE_PARAM
                | ChunkId::SHADER_INT_PARAM
                | ChunkId::SHADER_FLOAT_PARAM
                | ChunkId::SHADER_COLOUR_PARAM
        ) {
            log::debug!("Unhandled chunk {id} in shader {name}");
            return Ok(());
        }
        let param = file.read_string()?;
        let value = match id {
            ChunkId::SHADER_TEXTURE_PARAM => ShaderParamValue::Texture(file.read_string()?),
            ChunkId::SHADER_INT_PARAM => ShaderParamValue::Int(file.read_u32()?),
            ChunkId::SHADER_FLOAT_PARAM => ShaderParamValue::Float(file.read_f32()?),
            _ => ShaderParamValue::Colour(argb_to_rgba(file.read_u32()?)),
        };
        params.push(ShaderParam { name: param, value });
        Ok(())
    })?;

    Ok(Shader {
        name,
        pddi_shader,
        has_translucency,
        vertex_needs,
        vertex_mask,
        params,
    })
}

pub(crate) fn argb_to_rgba(argb: u32) -> [u8; 4] {
    let [b, g, r, a] = argb.to_le_bytes();
    [r, g, b, a]
}

pub fn decode_shader<R: Read + Seek>(
    file: &mut ChunkFile<R>,
    sinks: &mut Sinks<'_>,
) -> Result<Decoded> {
    let shader = read_shader(file)?;
    sinks.resources.load_shader(shader);
    Ok(Decoded::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_are_stored_argb() {
        assert_eq!(argb_to_rgba(0x80FF_2010), [0xFF, 0x20, 0x10, 0x80]);
    }
}
