//! GPU upload of decoded textures and meshes.
//!
//! The loader itself is renderer agnostic. These helpers hand decoded data to
//! `wgpu` for renderers that use it; nothing in the parse path calls them.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    mesh::{Mesh, PrimitiveType},
    texture::Texture,
};

/// A texture living on the GPU with a view and sampler.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Uploads `texture` as `Rgba8UnormSrgb`. RGB textures are expanded to RGBA since
/// wgpu has no three channel 8-bit format.
pub fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, texture: &Texture) -> GpuTexture {
    let rgba = texture.to_rgba8();
    let size = wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: 1,
    };
    let format = wgpu::TextureFormat::Rgba8UnormSrgb;
    let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&texture.name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &gpu_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        &rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * texture.width),
            rows_per_image: Some(texture.height),
        },
        size,
    );

    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        texture: gpu_texture,
        view,
        sampler: create_default_sampler(device),
    }
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Buffers for one prim group. Draw with `num_indices` if `index_buffer` is set,
/// `num_vertices` otherwise.
#[derive(Debug)]
pub struct GpuPrimGroup {
    pub shader: String,
    pub topology: wgpu::PrimitiveTopology,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub num_vertices: u32,
    pub num_indices: u32,
}

pub fn topology(primitive: PrimitiveType) -> wgpu::PrimitiveTopology {
    match primitive {
        PrimitiveType::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        PrimitiveType::LineList => wgpu::PrimitiveTopology::LineList,
        PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
    }
}

pub fn upload_mesh(device: &wgpu::Device, mesh: &Mesh) -> Vec<GpuPrimGroup> {
    mesh.prim_groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let vertices = group.vertices();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer {i}", mesh.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = (!group.indices.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer {i}", mesh.name)),
                    contents: bytemuck::cast_slice(&group.indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
            });

            GpuPrimGroup {
                shader: group.shader.clone(),
                topology: topology(group.primitive),
                vertex_buffer,
                index_buffer,
                num_vertices: vertices.len() as u32,
                num_indices: group.indices.len() as u32,
            }
        })
        .collect()
}
