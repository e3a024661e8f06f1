#![allow(dead_code)]

use std::io::Cursor;

use p3d_ngin::{ChunkFile, ChunkId};

/// Little-endian payload builder for hand-made containers.
#[derive(Clone, Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.buf.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(mut self, value: i32) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn f32(mut self, value: f32) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn vec3(self, [x, y, z]: [f32; 3]) -> Self {
        self.f32(x).f32(y).f32(z)
    }

    /// Column-major 4x4 matrix.
    pub fn matrix(mut self, columns: [f32; 16]) -> Self {
        for value in columns {
            self = self.f32(value);
        }
        self
    }

    pub fn translation(self, [x, y, z]: [f32; 3]) -> Self {
        self.matrix([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    pub fn string(mut self, value: &str) -> Self {
        self.buf.push(value.len() as u8);
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Appends an already framed chunk.
    pub fn child(self, chunk: Vec<u8>) -> Self {
        self.bytes(&chunk)
    }

    pub fn children(mut self, chunks: impl IntoIterator<Item = Vec<u8>>) -> Self {
        for chunk in chunks {
            self = self.child(chunk);
        }
        self
    }

    /// Frames the payload as a chunk.
    pub fn build(self, id: ChunkId) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buf.len() + 8);
        out.extend_from_slice(&id.0.to_le_bytes());
        out.extend_from_slice(&(self.buf.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.buf);
        out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub fn cursor(bytes: Vec<u8>) -> ChunkFile<Cursor<Vec<u8>>> {
    ChunkFile::new(Cursor::new(bytes)).unwrap()
}

pub fn concat(chunks: impl IntoIterator<Item = Vec<u8>>) -> Vec<u8> {
    chunks.into_iter().flatten().collect()
}

// ---- chunk fixtures ----

pub fn image_data_chunk(data: &[u8]) -> Vec<u8> {
    ChunkWriter::new()
        .u32(data.len() as u32)
        .bytes(data)
        .build(ChunkId::IMAGE_DATA)
}

pub fn image_chunk(name: &str, format: u32, data: &[u8]) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(14000)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(format)
        .child(image_data_chunk(data))
        .build(ChunkId::IMAGE)
}

pub fn texture_chunk_with_image(name: &str, image: Vec<u8>) -> Vec<u8> {
    texture_chunk_with_images(name, vec![image])
}

pub fn texture_chunk_with_images(name: &str, images: Vec<Vec<u8>>) -> Vec<u8> {
    let mut writer = ChunkWriter::new().string(name).u32(14000);
    for _ in 0..8 {
        writer = writer.u32(0);
    }
    writer.children(images).build(ChunkId::TEXTURE)
}

/// A texture holding a PNG image. The image chunk gets a different name than the
/// texture.
pub fn texture_chunk(name: &str, png: &[u8]) -> Vec<u8> {
    texture_chunk_with_image(name, image_chunk(&format!("{name}_img"), 1, png))
}

pub fn shader_chunk(name: &str, texture: &str) -> Vec<u8> {
    shader_chunk_versioned(name, 0, texture)
}

pub fn shader_chunk_versioned(name: &str, version: u32, texture: &str) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(version)
        .string("simple")
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(2)
        .child(
            ChunkWriter::new()
                .string("TEX")
                .string(texture)
                .build(ChunkId::SHADER_TEXTURE_PARAM),
        )
        .child(
            ChunkWriter::new()
                .string("DIFF")
                .u32(0xFF10_2030)
                .build(ChunkId::SHADER_COLOUR_PARAM),
        )
        .build(ChunkId::SHADER)
}

pub fn prim_group_chunk(shader: &str, primitive: u32, positions: &[[f32; 3]], indices: &[u32]) -> Vec<u8> {
    let mut position_list = ChunkWriter::new().u32(positions.len() as u32);
    for position in positions {
        position_list = position_list.vec3(*position);
    }
    let mut index_list = ChunkWriter::new().u32(indices.len() as u32);
    for index in indices {
        index_list = index_list.u32(*index);
    }
    ChunkWriter::new()
        .u32(0)
        .string(shader)
        .u32(primitive)
        .u32(0)
        .u32(positions.len() as u32)
        .u32(indices.len() as u32)
        .u32(0)
        .child(position_list.build(ChunkId::POSITION_LIST))
        .child(index_list.build(ChunkId::INDEX_LIST))
        .build(ChunkId::PRIM_GROUP)
}

pub const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

pub fn mesh_chunk(name: &str) -> Vec<u8> {
    mesh_chunk_with_groups(name, vec![prim_group_chunk("shader", 0, &TRIANGLE, &[0, 1, 2])])
}

pub fn mesh_chunk_with_groups(name: &str, groups: Vec<Vec<u8>>) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .u32(groups.len() as u32)
        .children(groups)
        .build(ChunkId::MESH)
}

pub fn world_sphere_chunk(name: &str, meshes: Vec<Vec<u8>>) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(1)
        .u32(meshes.len() as u32)
        .u32(0)
        .u32(0)
        .children(meshes)
        .build(ChunkId::WORLD_SPHERE)
}

pub fn static_entity_chunk(name: &str, mesh: Vec<u8>) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .u32(0)
        .child(mesh)
        .build(ChunkId::STATIC_ENTITY)
}

pub fn locator_chunk(name: &str, position: [f32; 3]) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(3)
        .u32(2)
        .u32(7)
        .u32(9)
        .vec3(position)
        .u32(1)
        .child(
            ChunkWriter::new()
                .string("trigger")
                .u32(1)
                .vec3([2.0, 2.0, 2.0])
                .translation(position)
                .build(ChunkId::TRIGGER_VOLUME),
        )
        .build(ChunkId::LOCATOR)
}

pub fn drawable_chunk(name: &str) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .string(name)
        .u32(0)
        .build(ChunkId::SCENEGRAPH_DRAWABLE)
}

/// Instance list with one translated drawable per entry.
pub fn instance_list_chunk(name: &str, drawables: &[(&str, [f32; 3])]) -> Vec<u8> {
    let transforms = drawables.iter().map(|(drawable, position)| {
        ChunkWriter::new()
            .string(&format!("{drawable}_xform"))
            .u32(1)
            .translation(*position)
            .child(drawable_chunk(drawable))
            .build(ChunkId::SCENEGRAPH_TRANSFORM)
    });
    let branch = ChunkWriter::new()
        .string("branch")
        .u32(drawables.len() as u32)
        .children(transforms)
        .build(ChunkId::SCENEGRAPH_BRANCH);
    let root = ChunkWriter::new().child(branch).build(ChunkId::SCENEGRAPH_ROOT);
    let scenegraph = ChunkWriter::new()
        .string(name)
        .u32(0)
        .child(root)
        .build(ChunkId::SCENEGRAPH);
    ChunkWriter::new()
        .string(name)
        .child(scenegraph)
        .build(ChunkId::INSTANCE_LIST)
}

/// Instance list whose single drawable sits under `depth` nested transforms.
pub fn nested_instance_list_chunk(name: &str, drawable: &str, depth: usize) -> Vec<u8> {
    let mut node = drawable_chunk(drawable);
    for _ in 0..depth {
        node = ChunkWriter::new()
            .string("xform")
            .u32(1)
            .translation([0.0, 1.0, 0.0])
            .child(node)
            .build(ChunkId::SCENEGRAPH_TRANSFORM);
    }
    let root = ChunkWriter::new().child(node).build(ChunkId::SCENEGRAPH_ROOT);
    let scenegraph = ChunkWriter::new()
        .string(name)
        .u32(0)
        .child(root)
        .build(ChunkId::SCENEGRAPH);
    ChunkWriter::new()
        .string(name)
        .child(scenegraph)
        .build(ChunkId::INSTANCE_LIST)
}

/// InstancedStaticPhysics or DynamicPhysics.
pub fn physics_instances_chunk(id: ChunkId, name: &str, meshes: &[&str], drawables: &[(&str, [f32; 3])]) -> Vec<u8> {
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .u32(0)
        .children(meshes.iter().map(|mesh| mesh_chunk(mesh)))
        .child(instance_list_chunk(&format!("{name}_instances"), drawables))
        .build(id)
}

pub fn skeleton_chunk(name: &str) -> Vec<u8> {
    let joint = |name: &str, parent: u32, position: [f32; 3]| {
        ChunkWriter::new()
            .string(name)
            .u32(parent)
            .i32(7)
            .i32(0)
            .i32(1)
            .i32(2)
            .i32(0)
            .translation(position)
            .build(ChunkId::SKELETON_JOINT)
    };
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .u32(2)
        .child(joint("root", 0, [0.0, 1.0, 0.0]))
        .child(joint("wheel", 0, [1.0, 0.0, 0.0]))
        .build(ChunkId::SKELETON)
}

pub fn composite_drawable_chunk(name: &str, skeleton: &str, props: &[&str]) -> Vec<u8> {
    let props = props.iter().enumerate().map(|(i, prop)| {
        ChunkWriter::new()
            .string(prop)
            .u32(0)
            .u32(i as u32)
            .build(ChunkId::COMPOSITE_DRAWABLE_PROP)
    });
    let list = ChunkWriter::new()
        .u32(props.len() as u32)
        .children(props)
        .build(ChunkId::COMPOSITE_DRAWABLE_PROP_LIST);
    ChunkWriter::new()
        .string(name)
        .string(skeleton)
        .child(list)
        .build(ChunkId::COMPOSITE_DRAWABLE)
}

pub fn anim_dynamic_physics_chunk(name: &str, drawables: &[(&str, [f32; 3])]) -> Vec<u8> {
    let wrapper = ChunkWriter::new()
        .string(&format!("{name}_wrapper"))
        .u32(0)
        .u32(0)
        .child(mesh_chunk("body"))
        .child(skeleton_chunk("skel"))
        .child(composite_drawable_chunk("comp", "skel", &["body"]))
        .build(ChunkId::ANIM_OBJECT_WRAPPER);
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .u32(0)
        .child(wrapper)
        .child(instance_list_chunk(&format!("{name}_instances"), drawables))
        .build(ChunkId::ANIM_DYNAMIC_PHYSICS)
}

pub fn collision_vector(v: [f32; 3]) -> Vec<u8> {
    ChunkWriter::new().vec3(v).build(ChunkId::COLLISION_VECTOR)
}

/// A collision volume nested `depth` levels deep, the innermost holding a box.
///
/// Headers are written outermost first so deep nests don't re-copy the payload.
pub fn nested_volume_chunk(depth: usize) -> Vec<u8> {
    let innermost = ChunkWriter::new().u32(0).build(ChunkId::COLLISION_BBOX);
    let mut out = Vec::with_capacity(depth * 20 + innermost.len());
    // level 0 is the innermost volume
    for level in (0..depth).rev() {
        let payload = 12 + innermost.len() + level * 20;
        out.extend_from_slice(&ChunkId::COLLISION_VOLUME.0.to_le_bytes());
        out.extend_from_slice(&(payload as u32).to_le_bytes());
        out.extend(
            ChunkWriter::new()
                .u32(0)
                .i32(-1)
                .u32(u32::from(level > 0))
                .into_bytes(),
        );
    }
    out.extend(innermost);
    out
}

/// StaticPhysics whose collision object holds `volume`.
pub fn static_physics_with_volume(name: &str, volume: Vec<u8>) -> Vec<u8> {
    let object = ChunkWriter::new()
        .string(&format!("{name}_object"))
        .u32(0)
        .string("concrete")
        .u32(0)
        .u32(0)
        .child(volume)
        .build(ChunkId::COLLISION_OBJECT);
    ChunkWriter::new()
        .string(name)
        .u32(0)
        .child(object)
        .build(ChunkId::STATIC_PHYSICS)
}

/// Overwrites the version that follows the name of a `name`d chunk.
pub fn with_version(mut chunk: Vec<u8>, name: &str, version: u32) -> Vec<u8> {
    let at = 8 + 1 + name.len();
    chunk[at..at + 4].copy_from_slice(&version.to_le_bytes());
    chunk
}

/// StaticPhysics with a bounding box volume holding a sphere and a wall.
pub fn static_physics_chunk(name: &str) -> Vec<u8> {
    let sphere = ChunkWriter::new()
        .f32(2.5)
        .child(collision_vector([1.0, 2.0, 3.0]))
        .build(ChunkId::COLLISION_SPHERE);
    let wall = ChunkWriter::new()
        .child(collision_vector([0.0, 0.0, 0.0]))
        .child(collision_vector([0.0, 1.0, 0.0]))
        .build(ChunkId::COLLISION_WALL);
    let sphere_volume = ChunkWriter::new().u32(0).i32(-1).u32(0).child(sphere).build(ChunkId::COLLISION_VOLUME);
    let wall_volume = ChunkWriter::new().u32(0).i32(-1).u32(0).child(wall).build(ChunkId::COLLISION_VOLUME);
    let volume = ChunkWriter::new()
        .u32(0)
        .i32(-1)
        .u32(2)
        .child(ChunkWriter::new().u32(0).build(ChunkId::COLLISION_BBOX))
        .child(sphere_volume)
        .child(wall_volume)
        .build(ChunkId::COLLISION_VOLUME);
    static_physics_with_volume(name, volume)
}

/// An intersect holding a single triangle.
pub fn intersect_chunk(name: &str) -> Vec<u8> {
    let mut writer = ChunkWriter::new().string(name).u32(0).u32(3).u32(0).u32(1).u32(2).u32(3);
    for position in TRIANGLE {
        writer = writer.vec3(position);
    }
    writer = writer.u32(1).vec3([0.0, 0.0, 1.0]);
    writer
        .child(
            ChunkWriter::new()
                .vec3([0.0, 0.0, 0.0])
                .vec3([1.0, 1.0, 0.0])
                .build(ChunkId::BOUNDING_BOX),
        )
        .child(
            ChunkWriter::new()
                .vec3([0.5, 0.5, 0.0])
                .f32(0.75)
                .build(ChunkId::BOUNDING_SPHERE),
        )
        .child(ChunkWriter::new().u32(0).u32(1).u8(4).build(ChunkId::TERRAIN_TYPE_LIST))
        .build(ChunkId::INTERSECT)
}

pub fn fence_wrapper_chunk(start: [f32; 3], end: [f32; 3]) -> Vec<u8> {
    ChunkWriter::new()
        .child(
            ChunkWriter::new()
                .vec3(start)
                .vec3(end)
                .vec3([0.0, 0.0, 1.0])
                .build(ChunkId::FENCE),
        )
        .build(ChunkId::FENCE_WRAPPER)
}

// ---- png fixtures ----

pub struct PngSpec<'a> {
    pub width: u32,
    pub height: u32,
    pub color: png::ColorType,
    pub depth: png::BitDepth,
    pub palette: Option<&'a [u8]>,
    pub trns: Option<&'a [u8]>,
}

pub fn encode_png(spec: PngSpec<'_>, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, spec.width, spec.height);
        encoder.set_color(spec.color);
        encoder.set_depth(spec.depth);
        if let Some(palette) = spec.palette {
            encoder.set_palette(palette.to_vec());
        }
        if let Some(trns) = spec.trns {
            encoder.set_trns(trns.to_vec());
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    out
}

/// 8-bit RGB gradient, returned with its raw pixels.
pub fn rgb_png(width: u32, height: u32) -> (Vec<u8>, Vec<u8>) {
    let pixels: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [x as u8, y as u8, (x ^ y) as u8]))
        .collect();
    let png = encode_png(
        PngSpec {
            width,
            height,
            color: png::ColorType::Rgb,
            depth: png::BitDepth::Eight,
            palette: None,
            trns: None,
        },
        &pixels,
    );
    (png, pixels)
}

pub fn grayscale_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(
        PngSpec {
            width,
            height,
            color: png::ColorType::Grayscale,
            depth: png::BitDepth::Eight,
            palette: None,
            trns: None,
        },
        &vec![128; (width * height) as usize],
    )
}
