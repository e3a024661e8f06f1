use std::sync::Arc;

use cgmath::{Matrix4, Vector3};
use p3d_ngin::{
    ChunkId, Level, LevelConfig, P3dError, ResourceManager, WorldPhysics,
    data_structures::texture::PixelFormat,
};

use crate::common::test_utils::*;

mod common;

fn load(bytes: Vec<u8>) -> (Level, ResourceManager, WorldPhysics, p3d_ngin::DispatchReport) {
    let mut level = Level::new(LevelConfig::default());
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();
    let report = level
        .load_bytes("test", bytes, &mut resources, &mut physics)
        .unwrap();
    (level, resources, physics, report)
}

fn write_art(dir: &std::path::Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn world_sphere_and_texture() {
    let (png, pixels) = rgb_png(64, 64);
    let (level, resources, _, report) = load(concat([
        world_sphere_chunk("sky_sphere", vec![mesh_chunk("dome"), mesh_chunk("clouds")]),
        texture_chunk("sky", &png),
    ]));

    assert!(report.failures.is_empty());
    let sphere = level.world_sphere.as_ref().unwrap();
    assert_eq!(sphere.meshes.len(), 2);
    assert!(level.entities.is_empty());
    assert_eq!(resources.texture_count(), 1);
    let texture = resources.texture("sky").unwrap();
    assert_eq!(texture.format, PixelFormat::Rgb8);
    assert_eq!(texture.pixels.len(), 64 * 64 * 3);
    assert_eq!(texture.pixels, pixels);
}

#[test]
fn last_world_sphere_wins() {
    let (level, ..) = load(concat([
        world_sphere_chunk("first", vec![]),
        world_sphere_chunk("second", vec![]),
    ]));
    assert_eq!(level.world_sphere.unwrap().name, "second");
}

#[test]
fn entities_are_routed_by_kind() {
    let (level, ..) = load(concat([
        static_entity_chunk("house", mesh_chunk("house_shape")),
        locator_chunk("spawn", [1.0, 2.0, 3.0]),
        static_entity_chunk("shed", mesh_chunk("shed_shape")),
    ]));

    assert_eq!(level.entities.len(), 2);
    assert_eq!(level.entities[0].name, "house");
    assert_eq!(level.entities[0].mesh.vertex_count(), 3);
    assert_eq!(level.entities[0].mesh.prim_groups[0].indices, vec![0, 1, 2]);

    let spawn = &level.locators[0];
    assert_eq!(spawn.position, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(spawn.data, vec![7, 9]);
    assert_eq!(spawn.triggers.len(), 1);
    assert_eq!(
        spawn.triggers[0].transform,
        Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
    );
}

#[test]
fn static_entity_without_mesh_is_malformed() {
    let bare = ChunkWriter::new()
        .string("bare")
        .u32(0)
        .u32(0)
        .build(ChunkId::STATIC_ENTITY);
    let (level, _, _, report) = load(bare);
    assert!(level.entities.is_empty());
    assert!(matches!(report.failures[0].error, P3dError::Malformed(_)));
}

#[test]
fn instanced_meshes_are_placed_and_shared() {
    let (level, _, _, report) = load(physics_instances_chunk(
        ChunkId::INSTANCED_STATIC_PHYSICS,
        "trees",
        &["oak", "pine"],
        &[("oak", [1.0, 0.0, 0.0]), ("pine", [2.0, 0.0, 0.0]), ("oak", [3.0, 0.0, 0.0])],
    ));

    assert!(report.failures.is_empty());
    assert_eq!(level.placed.len(), 3);
    assert!(level.placed.iter().all(|placed| !placed.dynamic));
    assert_eq!(level.placed[1].mesh.name, "pine");
    assert!(Arc::ptr_eq(&level.placed[0].mesh, &level.placed[2].mesh));
    assert_eq!(
        level.placed[2].transform,
        Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0))
    );
}

#[test]
fn dynamic_physics_instances_are_dynamic() {
    let (level, ..) = load(physics_instances_chunk(
        ChunkId::DYNAMIC_PHYSICS,
        "bins",
        &["bin"],
        &[("bin", [0.0, 0.0, 5.0])],
    ));
    assert_eq!(level.placed.len(), 1);
    assert!(level.placed[0].dynamic);
}

#[test]
fn unresolved_drawable_fails_the_chunk() {
    let (level, _, _, report) = load(concat([
        physics_instances_chunk(
            ChunkId::INSTANCED_STATIC_PHYSICS,
            "trees",
            &["oak"],
            &[("oak", [0.0; 3]), ("birch", [1.0, 0.0, 0.0])],
        ),
        locator_chunk("after", [0.0; 3]),
    ]));

    assert!(level.placed.is_empty());
    assert_eq!(level.locators.len(), 1);
    assert!(matches!(
        &report.failures[0].error,
        P3dError::DanglingReference { name, .. } if name == "birch"
    ));
}

#[test]
fn animated_instances_share_model_data() {
    let (level, ..) = load(anim_dynamic_physics_chunk(
        "flags",
        &[("flag_a", [0.0, 0.0, 0.0]), ("flag_b", [5.0, 0.0, 0.0])],
    ));

    assert_eq!(level.composite_models.len(), 2);
    let (a, b) = (&level.composite_models[0], &level.composite_models[1]);
    assert!(Arc::ptr_eq(a.data(), b.data()));
    assert_ne!(a.transform(), b.transform());
    assert_eq!(b.transform(), Matrix4::from_translation(Vector3::new(5.0, 0.0, 0.0)));

    let data = a.data();
    assert_eq!(data.meshes.len(), 1);
    let skeleton = data.skeleton.as_ref().unwrap();
    assert_eq!(skeleton.joints.len(), 2);
    assert_eq!(
        skeleton.world_rest_poses()[1],
        Matrix4::from_translation(Vector3::new(1.0, 1.0, 0.0))
    );
    assert_eq!(data.drawable.as_ref().unwrap().skeleton, "skel");
    assert!(data.mesh("body").is_some());
}

#[test]
fn missing_level_file_leaves_level_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut level = Level::new(LevelConfig::default().with_art_root(dir.path()));
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();

    let report = level
        .load_p3d("nonexistent.p3d", &mut resources, &mut physics)
        .unwrap();
    assert!(report.is_none());
    assert!(level.is_empty());
    assert_eq!(resources.texture_count(), 0);
}

#[test]
fn level_files_resolve_against_the_art_root() {
    let dir = tempfile::tempdir().unwrap();
    let (png, _) = rgb_png(4, 4);
    write_art(
        dir.path(),
        "l1z1.p3d",
        &concat([texture_chunk("grass", &png), locator_chunk("start", [0.0; 3])]),
    );

    let mut level = Level::new(LevelConfig::default().with_art_root(dir.path()));
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();
    let report = level
        .load_p3d("l1z1.p3d", &mut resources, &mut physics)
        .unwrap()
        .unwrap();

    assert_eq!(report.entities, 1);
    assert_eq!(report.applied, 1);
    assert_eq!(level.locators[0].name, "start");
    assert!(resources.texture("grass").is_some());
    assert_eq!(level.world_shader(), "world");
}

#[test]
fn corrupt_level_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = locator_chunk("start", [0.0; 3]);
    bytes.truncate(bytes.len() - 1);
    write_art(dir.path(), "broken.p3d", &bytes);

    let mut level = Level::new(LevelConfig::default().with_art_root(dir.path()));
    let result = level.load_p3d(
        "broken.p3d",
        &mut ResourceManager::new(),
        &mut WorldPhysics::default(),
    );
    let error = result.unwrap_err();
    assert!(error.downcast_ref::<P3dError>().is_some());
}

fn vehicle_file(name: &str) -> Vec<u8> {
    let (png, _) = rgb_png(2, 2);
    let texture = format!("{name}_tex");
    let body = format!("{name}_body");
    concat([
        shader_chunk(&format!("{name}_shader"), &texture),
        texture_chunk(&texture, &png),
        mesh_chunk(&body),
        skeleton_chunk(name),
        composite_drawable_chunk(name, name, &[body.as_str()]),
    ])
}

#[test]
fn vehicles_are_parked_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    write_art(dir.path(), "cars/first_v.p3d", &vehicle_file("first"));
    write_art(dir.path(), "cars/third_v.p3d", &vehicle_file("third"));

    let config = LevelConfig::default()
        .with_art_root(dir.path())
        .with_vehicles(["cars/first_v.p3d", "cars/missing_v.p3d", "cars/third_v.p3d"]);
    let mut level = Level::new(config);
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();

    assert_eq!(level.load_vehicles(&mut resources, &mut physics), 2);
    assert_eq!(level.composite_models.len(), 2);

    let first = &level.composite_models[0];
    let third = &level.composite_models[1];
    assert_eq!(first.name, "first_v");
    assert_eq!(third.name, "third_v");
    assert_eq!(
        first.transform(),
        Matrix4::from_translation(Vector3::new(240.0, 4.6, -160.0))
    );
    assert_eq!(
        third.transform(),
        Matrix4::from_translation(Vector3::new(243.0, 4.6, -160.0))
    );
    assert!(first.data().skeleton.is_some());
    assert!(resources.shader("third_shader").is_some());
    assert!(resources.texture("first_tex").is_some());
}

#[test]
fn region_commands_unload_then_load() {
    let dir = tempfile::tempdir().unwrap();
    write_art(dir.path(), "l1r2.p3d", &locator_chunk("region_marker", [0.0; 3]));

    let mut level = Level::new(LevelConfig::default().with_art_root(dir.path()));
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();
    level
        .dyna_load_data(
            "l1r2.p3d;l1r1.p3d:gone.p3d;l1i02.p3d@",
            &mut resources,
            &mut physics,
        )
        .unwrap();

    assert_eq!(level.unloaded_regions, vec!["l1r1.p3d"]);
    assert_eq!(level.locators.len(), 1);
    assert_eq!(level.locators[0].name, "region_marker");
}
