//! Loads a level file and prints what it contains.
//!
//! ```text
//! p3d-dump <file.p3d> [--export-textures <dir>]
//! ```
//!
//! The file path is used as-is. Set `RUST_LOG=debug` to see every skipped chunk.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use p3d_ngin::{Level, LevelConfig, ResourceManager, WorldPhysics};

struct Args {
    file: PathBuf,
    export_textures: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut file = None;
    let mut export_textures = None;
    let mut args = std::env::args_os().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--export-textures" {
            let dir = args.next().context("--export-textures needs a directory")?;
            export_textures = Some(PathBuf::from(dir));
        } else if file.is_none() {
            file = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument {}", arg.to_string_lossy());
        }
    }
    let file = file.context("usage: p3d-dump <file.p3d> [--export-textures <dir>]")?;
    Ok(Args {
        file,
        export_textures,
    })
}

fn export_textures(resources: &ResourceManager, dir: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut exported = 0;
    for texture in resources.textures() {
        let Some(image) = texture.to_image() else {
            log::warn!("Texture {} has an inconsistent pixel buffer", texture.name);
            continue;
        };
        let file_name: String = texture
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        let path = dir.join(format!("{file_name}.png"));
        image
            .save(&path)
            .with_context(|| format!("write {}", path.display()))?;
        exported += 1;
    }
    Ok(exported)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let (art_root, file_name) = match (args.file.parent(), args.file.file_name()) {
        (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_string_lossy().into_owned()),
        _ => bail!("not a file path: {}", args.file.display()),
    };
    let mut level = Level::new(LevelConfig::default().with_art_root(art_root));
    let mut resources = ResourceManager::new();
    let mut physics = WorldPhysics::default();

    let Some(report) = level.load_p3d(&file_name, &mut resources, &mut physics)? else {
        bail!("{} not found", args.file.display());
    };

    println!("{}", args.file.display());
    println!("  chunks:            {}", report.chunks());
    println!("  unknown chunks:    {}", report.unknown);
    println!("  failed chunks:     {}", report.failures.len());
    for failure in &report.failures {
        println!("    {} at {}: {}", failure.id, failure.offset, failure.error);
    }
    println!("  static entities:   {}", level.entities.len());
    println!("  placed entities:   {}", level.placed.len());
    println!("  composite models:  {}", level.composite_models.len());
    println!("  locators:          {}", level.locators.len());
    println!(
        "  world sphere:      {}",
        level.world_sphere.as_ref().map_or("-", |sphere| sphere.name.as_str())
    );
    println!("  textures:          {}", resources.texture_count());
    println!("  shaders:           {}", resources.shader_count());
    println!("  collision objects: {}", physics.collision_objects.len());
    println!("  intersects:        {}", physics.intersects.len());
    println!("  fences:            {}", physics.fences.len());

    if let Some(dir) = args.export_textures {
        let exported = export_textures(&resources, &dir)?;
        println!("exported {exported} textures to {}", dir.display());
    }
    Ok(())
}
