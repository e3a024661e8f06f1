//! Loader configuration.

use std::path::PathBuf;

/// Environment variable overriding [`LevelConfig::art_root`].
pub const ART_ROOT_ENV: &str = "P3D_ART_ROOT";

const DEFAULT_VEHICLES: [&str; 7] = [
    "cars/mrplo_v.p3d",
    "cars/carhom_v.p3d",
    "cars/krust_v.p3d",
    "cars/cDuff.p3d",
    "cars/bart_v.p3d",
    "cars/snake_v.p3d",
    "cars/wiggu_v.p3d",
];

#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    /// Directory level, region and vehicle file names are resolved against.
    pub art_root: PathBuf,
    /// Name of the shader program the renderer should draw world geometry with.
    pub world_shader: String,
    /// Vehicle model files (relative to `art_root`) loaded by `Level::load_vehicles`.
    pub vehicles: Vec<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            art_root: PathBuf::from("./art"),
            world_shader: "world".to_string(),
            vehicles: DEFAULT_VEHICLES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl LevelConfig {
    /// Defaults, with `art_root` taken from `P3D_ART_ROOT` when set.
    pub fn from_env() -> Self {
        Self::from_art_root(std::env::var_os(ART_ROOT_ENV).map(PathBuf::from))
    }

    fn from_art_root(art_root: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(art_root) = art_root {
            config.art_root = art_root;
        }
        config
    }

    pub fn with_art_root(mut self, art_root: impl Into<PathBuf>) -> Self {
        self.art_root = art_root.into();
        self
    }

    pub fn with_vehicles<S: Into<String>>(mut self, vehicles: impl IntoIterator<Item = S>) -> Self {
        self.vehicles = vehicles.into_iter().map(Into::into).collect();
        self
    }
}
