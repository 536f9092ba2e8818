//! Showcase configuration.
//!
//! Every field has a default, so an empty (or partial) TOML file is valid:
//!
//! ```
//! use vitrine::ShowcaseConfig;
//!
//! let config = ShowcaseConfig::from_toml_str("[scatter]\nseed = 7\n").unwrap();
//! assert_eq!(config.scatter.seed, Some(7));
//! assert_eq!(config.scatter.counts.boxes, 35);
//! ```

use crate::ecs::Shape;
use crate::text::TitleParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for the showcase binary and the composer.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub scatter: ScatterConfig,
    pub title: TitleParams,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    /// Scene clear color as linear RGB.
    pub background: [f32; 3],
}

impl ShowcaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Fix the scatter RNG seed for reproducible layouts.
    pub fn seed(mut self, seed: u64) -> Self {
        self.scatter.seed = Some(seed);
        self
    }

    pub fn counts(mut self, counts: ScatterCounts) -> Self {
        self.scatter.counts = counts;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Locations of every file the showcase reads.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Cube map faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub environment_map: [PathBuf; 6],
    /// Loaded with the scene but not bound to the material.
    pub textures: Vec<PathBuf>,
    pub title_font: PathBuf,
    pub panel_font: PathBuf,
    pub panel_font_size: f32,
}

impl Default for AssetPaths {
    fn default() -> Self {
        let face = |name: &str| PathBuf::from(format!("assets/textures/environmentMaps/3/{name}.jpg"));
        Self {
            environment_map: [
                face("px"),
                face("nx"),
                face("py"),
                face("ny"),
                face("pz"),
                face("nz"),
            ],
            textures: vec![
                PathBuf::from("assets/textures/door/metalness.jpg"),
                PathBuf::from("assets/textures/door/roughness.jpg"),
            ],
            title_font: PathBuf::from("assets/fonts/BrunoAceSC-Regular.ttf"),
            panel_font: PathBuf::from("assets/fonts/JetBrainsMono-Regular.ttf"),
            panel_font_size: 14.0,
        }
    }
}

/// How many primitives of each shape to scatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScatterCounts {
    pub boxes: usize,
    pub spheres: usize,
    pub tetrahedra: usize,
}

impl Default for ScatterCounts {
    fn default() -> Self {
        Self {
            boxes: 35,
            spheres: 10,
            tetrahedra: 5,
        }
    }
}

impl ScatterCounts {
    pub fn get(&self, shape: Shape) -> usize {
        match shape {
            Shape::Box => self.boxes,
            Shape::Sphere => self.spheres,
            Shape::Tetrahedron => self.tetrahedra,
            Shape::Title => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.boxes + self.spheres + self.tetrahedra
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub counts: ScatterCounts,
    /// Edge length of the cube, centered on the origin, that positions are
    /// drawn from.
    pub extent: f32,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            counts: ScatterCounts::default(),
            extent: 10.0,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [1.0, 1.0, 2.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_intensity: f32,
    pub point_intensity: f32,
    pub point_position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            point_intensity: 30.0,
            point_position: [2.0, 3.0, 4.0],
        }
    }
}
