//! Configuration for fog fading and object light levels.
//!
//! Loaded from `vision_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    illumination::ShadingMode,
    object_light::START_DIVIDE,
    tiles::MAX_ILLUMINATION,
};

pub const BUILTIN_VISION_CONFIG: &str = include_str!("data/vision_config.json");

/// Fog level above which a tile counts as known even before it is explored.
pub const MIN_ILLUM: f32 = 45.0;

/// Illumination units a tile may fade per second of real time.
pub const FADE_IN_PER_SECOND: f32 = 100.0;

/// Root configuration for the vision layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub fade: FadeConfig,
    pub shading_mode: ShadingMode,
    pub reveal_on_start: bool,
    pub object_light: ObjectLightConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            fade: FadeConfig::default(),
            shading_mode: ShadingMode::SinglePass,
            reveal_on_start: true,
            object_light: ObjectLightConfig::default(),
        }
    }
}

impl VisionConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_VISION_CONFIG)
                .expect("builtin vision config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, VisionConfigError> {
        let config: VisionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, VisionConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| VisionConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        VisionConfig::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), VisionConfigError> {
        let fade = &self.fade;
        if !(fade.per_second.is_finite() && fade.per_second > 0.0) {
            return Err(VisionConfigError::Invalid {
                field: "fade.per_second",
                reason: "must be a positive number",
            });
        }
        if !(0.0..=MAX_ILLUMINATION).contains(&fade.min_illumination) {
            return Err(VisionConfigError::Invalid {
                field: "fade.min_illumination",
                reason: "must lie within the illumination range",
            });
        }
        if self.object_light.start_divide == 0 {
            return Err(VisionConfigError::Invalid {
                field: "object_light.start_divide",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }

    /// Per-frame fade step for a frame lasting `delta_seconds`.
    pub fn fade_increment(&self, delta_seconds: f32) -> f32 {
        self.fade.per_second * delta_seconds.max(0.0)
    }
}

/// Fog fade tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub per_second: f32,
    pub min_illumination: f32,
    /// Grids at least this large fade on the rayon pool. Zero disables.
    pub parallel_min_tiles: usize,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            per_second: FADE_IN_PER_SECOND,
            min_illumination: MIN_ILLUM,
            parallel_min_tiles: 65_536,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectLightConfig {
    pub start_divide: u32,
}

impl Default for ObjectLightConfig {
    fn default() -> Self {
        Self {
            start_divide: START_DIVIDE,
        }
    }
}

#[derive(Debug, Error)]
pub enum VisionConfigError {
    #[error("failed to parse vision config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read vision config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid vision config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Handle for accessing the vision configuration.
#[derive(Resource, Debug, Clone)]
pub struct VisionConfigHandle(pub Arc<VisionConfig>);

impl VisionConfigHandle {
    pub fn new(config: Arc<VisionConfig>) -> Self {
        Self(config)
    }

    pub fn get(&self) -> Arc<VisionConfig> {
        Arc::clone(&self.0)
    }

    pub fn replace(&mut self, config: Arc<VisionConfig>) {
        self.0 = config;
    }
}

/// Where the active vision configuration came from.
#[derive(Resource, Debug, Clone)]
pub struct VisionConfigMetadata {
    path: Option<PathBuf>,
}

impl VisionConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load vision configuration from `VISION_CONFIG_PATH`, falling back to the builtin.
pub fn load_vision_config_from_env() -> (Arc<VisionConfig>, VisionConfigMetadata) {
    if let Some(path) = env::var("VISION_CONFIG_PATH").ok().map(PathBuf::from) {
        match VisionConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "skirmish::config",
                    path = %path.display(),
                    "vision_config.loaded=file"
                );
                return (Arc::new(config), VisionConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "skirmish::config",
                    path = %path.display(),
                    error = %err,
                    "vision_config.load_failed"
                );
            }
        }
    }

    let config = VisionConfig::builtin();
    tracing::info!(
        target: "skirmish::config",
        "vision_config.loaded=builtin"
    );
    (config, VisionConfigMetadata::new(None))
}
