//! Weights for target selection.
//!
//! Tile distance is the common currency: every other factor is expressed as
//! the number of tiles' worth of distance it is worth. Loaded from
//! `targeting_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_TARGETING_CONFIG: &str = include_str!("data/targeting_config.json");

/// Cost of one tile of distance.
pub const WEIGHT_DIST_TILE: i32 = 11;
pub const WEIGHT_DIST_TILE_DROID: i32 = WEIGHT_DIST_TILE;
pub const WEIGHT_DIST_TILE_STRUCT: i32 = WEIGHT_DIST_TILE;
/// Per 10% of damage already dealt. Near-dead targets are worth about 8 tiles.
pub const WEIGHT_HEALTH_DROID: i32 = WEIGHT_DIST_TILE;
pub const WEIGHT_HEALTH_STRUCT: i32 = WEIGHT_DIST_TILE;
pub const WEIGHT_NOT_VISIBLE_F: i32 = 10;
pub const WEIGHT_SERVICE_DROIDS: i32 = WEIGHT_DIST_TILE_DROID * 5;
pub const WEIGHT_WEAPON_DROIDS: i32 = WEIGHT_DIST_TILE_DROID * 3;
pub const WEIGHT_MILITARY_STRUCT: i32 = WEIGHT_DIST_TILE_STRUCT;
pub const WEIGHT_WEAPON_STRUCT: i32 = WEIGHT_WEAPON_DROIDS;
/// Still preferred over a defence four tiles closer.
pub const WEIGHT_DERRICK_STRUCT: i32 = WEIGHT_WEAPON_STRUCT + WEIGHT_DIST_TILE_STRUCT * 4;
/// Per 10% of construction still missing.
pub const WEIGHT_STRUCT_NOTBUILT_F: i32 = 8;
/// Only switch targets when the new one is four or more tiles' worth better.
pub const OLD_TARGET_THRESHOLD: i32 = WEIGHT_DIST_TILE * 4;

/// Root configuration for target selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TargetingConfig {
    pub weights: TargetWeights,
    /// Radius of the candidate search around a unit, in tiles.
    pub search_radius_tiles: i32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            weights: TargetWeights::default(),
            search_radius_tiles: 8,
        }
    }
}

/// The full weight table. Relative magnitudes carry the balance intent, so
/// overrides should be made with the whole table in view.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TargetWeights {
    pub dist_tile_droid: i32,
    pub dist_tile_struct: i32,
    pub health_droid: i32,
    pub health_struct: i32,
    pub not_visible: i32,
    pub service_droids: i32,
    pub weapon_droids: i32,
    pub military_struct: i32,
    pub weapon_struct: i32,
    pub derrick_struct: i32,
    pub struct_not_built: i32,
    pub old_target_threshold: i32,
}

impl Default for TargetWeights {
    fn default() -> Self {
        Self {
            dist_tile_droid: WEIGHT_DIST_TILE_DROID,
            dist_tile_struct: WEIGHT_DIST_TILE_STRUCT,
            health_droid: WEIGHT_HEALTH_DROID,
            health_struct: WEIGHT_HEALTH_STRUCT,
            not_visible: WEIGHT_NOT_VISIBLE_F,
            service_droids: WEIGHT_SERVICE_DROIDS,
            weapon_droids: WEIGHT_WEAPON_DROIDS,
            military_struct: WEIGHT_MILITARY_STRUCT,
            weapon_struct: WEIGHT_WEAPON_STRUCT,
            derrick_struct: WEIGHT_DERRICK_STRUCT,
            struct_not_built: WEIGHT_STRUCT_NOTBUILT_F,
            old_target_threshold: OLD_TARGET_THRESHOLD,
        }
    }
}

impl TargetingConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_TARGETING_CONFIG)
                .expect("builtin targeting config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, TargetingConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| TargetingConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = TargetingConfig::from_json_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum TargetingConfigError {
    #[error("failed to parse targeting config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read targeting config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle for accessing the targeting configuration.
#[derive(Resource, Debug, Clone)]
pub struct TargetingConfigHandle(pub Arc<TargetingConfig>);

impl TargetingConfigHandle {
    pub fn new(config: Arc<TargetingConfig>) -> Self {
        Self(config)
    }

    pub fn get(&self) -> Arc<TargetingConfig> {
        Arc::clone(&self.0)
    }

    pub fn replace(&mut self, config: Arc<TargetingConfig>) {
        self.0 = config;
    }
}

#[derive(Resource, Debug, Clone)]
pub struct TargetingConfigMetadata {
    path: Option<PathBuf>,
}

impl TargetingConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load targeting configuration from `TARGETING_CONFIG_PATH`, falling back to the builtin.
pub fn load_targeting_config_from_env() -> (Arc<TargetingConfig>, TargetingConfigMetadata) {
    if let Some(path) = env::var("TARGETING_CONFIG_PATH").ok().map(PathBuf::from) {
        match TargetingConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "skirmish::config",
                    path = %path.display(),
                    "targeting_config.loaded=file"
                );
                return (Arc::new(config), TargetingConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "skirmish::config",
                    path = %path.display(),
                    error = %err,
                    "targeting_config.load_failed"
                );
            }
        }
    }

    let config = TargetingConfig::builtin();
    tracing::info!(
        target: "skirmish::config",
        "targeting_config.loaded=builtin"
    );
    (config, TargetingConfigMetadata::new(None))
}
