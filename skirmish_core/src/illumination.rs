//! Target brightness of a tile before fog dimming.
//!
//! For display only. Nothing here may feed back into game state.

use serde::{Deserialize, Serialize};

use crate::tiles::MapTile;

/// Which terrain shading path the renderer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Sunlight is computed in shaders; the fog lightmap only needs occlusion.
    #[default]
    SinglePass,
    /// Baked per-tile lighting.
    Fallback,
}

#[inline]
pub fn target_illumination(tile: &MapTile, mode: ShadingMode) -> f32 {
    match mode {
        ShadingMode::SinglePass => tile.ambient_occlusion,
        ShadingMode::Fallback => tile.illumination,
    }
}
