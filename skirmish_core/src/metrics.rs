use bevy::prelude::*;

use crate::{
    fade::FadeFrame, frame::FrameClock, illumination::target_illumination, player::LocalObserver,
    tiles::TileGrid, vision::PlayerVision, vision_config::VisionConfigHandle,
};

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct FogMetrics {
    pub frame: u64,
    pub grid_size: (u32, u32),
    /// Tiles the fade engine currently drives.
    pub known_tiles: usize,
    /// Known tiles that have not reached their target yet.
    pub fading_tiles: usize,
    /// Tiles rendered fully black.
    pub dark_tiles: usize,
    pub mean_level: f32,
    /// Mean static light over the map, for comparison with `mean_level`.
    pub mean_target: f32,
}

pub fn collect_fog_metrics(
    mut metrics: ResMut<FogMetrics>,
    grid: Res<TileGrid>,
    clock: Res<FrameClock>,
    vision: Res<PlayerVision>,
    observer: Res<LocalObserver>,
    config: Res<VisionConfigHandle>,
) {
    let cfg = config.0.as_ref();
    let frame = FadeFrame::new(
        vision.as_ref(),
        observer.0,
        cfg.shading_mode,
        0.0,
        cfg.fade.min_illumination,
    );

    let mut known = 0usize;
    let mut fading = 0usize;
    let mut dark = 0usize;
    let mut total_level = 0f64;
    let mut total_target = 0f64;

    for tile in grid.tiles() {
        if frame.is_known(tile) {
            known += 1;
            if tile.level != frame.faded_target(tile) {
                fading += 1;
            }
        }
        if tile.level <= 0.0 {
            dark += 1;
        }
        total_level += tile.level as f64;
        total_target += target_illumination(tile, cfg.shading_mode) as f64;
    }

    let count = grid.len();
    metrics.frame = clock.frame();
    metrics.grid_size = (grid.width(), grid.height());
    metrics.known_tiles = known;
    metrics.fading_tiles = fading;
    metrics.dark_tiles = dark;
    if count > 0 {
        metrics.mean_level = (total_level / count as f64) as f32;
        metrics.mean_target = (total_target / count as f64) as f32;
    } else {
        metrics.mean_level = 0.0;
        metrics.mean_target = 0.0;
    }

    tracing::trace!(
        target: "skirmish::fog",
        frame = metrics.frame,
        known,
        fading,
        dark,
        mean_level = metrics.mean_level,
        "fog.metrics"
    );
}
