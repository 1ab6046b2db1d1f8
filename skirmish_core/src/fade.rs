//! Smooth fog transitions for terrain visibility.
//!
//! Two systems run each frame, in order:
//! 1. `refresh_visibility_baseline` - reset levels after a map load or reveal toggle
//! 2. `advance_visibility_fade` - step every known tile toward its target
//!
//! Both are thin wrappers over the pure passes below so the same logic can be
//! driven outside an `App`.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::{
    frame::FrameClock,
    illumination::{target_illumination, ShadingMode},
    player::{LocalObserver, PlayerId, PlayerMask},
    reveal::RevealMode,
    tiles::{MapTile, TileGrid},
    vision::{PlayerVision, VisionQuery},
    vision_config::VisionConfigHandle,
};

/// Tiles handed to each rayon job in the parallel pass.
const PARALLEL_CHUNK_TILES: usize = 4_096;

/// Everything one fade pass needs, resolved once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeFrame {
    pub observer: PlayerMask,
    pub alliance_bits: PlayerMask,
    pub satellite_uplink: PlayerMask,
    pub omniscient: bool,
    pub mode: ShadingMode,
    pub increment: f32,
    pub min_illumination: f32,
}

impl FadeFrame {
    pub fn new<V: VisionQuery + ?Sized>(
        vision: &V,
        observer: PlayerId,
        mode: ShadingMode,
        increment: f32,
        min_illumination: f32,
    ) -> Self {
        Self {
            observer: PlayerMask::single(observer),
            alliance_bits: vision.alliance_bits(observer),
            satellite_uplink: vision.satellite_uplink(),
            omniscient: vision.is_omniscient(),
            mode,
            increment,
            min_illumination,
        }
    }

    /// A tile counts as seen once it has brightened past the threshold or
    /// the observer has explored it.
    #[inline]
    pub fn is_known(&self, tile: &MapTile) -> bool {
        tile.level > self.min_illumination || tile.explored_by.intersects(self.observer)
    }

    /// Target level for a known tile: full brightness while the observer or an
    /// ally watches it, half brightness from memory alone.
    #[inline]
    pub fn faded_target(&self, tile: &MapTile) -> f32 {
        let target = target_illumination(tile, self.mode);
        let watched = self
            .alliance_bits
            .intersects(self.satellite_uplink | tile.sensor_coverage);
        if !self.omniscient && !watched {
            target / 2.0
        } else {
            target
        }
    }

    #[inline]
    pub fn apply(&self, tile: &mut MapTile) {
        if !self.is_known(tile) {
            return;
        }
        let target = self.faded_target(tile);
        tile.level = step_toward(tile.level, target, self.increment);
    }
}

/// Move `level` toward `target` by at most `increment`, never past it.
#[inline]
pub fn step_toward(level: f32, target: f32, increment: f32) -> f32 {
    if level > target {
        (level - increment).max(target)
    } else if level < target {
        (level + increment).min(target)
    } else {
        level
    }
}

/// Sequential fade pass over a slice of tiles.
pub fn fade_tiles(tiles: &mut [MapTile], frame: &FadeFrame) {
    for tile in tiles.iter_mut() {
        frame.apply(tile);
    }
}

/// Fade pass split across the rayon pool by disjoint tile ranges.
///
/// Tiles never read each other, so the result matches [`fade_tiles`].
pub fn fade_tiles_parallel(tiles: &mut [MapTile], frame: &FadeFrame) {
    tiles
        .par_chunks_mut(PARALLEL_CHUNK_TILES)
        .for_each(|chunk| fade_tiles(chunk, frame));
}

/// Reset every tile's level to its starting value.
///
/// Unseen tiles start as dim fog when reveal mode is on and black otherwise;
/// tiles the observer can already see start at full brightness so they never
/// fade in on load.
pub fn preprocess_visibility<V: VisionQuery + ?Sized>(
    grid: &mut TileGrid,
    reveal: &RevealMode,
    vision: &V,
    observer: PlayerId,
    mode: ShadingMode,
    min_illumination: f32,
) {
    let revealed = reveal.reveal_status();
    for tile in grid.tiles_mut() {
        let target = target_illumination(tile, mode);
        tile.level = if revealed {
            min_illumination.min(target / 4.0)
        } else {
            0.0
        };
        if vision.tile_visible(observer, tile) {
            tile.level = target;
        }
    }
}

/// Re-run pre-processing after a map load or a reveal mode change.
///
/// Writing the reveal flag with its current value is not a change.
pub fn refresh_visibility_baseline(
    mut grid: ResMut<TileGrid>,
    reveal: Res<RevealMode>,
    vision: Res<PlayerVision>,
    observer: Res<LocalObserver>,
    config: Res<VisionConfigHandle>,
    mut applied_reveal: Local<Option<bool>>,
) {
    let requested = grid.take_baseline_request();
    let toggled = *applied_reveal != Some(reveal.reveal_status());
    if !(requested || toggled) {
        return;
    }
    *applied_reveal = Some(reveal.reveal_status());
    let cfg = config.0.as_ref();
    preprocess_visibility(
        &mut grid,
        &reveal,
        vision.as_ref(),
        observer.0,
        cfg.shading_mode,
        cfg.fade.min_illumination,
    );
    tracing::info!(
        target: "skirmish::fog",
        width = grid.width(),
        height = grid.height(),
        reveal = reveal.reveal_status(),
        observer = %observer.0,
        "fog.baseline_applied"
    );
}

/// Advance the fog by one rendered frame.
pub fn advance_visibility_fade(
    mut grid: ResMut<TileGrid>,
    clock: Res<FrameClock>,
    vision: Res<PlayerVision>,
    observer: Res<LocalObserver>,
    config: Res<VisionConfigHandle>,
) {
    let cfg = config.0.as_ref();
    let increment = cfg.fade_increment(clock.delta_seconds());
    let frame = FadeFrame::new(
        vision.as_ref(),
        observer.0,
        cfg.shading_mode,
        increment,
        cfg.fade.min_illumination,
    );

    let parallel =
        cfg.fade.parallel_min_tiles > 0 && grid.len() >= cfg.fade.parallel_min_tiles;
    let _span = tracing::trace_span!(
        target: "skirmish::fog",
        "advance_visibility_fade",
        frame = clock.frame(),
        increment,
        parallel,
    )
    .entered();

    if parallel {
        fade_tiles_parallel(grid.tiles_mut(), &frame);
    } else {
        fade_tiles(grid.tiles_mut(), &frame);
    }
}
