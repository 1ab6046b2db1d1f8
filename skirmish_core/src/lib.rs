//! Vision and targeting core for the skirmish prototype.
//!
//! Provides the frame-driven fog fade, object light damping and the unit
//! target scorer as ECS systems, chained in [`build_headless_app`] and driven
//! one frame at a time by [`run_frame`].

pub mod ai;
pub mod alliances;
pub mod fade;
mod frame;
pub mod illumination;
pub mod metrics;
pub mod object_light;
pub mod objects;
mod player;
mod reveal;
pub mod skirmish_map;
pub mod targeting;
pub mod targeting_config;
mod tiles;
pub mod vision;
pub mod vision_config;

use std::time::Duration;

use bevy::prelude::*;

pub use ai::{update_unit_targets, TargetLock, TargetPurpose};
pub use alliances::{AllianceError, AllianceMode, AllianceState, AllianceTable};
pub use fade::{
    advance_visibility_fade, fade_tiles, fade_tiles_parallel, preprocess_visibility,
    refresh_visibility_baseline, step_toward, FadeFrame,
};
pub use frame::{advance_frame, FrameClock};
pub use illumination::{target_illumination, ShadingMode};
pub use metrics::{collect_fog_metrics, FogMetrics};
pub use object_light::{
    object_light_level, scale_light_level, scale_light_level_with, START_DIVIDE,
};
pub use objects::{
    tile_distance, GameObject, ObjectId, ObjectKind, ObjectRole, Propulsion, WeaponReach,
    TILE_UNITS,
};
pub use player::{LocalObserver, PlayerId, PlayerMask, MAX_PLAYERS, MAX_PLAYER_SLOTS};
pub use reveal::RevealMode;
pub use targeting::{AnySensorTarget, PropulsionRules, TargetChoice, TargetEligibility, TargetScorer};
pub use targeting_config::{
    load_targeting_config_from_env, TargetWeights, TargetingConfig, TargetingConfigError,
    TargetingConfigHandle, TargetingConfigMetadata,
};
pub use tiles::{MapTile, TileGrid, MAX_ILLUMINATION};
pub use vision::{PlayerVision, VisionQuery};
pub use vision_config::{
    load_vision_config_from_env, ObjectLightConfig, VisionConfig, VisionConfigError,
    VisionConfigHandle, VisionConfigMetadata, FADE_IN_PER_SECOND, MIN_ILLUM,
};

/// Construct a Bevy [`App`] with the vision and targeting frame pipeline.
///
/// Configuration comes from `VISION_CONFIG_PATH` and `TARGETING_CONFIG_PATH`
/// when set, otherwise from the builtin JSON. The map starts empty; install
/// one with [`load_map`].
pub fn build_headless_app() -> App {
    let mut app = App::new();

    let (vision_config, vision_metadata) = load_vision_config_from_env();
    let (targeting_config, targeting_metadata) = load_targeting_config_from_env();
    let reveal = RevealMode::new(vision_config.reveal_on_start);

    app.insert_resource(VisionConfigHandle::new(vision_config))
        .insert_resource(vision_metadata)
        .insert_resource(TargetingConfigHandle::new(targeting_config))
        .insert_resource(targeting_metadata)
        .insert_resource(reveal)
        .insert_resource(LocalObserver::default())
        .insert_resource(PlayerVision::default())
        .insert_resource(FrameClock::default())
        .insert_resource(TileGrid::default())
        .insert_resource(FogMetrics::default())
        .add_plugins(MinimalPlugins)
        .add_systems(
            Update,
            (
                fade::refresh_visibility_baseline,
                fade::advance_visibility_fade,
                ai::update_unit_targets,
                metrics::collect_fog_metrics,
                frame::advance_frame,
            )
                .chain(),
        );

    app
}

/// Install a freshly loaded map. Its baseline is applied on the next frame.
pub fn load_map(app: &mut App, mut grid: TileGrid) {
    grid.request_baseline();
    app.insert_resource(grid);
}

/// Run one rendered frame covering `delta` of real time.
pub fn run_frame(app: &mut App, delta: Duration) {
    app.world.resource_mut::<FrameClock>().set_delta(delta);
    app.update();
}
