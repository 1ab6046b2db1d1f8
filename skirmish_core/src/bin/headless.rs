use std::env;
use std::time::Duration;

use bevy::math::IVec2;
use tracing::{info, warn};

use skirmish_core::skirmish_map::{generate_tile_grid, SkirmishMapSeed, SkirmishMapSpec};
use skirmish_core::{
    build_headless_app, load_map, object_light_level, run_frame, FogMetrics, GameObject,
    ObjectId, ObjectRole, PlayerId, RevealMode, TargetLock, VisionConfigHandle, WeaponReach,
};

const FRAME_DELTA: Duration = Duration::from_micros(16_667);

#[derive(Debug)]
struct RunOptions {
    frames: u32,
    size: u32,
    seed: u64,
    /// Frame at which reveal mode is switched off, if any.
    darken_at: Option<u32>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 120,
            size: 128,
            seed: SkirmishMapSeed::default().0,
            darken_at: None,
        }
    }
}

fn parse_args() -> RunOptions {
    let mut options = RunOptions::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let value = args.next();
        let parsed = value.as_deref().and_then(|v| v.parse::<u64>().ok());
        match (arg.as_str(), parsed) {
            ("--frames", Some(v)) => options.frames = v as u32,
            ("--size", Some(v)) => options.size = v as u32,
            ("--seed", Some(v)) => options.seed = v,
            ("--darken-at", Some(v)) => options.darken_at = Some(v as u32),
            _ => warn!(
                target: "skirmish::headless",
                %arg,
                value = ?value,
                "argument.ignored"
            ),
        }
    }
    options
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = parse_args();
    let mut app = build_headless_app();

    let spec = SkirmishMapSpec {
        width: options.size,
        height: options.size,
        seed: SkirmishMapSeed(options.seed),
        ..Default::default()
    };
    load_map(&mut app, generate_tile_grid(&spec));
    spawn_forces(&mut app);

    info!(
        target: "skirmish::headless",
        frames = options.frames,
        size = options.size,
        seed = options.seed,
        "skirmish headless runner ready"
    );

    for frame in 0..options.frames {
        if options.darken_at == Some(frame) {
            app.world
                .resource_mut::<RevealMode>()
                .set_reveal_status(false);
        }
        run_frame(&mut app, FRAME_DELTA);

        if frame % 30 == 0 || frame + 1 == options.frames {
            let metrics = app.world.resource::<FogMetrics>().clone();
            info!(
                target: "skirmish::headless",
                frame = metrics.frame,
                known = metrics.known_tiles,
                fading = metrics.fading_tiles,
                dark = metrics.dark_tiles,
                mean_level = metrics.mean_level,
                "fog.summary"
            );
        }
    }

    report_units(&mut app);
}

fn spawn_forces(app: &mut bevy::app::App) {
    let ours = PlayerId(0);
    let theirs = PlayerId(1);

    app.world.spawn((
        GameObject::droid(ObjectId(1), ours, IVec2::ZERO)
            .at_tile(10, 10)
            .with_role(ObjectRole::Weapon)
            .with_weapon(WeaponReach::GROUND)
            .with_local_visibility(255),
        TargetLock::attack(),
    ));
    app.world.spawn((
        GameObject::droid(ObjectId(2), ours, IVec2::ZERO)
            .at_tile(12, 9)
            .with_local_visibility(255),
        TargetLock::sensor(),
    ));

    app.world.spawn(
        GameObject::droid(ObjectId(10), theirs, IVec2::ZERO)
            .at_tile(14, 12)
            .with_role(ObjectRole::Service)
            .with_local_visibility(96),
    );
    app.world.spawn(
        GameObject::droid(ObjectId(11), theirs, IVec2::ZERO)
            .at_tile(13, 10)
            .with_role(ObjectRole::Weapon)
            .with_weapon(WeaponReach::GROUND)
            .seen_by(ours)
            .with_local_visibility(200),
    );
    app.world.spawn(
        GameObject::structure(ObjectId(12), theirs, IVec2::ZERO)
            .at_tile(16, 14)
            .with_role(ObjectRole::ResourceStructure)
            .with_build_completion(0.6),
    );
}

fn report_units(app: &mut bevy::app::App) {
    let mut query = app.world.query::<(&GameObject, Option<&TargetLock>)>();
    let mut rows: Vec<_> = query
        .iter(&app.world)
        .map(|(object, lock)| (object.clone(), lock.cloned()))
        .collect();
    rows.sort_by_key(|(object, _)| object.id);
    let light_config = app.world.resource::<VisionConfigHandle>().get();

    for (object, lock) in rows {
        let light = object_light_level(&object, 255, &light_config.object_light);
        match lock {
            Some(lock) => info!(
                target: "skirmish::headless",
                object = %object.id,
                light,
                target_id = ?lock.target.map(|id| id.0),
                cost = ?lock.cost,
                "unit.report"
            ),
            None => info!(
                target: "skirmish::headless",
                object = %object.id,
                light,
                "object.report"
            ),
        }
    }
}
