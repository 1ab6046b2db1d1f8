use bevy::math::IVec2;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use skirmish_core::skirmish_map::{generate_tile_grid, SkirmishMapSpec};
use skirmish_core::{
    fade_tiles, fade_tiles_parallel, FadeFrame, GameObject, ObjectId, ObjectRole, PlayerId,
    PlayerVision, PropulsionRules, ShadingMode, TargetScorer, TargetWeights, TileGrid,
    WeaponReach, MIN_ILLUM,
};

fn bench_grid(size: u32) -> TileGrid {
    let spec = SkirmishMapSpec {
        width: size,
        height: size,
        sensor_posts: 12,
        ..Default::default()
    };
    generate_tile_grid(&spec)
}

fn bench_fade_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("fade_pass");
    let vision = PlayerVision::default();
    let frame = FadeFrame::new(
        &vision,
        PlayerId(0),
        ShadingMode::SinglePass,
        1.7,
        MIN_ILLUM,
    );

    for size in [64u32, 256, 512] {
        let grid = bench_grid(size);

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            b.iter_batched(
                || grid.clone(),
                |mut grid| fade_tiles(grid.tiles_mut(), &frame),
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, _| {
            b.iter_batched(
                || grid.clone(),
                |mut grid| fade_tiles_parallel(grid.tiles_mut(), &frame),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_target_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_scan");
    let weights = TargetWeights::default();
    let scorer = TargetScorer::new(&weights, &PropulsionRules);
    let unit = GameObject::droid(ObjectId(0), PlayerId(0), IVec2::ZERO)
        .at_tile(32, 32)
        .with_weapon(WeaponReach::GROUND);

    for count in [16u32, 128, 1024] {
        let candidates: Vec<GameObject> = (0..count)
            .map(|i| {
                let role = match i % 4 {
                    0 => ObjectRole::Service,
                    1 => ObjectRole::Weapon,
                    2 => ObjectRole::Generic,
                    _ => ObjectRole::ResourceStructure,
                };
                GameObject::droid(ObjectId(i + 1), PlayerId(1), IVec2::ZERO)
                    .at_tile((i % 64) as i32, (i / 64) as i32)
                    .with_role(role)
                    .with_health(1.0 - (i % 10) as f32 / 10.0)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("select", count), &count, |b, _| {
            b.iter(|| scorer.select_best_target(&unit, Some(ObjectId(1)), candidates.iter()));
        });
    }

    group.finish();
}

criterion_group!(fade_benches, bench_fade_pass, bench_target_scan);
criterion_main!(fade_benches);
