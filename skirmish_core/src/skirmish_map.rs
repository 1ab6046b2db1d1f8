//! Seeded test maps for the headless runner and benchmarks.

use bevy::math::UVec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    player::PlayerId,
    tiles::{MapTile, TileGrid},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkirmishMapSeed(pub u64);

impl Default for SkirmishMapSeed {
    fn default() -> Self {
        Self(0x5EED_F06)
    }
}

/// Parameters for [`generate_tile_grid`].
#[derive(Debug, Clone)]
pub struct SkirmishMapSpec {
    pub width: u32,
    pub height: u32,
    pub seed: SkirmishMapSeed,
    /// Sensor posts per player, each revealing a disc of `sensor_radius` tiles.
    pub sensor_posts: u32,
    pub sensor_radius: u32,
    pub players: Vec<PlayerId>,
}

impl Default for SkirmishMapSpec {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            seed: SkirmishMapSeed::default(),
            sensor_posts: 3,
            sensor_radius: 6,
            players: vec![PlayerId(0), PlayerId(1)],
        }
    }
}

/// Build a grid with smooth-ish lighting and a few explored sensor discs per player.
pub fn generate_tile_grid(spec: &SkirmishMapSpec) -> TileGrid {
    let mut rng = SmallRng::seed_from_u64(spec.seed.0);
    let (width, height) = (spec.width, spec.height);

    // Coarse lattice of light values, bilinearly sampled so neighbours are similar.
    let lattice_step = 8u32;
    let lattice_w = width / lattice_step + 2;
    let lattice_h = height / lattice_step + 2;
    let lattice: Vec<f32> = (0..lattice_w * lattice_h)
        .map(|_| rng.gen_range(60.0..=255.0))
        .collect();

    let mut tiles = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let illumination = sample_lattice(&lattice, lattice_w, lattice_step, x, y);
            let occlusion = (illumination * rng.gen_range(0.7..=1.0)).clamp(0.0, 255.0);
            tiles.push(MapTile::new(occlusion, illumination));
        }
    }
    let mut grid = TileGrid::from_tiles(width, height, tiles);

    if width > 0 && height > 0 {
        for player in &spec.players {
            for _ in 0..spec.sensor_posts {
                let center = UVec2::new(rng.gen_range(0..width), rng.gen_range(0..height));
                grid.reveal_area(*player, center, spec.sensor_radius);
            }
        }
    }

    tracing::debug!(
        target: "skirmish::fog",
        width,
        height,
        seed = spec.seed.0,
        "skirmish_map.generated"
    );
    grid
}

fn sample_lattice(lattice: &[f32], lattice_w: u32, step: u32, x: u32, y: u32) -> f32 {
    let (cx, cy) = (x / step, y / step);
    let fx = (x % step) as f32 / step as f32;
    let fy = (y % step) as f32 / step as f32;
    let at = |lx: u32, ly: u32| lattice[(ly * lattice_w + lx) as usize];
    let top = at(cx, cy) * (1.0 - fx) + at(cx + 1, cy) * fx;
    let bottom = at(cx, cy + 1) * (1.0 - fx) + at(cx + 1, cy + 1) * fx;
    (top * (1.0 - fy) + bottom * fy).clamp(0.0, 255.0)
}
