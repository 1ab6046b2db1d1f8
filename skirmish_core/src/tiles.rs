//! Tile grid holding the static lighting inputs and the smoothed fog level.
//!
//! `level` is display state only. Game logic reads `explored_by` and
//! `sensor_coverage`, never the faded value.

use bevy::math::UVec2;
use bevy::prelude::*;

use crate::player::{PlayerId, PlayerMask};

/// Brightest value a tile light channel can hold.
pub const MAX_ILLUMINATION: f32 = 255.0;

/// One map cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapTile {
    pub ambient_occlusion: f32,
    pub illumination: f32,
    /// Smoothed illumination actually rendered.
    pub level: f32,
    pub explored_by: PlayerMask,
    pub sensor_coverage: PlayerMask,
}

impl MapTile {
    pub fn new(ambient_occlusion: f32, illumination: f32) -> Self {
        debug_assert!(
            (0.0..=MAX_ILLUMINATION).contains(&ambient_occlusion),
            "ambient occlusion {ambient_occlusion} out of range"
        );
        debug_assert!(
            (0.0..=MAX_ILLUMINATION).contains(&illumination),
            "illumination {illumination} out of range"
        );
        Self {
            ambient_occlusion,
            illumination,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    pub fn explored(mut self, player: PlayerId) -> Self {
        self.mark_explored(player);
        self
    }

    pub fn sensed(mut self, player: PlayerId) -> Self {
        self.sensor_coverage.insert(player);
        self
    }

    /// Exploration is permanent; there is no way to clear a bit.
    pub fn mark_explored(&mut self, player: PlayerId) {
        self.explored_by.insert(player);
    }

    pub fn set_sensor_coverage(&mut self, coverage: PlayerMask) {
        self.sensor_coverage = coverage;
    }
}

/// Row-major grid of map tiles for the loaded map.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<MapTile>,
    baseline_pending: bool,
}

impl TileGrid {
    /// Create a grid filled with copies of `tile`.
    pub fn new(width: u32, height: u32, tile: MapTile) -> Self {
        let total = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![tile; total],
            baseline_pending: true,
        }
    }

    pub fn from_tiles(width: u32, height: u32, tiles: Vec<MapTile>) -> Self {
        assert_eq!(
            tiles.len(),
            width as usize * height as usize,
            "tile count does not match {width}x{height}"
        );
        Self {
            width,
            height,
            tiles,
            baseline_pending: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&MapTile> {
        self.index(x, y).and_then(|idx| self.tiles.get(idx))
    }

    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut MapTile> {
        self.index(x, y).and_then(|idx| self.tiles.get_mut(idx))
    }

    pub fn tiles(&self) -> &[MapTile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [MapTile] {
        &mut self.tiles
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = (UVec2, &MapTile)> {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            let x = (idx as u32) % width;
            let y = (idx as u32) / width;
            (UVec2::new(x, y), tile)
        })
    }

    /// Export rendered levels as a flat row-major raster.
    pub fn level_raster(&self) -> Vec<f32> {
        self.tiles.iter().map(|t| t.level).collect()
    }

    /// Mark every tile within `radius` tiles of `center` as explored and sensed by `player`.
    pub fn reveal_area(&mut self, player: PlayerId, center: UVec2, radius: u32) {
        let r2 = radius as i64 * radius as i64;
        let min_x = center.x.saturating_sub(radius);
        let min_y = center.y.saturating_sub(radius);
        let max_x = center.x.saturating_add(radius).min(self.width.saturating_sub(1));
        let max_y = center.y.saturating_add(radius).min(self.height.saturating_sub(1));
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as i64 - center.x as i64;
                let dy = y as i64 - center.y as i64;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                if let Some(tile) = self.get_mut(x, y) {
                    tile.mark_explored(player);
                    tile.sensor_coverage.insert(player);
                }
            }
        }
    }

    /// Drop live sensor coverage for every player; exploration is kept.
    pub fn clear_sensor_coverage(&mut self) {
        for tile in &mut self.tiles {
            tile.sensor_coverage = PlayerMask::EMPTY;
        }
    }

    pub fn request_baseline(&mut self) {
        self.baseline_pending = true;
    }

    pub(crate) fn take_baseline_request(&mut self) -> bool {
        std::mem::take(&mut self.baseline_pending)
    }
}
