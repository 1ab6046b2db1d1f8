//! Per-unit AI tick: gather enemy candidates and keep each unit's target current.

use bevy::prelude::*;

use crate::{
    objects::{tile_distance, GameObject, ObjectId},
    targeting::{AnySensorTarget, PropulsionRules, TargetScorer},
    targeting_config::TargetingConfigHandle,
    vision::PlayerVision,
};

/// Why a unit wants a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPurpose {
    #[default]
    Attack,
    /// Sensor units spot for artillery; any enemy will do.
    Sensor,
}

/// Target selection state carried by every unit that runs target AI.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct TargetLock {
    pub purpose: TargetPurpose,
    pub target: Option<ObjectId>,
    pub cost: Option<i32>,
    /// Overrides the configured search radius when set.
    pub search_radius_tiles: Option<i32>,
}

impl TargetLock {
    pub fn attack() -> Self {
        Self::default()
    }

    pub fn sensor() -> Self {
        Self {
            purpose: TargetPurpose::Sensor,
            ..Default::default()
        }
    }

    pub fn with_search_radius(mut self, tiles: i32) -> Self {
        self.search_radius_tiles = Some(tiles);
        self
    }

    pub fn clear(&mut self) {
        self.target = None;
        self.cost = None;
    }
}

/// Re-score targets for every unit with a [`TargetLock`].
///
/// Candidates are the objects of players not allied with the unit's owner
/// that lie within the unit's search radius.
pub fn update_unit_targets(
    config: Res<TargetingConfigHandle>,
    vision: Res<PlayerVision>,
    objects: Query<&GameObject>,
    mut units: Query<(&GameObject, &mut TargetLock)>,
) {
    let cfg = config.0.as_ref();
    let attack = TargetScorer::new(&cfg.weights, &PropulsionRules);
    let sensor = TargetScorer::new(&cfg.weights, &AnySensorTarget);

    let mut everything: Vec<&GameObject> = objects.iter().collect();
    everything.sort_by_key(|object| object.id);

    for (unit, mut lock) in units.iter_mut() {
        let radius = lock.search_radius_tiles.unwrap_or(cfg.search_radius_tiles);
        let candidates = everything.iter().copied().filter(|candidate| {
            !vision.alliances.is_allied(unit.owner, candidate.owner)
                && tile_distance(unit.position, candidate.position) <= radius
        });

        let choice = match lock.purpose {
            TargetPurpose::Attack => attack.select_best_target(unit, lock.target, candidates),
            TargetPurpose::Sensor => sensor.select_best_target(unit, lock.target, candidates),
        };

        match choice {
            Some(choice) => {
                if lock.target != Some(choice.target) {
                    tracing::debug!(
                        target: "skirmish::ai",
                        unit = %unit.id,
                        target_id = %choice.target,
                        cost = choice.cost,
                        "unit.target_acquired"
                    );
                }
                lock.target = Some(choice.target);
                lock.cost = Some(choice.cost);
            }
            None => {
                if lock.target.is_some() {
                    tracing::debug!(
                        target: "skirmish::ai",
                        unit = %unit.id,
                        "unit.target_lost"
                    );
                    lock.clear();
                }
            }
        }
    }
}
