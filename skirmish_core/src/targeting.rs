//! Target selection for combat and sensor units.
//!
//! Each candidate gets a cost in distance-equivalent units (see
//! [`crate::targeting_config`]); the cheapest eligible candidate wins, with
//! hysteresis so a unit does not flip between two similar targets.

use crate::{
    objects::{tile_distance, GameObject, ObjectId, ObjectKind, ObjectRole},
    targeting_config::TargetWeights,
};

/// The chosen target and what it cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChoice {
    pub target: ObjectId,
    pub cost: i32,
}

/// Whether `unit` can engage `target` at all.
pub trait TargetEligibility {
    fn is_valid_target(&self, unit: &GameObject, target: &GameObject) -> bool;
}

/// Weapon-vs-propulsion rule for attack targets: the unit needs a weapon that
/// reaches the way the target moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropulsionRules;

impl TargetEligibility for PropulsionRules {
    fn is_valid_target(&self, unit: &GameObject, target: &GameObject) -> bool {
        unit.weapon
            .map(|reach| reach.reaches(target.propulsion))
            .unwrap_or(false)
    }
}

/// Sensor units may observe anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySensorTarget;

impl TargetEligibility for AnySensorTarget {
    fn is_valid_target(&self, _unit: &GameObject, _target: &GameObject) -> bool {
        true
    }
}

pub struct TargetScorer<'a, E: ?Sized> {
    weights: &'a TargetWeights,
    eligibility: &'a E,
}

impl<'a, E: TargetEligibility + ?Sized> TargetScorer<'a, E> {
    pub fn new(weights: &'a TargetWeights, eligibility: &'a E) -> Self {
        Self {
            weights,
            eligibility,
        }
    }

    /// Cost of `unit` going after `candidate`. Lower is better; may be negative.
    pub fn cost(&self, unit: &GameObject, candidate: &GameObject) -> i32 {
        let w = self.weights;
        let (dist_weight, health_weight) = match candidate.kind {
            ObjectKind::Droid => (w.dist_tile_droid, w.health_droid),
            ObjectKind::Structure => (w.dist_tile_struct, w.health_struct),
        };

        let distance = tile_distance(unit.position, candidate.position);
        let damage_pct = 100 - percent(candidate.health);

        let mut cost = distance * dist_weight;
        cost -= damage_pct * health_weight / 10;
        if !candidate.is_visible_to(unit.owner) {
            cost += w.not_visible;
        }
        cost -= self.role_bonus(candidate);
        if candidate.kind == ObjectKind::Structure {
            let unbuilt_pct = 100 - percent(candidate.build_completion);
            cost += unbuilt_pct * w.struct_not_built / 10;
        }
        cost
    }

    fn role_bonus(&self, candidate: &GameObject) -> i32 {
        let w = self.weights;
        match candidate.role {
            ObjectRole::Service => w.service_droids,
            ObjectRole::Weapon => w.weapon_droids,
            ObjectRole::MilitaryStructure => w.military_struct,
            ObjectRole::WeaponStructure => w.weapon_struct,
            ObjectRole::ResourceStructure => w.derrick_struct,
            ObjectRole::Generic => match (candidate.weapon, candidate.kind) {
                (None, _) => 0,
                (Some(_), ObjectKind::Droid) => w.weapon_droids,
                (Some(_), ObjectKind::Structure) => w.weapon_struct,
            },
        }
    }

    /// Pick the cheapest eligible candidate for `unit`.
    ///
    /// `current` is the unit's existing target. If it is still among the
    /// eligible candidates it is kept unless the best alternative is cheaper by
    /// more than the switch threshold. Equal costs resolve to the earliest
    /// candidate.
    pub fn select_best_target<'o, I>(
        &self,
        unit: &GameObject,
        current: Option<ObjectId>,
        candidates: I,
    ) -> Option<TargetChoice>
    where
        I: IntoIterator<Item = &'o GameObject>,
    {
        let mut best: Option<TargetChoice> = None;
        let mut existing: Option<TargetChoice> = None;

        for candidate in candidates {
            if candidate.id == unit.id || !self.eligibility.is_valid_target(unit, candidate) {
                continue;
            }
            let choice = TargetChoice {
                target: candidate.id,
                cost: self.cost(unit, candidate),
            };
            if current == Some(candidate.id) {
                existing = Some(choice);
            }
            if best.map_or(true, |b| choice.cost < b.cost) {
                best = Some(choice);
            }
        }

        match (existing, best) {
            (Some(old), Some(new)) if old.target != new.target => {
                if old.cost - new.cost > self.weights.old_target_threshold {
                    tracing::debug!(
                        target: "skirmish::ai",
                        unit = %unit.id,
                        from = %old.target,
                        to = %new.target,
                        old_cost = old.cost,
                        new_cost = new.cost,
                        "target.switched"
                    );
                    Some(new)
                } else {
                    tracing::trace!(
                        target: "skirmish::ai",
                        unit = %unit.id,
                        kept = %old.target,
                        rejected = %new.target,
                        "target.held"
                    );
                    Some(old)
                }
            }
            (_, best) => best,
        }
    }
}

/// Fraction in `[0, 1]` as a whole percentage.
fn percent(fraction: f32) -> i32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Propulsion, WeaponReach};
    use crate::player::PlayerId;
    use bevy::math::IVec2;

    const ME: PlayerId = PlayerId(0);
    const ENEMY: PlayerId = PlayerId(1);

    fn attacker() -> GameObject {
        GameObject::droid(ObjectId(1), ME, IVec2::ZERO)
            .at_tile(0, 0)
            .with_weapon(WeaponReach::GROUND)
    }

    fn enemy_droid(id: u32, tiles_away: i32) -> GameObject {
        GameObject::droid(ObjectId(id), ENEMY, IVec2::ZERO).at_tile(tiles_away, 0)
    }

    fn enemy_structure(id: u32, tiles_away: i32) -> GameObject {
        GameObject::structure(ObjectId(id), ENEMY, IVec2::ZERO).at_tile(tiles_away, 0)
    }

    #[test]
    fn service_droid_beats_closer_generic_droid() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let service = enemy_droid(10, 5).with_role(ObjectRole::Service);
        let generic = enemy_droid(11, 6);

        assert_eq!(scorer.cost(&unit, &service), 5 * 11 + 10 - 55);
        assert_eq!(scorer.cost(&unit, &generic), 6 * 11 + 10);

        let choice = scorer
            .select_best_target(&unit, None, [&generic, &service])
            .unwrap();
        assert_eq!(choice.target, ObjectId(10));
        assert_eq!(choice.cost, 10);
    }

    #[test]
    fn visible_targets_are_cheaper() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let hidden = enemy_droid(10, 3);
        let seen = enemy_droid(11, 3).seen_by(ME);
        assert_eq!(
            scorer.cost(&unit, &hidden) - scorer.cost(&unit, &seen),
            weights.not_visible
        );
    }

    #[test]
    fn damaged_targets_are_preferred() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let healthy = enemy_droid(10, 4).seen_by(ME);
        let wrecked = enemy_droid(11, 4).seen_by(ME).with_health(0.3);

        // 70% damage: 70 * 11 / 10
        assert_eq!(scorer.cost(&unit, &wrecked), 4 * 11 - 77);
        let choice = scorer
            .select_best_target(&unit, None, [&healthy, &wrecked])
            .unwrap();
        assert_eq!(choice.target, ObjectId(11));
    }

    #[test]
    fn derrick_beats_defence_four_tiles_closer() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let defence = enemy_structure(10, 2)
            .seen_by(ME)
            .with_role(ObjectRole::WeaponStructure);
        let derrick = enemy_structure(11, 5)
            .seen_by(ME)
            .with_role(ObjectRole::ResourceStructure);

        assert_eq!(scorer.cost(&unit, &defence), 22 - 33);
        assert_eq!(scorer.cost(&unit, &derrick), 55 - 77);
        let choice = scorer
            .select_best_target(&unit, None, [&defence, &derrick])
            .unwrap();
        assert_eq!(choice.target, ObjectId(11));
    }

    #[test]
    fn damaged_factory_uses_structure_weights() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let factory = enemy_structure(10, 3)
            .seen_by(ME)
            .with_role(ObjectRole::MilitaryStructure)
            .with_health(0.5);

        // 50% damage: 50 * 11 / 10
        assert_eq!(scorer.cost(&unit, &factory), 33 - 55 - 11);

        let tuned = TargetWeights {
            dist_tile_struct: 7,
            health_struct: 20,
            military_struct: 5,
            ..TargetWeights::default()
        };
        let scorer = TargetScorer::new(&tuned, &PropulsionRules);
        assert_eq!(scorer.cost(&unit, &factory), 21 - 100 - 5);
        // droid weights stay untouched by structure tuning
        let droid = enemy_droid(11, 3).seen_by(ME).with_health(0.5);
        assert_eq!(scorer.cost(&unit, &droid), 33 - 55);
    }

    #[test]
    fn unfinished_structures_are_penalised() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let finished = enemy_structure(10, 3).seen_by(ME);
        let half_built = enemy_structure(11, 3).seen_by(ME).with_build_completion(0.5);
        let foundation = enemy_structure(12, 3).seen_by(ME).with_build_completion(0.0);

        assert_eq!(scorer.cost(&unit, &half_built) - scorer.cost(&unit, &finished), 40);
        assert_eq!(scorer.cost(&unit, &foundation) - scorer.cost(&unit, &finished), 80);
    }

    #[test]
    fn armed_generic_droid_counts_as_a_threat() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let armed = enemy_droid(10, 3).seen_by(ME).with_weapon(WeaponReach::GROUND);
        assert_eq!(scorer.cost(&unit, &armed), 33 - 33);
    }

    #[test]
    fn keeps_existing_target_within_threshold() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let current = enemy_droid(10, 7).seen_by(ME);
        // exactly four tiles closer: k == threshold
        let closer = enemy_droid(11, 3).seen_by(ME);
        assert_eq!(
            scorer.cost(&unit, &current) - scorer.cost(&unit, &closer),
            weights.old_target_threshold
        );

        let choice = scorer
            .select_best_target(&unit, Some(ObjectId(10)), [&current, &closer])
            .unwrap();
        assert_eq!(choice.target, ObjectId(10));
        assert_eq!(choice.cost, 77);
    }

    #[test]
    fn switches_when_gain_exceeds_threshold() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let current = enemy_droid(10, 7).seen_by(ME);
        // four tiles closer plus 1% damage: one point past the threshold
        let better = enemy_droid(11, 3).seen_by(ME).with_health(0.99);
        assert_eq!(
            scorer.cost(&unit, &current) - scorer.cost(&unit, &better),
            weights.old_target_threshold + 1
        );

        let choice = scorer
            .select_best_target(&unit, Some(ObjectId(10)), [&current, &better])
            .unwrap();
        assert_eq!(choice.target, ObjectId(11));
    }

    #[test]
    fn lost_current_target_falls_back_to_best() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let only = enemy_droid(11, 6);
        let choice = scorer
            .select_best_target(&unit, Some(ObjectId(99)), [&only])
            .unwrap();
        assert_eq!(choice.target, ObjectId(11));
    }

    #[test]
    fn no_eligible_candidates_means_no_target() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let vtol = enemy_droid(10, 2).with_propulsion(Propulsion::Air);

        assert_eq!(scorer.select_best_target(&unit, None, []), None);
        assert_eq!(scorer.select_best_target(&unit, None, [&vtol]), None);
        assert_eq!(scorer.select_best_target(&unit, None, [&unit]), None);

        let unarmed = GameObject::droid(ObjectId(2), ME, IVec2::ZERO);
        let ground = enemy_droid(11, 1);
        assert_eq!(scorer.select_best_target(&unarmed, None, [&ground]), None);
    }

    #[test]
    fn sensors_can_target_anything() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &AnySensorTarget);
        let sensor = GameObject::droid(ObjectId(2), ME, IVec2::ZERO);
        let vtol = enemy_droid(10, 2).with_propulsion(Propulsion::Air);
        let choice = scorer.select_best_target(&sensor, None, [&vtol]).unwrap();
        assert_eq!(choice.target, ObjectId(10));
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        let weights = TargetWeights::default();
        let scorer = TargetScorer::new(&weights, &PropulsionRules);
        let unit = attacker();
        let a = enemy_droid(10, 4);
        let b = enemy_droid(11, 4);
        let choice = scorer.select_best_target(&unit, None, [&b, &a]).unwrap();
        assert_eq!(choice.target, ObjectId(11));
    }
}
