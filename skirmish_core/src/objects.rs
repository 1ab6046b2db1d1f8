//! Droids and structures as the vision and targeting code see them.

use std::fmt;

use bevy::math::IVec2;
use bevy::prelude::*;

use crate::player::{PlayerId, PlayerMask};

/// World units per map tile edge.
pub const TILE_UNITS: i32 = 128;

/// Stable identifier of a game object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Droid,
    Structure,
}

/// What an object does on the battlefield, as far as target priority cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectRole {
    #[default]
    Generic,
    /// Construction and repair units.
    Service,
    Weapon,
    /// Factories, research and repair facilities.
    MilitaryStructure,
    /// Defensive emplacements.
    WeaponStructure,
    /// Resource extractors.
    ResourceStructure,
}

/// How a unit moves, which decides which weapons can reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Propulsion {
    #[default]
    Ground,
    Air,
}

/// What a mounted weapon can engage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeaponReach {
    pub ground: bool,
    pub air: bool,
}

impl WeaponReach {
    pub const GROUND: WeaponReach = WeaponReach {
        ground: true,
        air: false,
    };
    pub const AIR: WeaponReach = WeaponReach {
        ground: false,
        air: true,
    };
    pub const ALL: WeaponReach = WeaponReach {
        ground: true,
        air: true,
    };

    pub fn reaches(self, propulsion: Propulsion) -> bool {
        match propulsion {
            Propulsion::Ground => self.ground,
            Propulsion::Air => self.air,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub owner: PlayerId,
    pub kind: ObjectKind,
    pub role: ObjectRole,
    /// Position in world units.
    pub position: IVec2,
    /// Remaining body as a fraction of full health, `0.0..=1.0`.
    pub health: f32,
    /// `1.0` once construction has finished.
    pub build_completion: f32,
    pub propulsion: Propulsion,
    pub weapon: Option<WeaponReach>,
    /// How strongly the local player currently perceives the object, 0-255.
    pub local_visibility: u8,
    /// Players that currently have the object in sight.
    pub seen_by: PlayerMask,
}

impl GameObject {
    fn new(id: ObjectId, owner: PlayerId, kind: ObjectKind, position: IVec2) -> Self {
        Self {
            id,
            owner,
            kind,
            role: ObjectRole::Generic,
            position,
            health: 1.0,
            build_completion: 1.0,
            propulsion: Propulsion::Ground,
            weapon: None,
            local_visibility: 0,
            seen_by: PlayerMask::EMPTY,
        }
    }

    pub fn droid(id: ObjectId, owner: PlayerId, position: IVec2) -> Self {
        Self::new(id, owner, ObjectKind::Droid, position)
    }

    pub fn structure(id: ObjectId, owner: PlayerId, position: IVec2) -> Self {
        Self::new(id, owner, ObjectKind::Structure, position)
    }

    /// Place the object at the centre of tile `(x, y)`.
    pub fn at_tile(mut self, x: i32, y: i32) -> Self {
        self.position = IVec2::new(
            x * TILE_UNITS + TILE_UNITS / 2,
            y * TILE_UNITS + TILE_UNITS / 2,
        );
        self
    }

    pub fn with_role(mut self, role: ObjectRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health.clamp(0.0, 1.0);
        self
    }

    pub fn with_build_completion(mut self, completion: f32) -> Self {
        self.build_completion = completion.clamp(0.0, 1.0);
        self
    }

    pub fn with_propulsion(mut self, propulsion: Propulsion) -> Self {
        self.propulsion = propulsion;
        self
    }

    pub fn with_weapon(mut self, reach: WeaponReach) -> Self {
        self.weapon = Some(reach);
        self
    }

    pub fn with_local_visibility(mut self, visibility: u8) -> Self {
        self.local_visibility = visibility;
        self
    }

    pub fn seen_by(mut self, player: PlayerId) -> Self {
        self.seen_by.insert(player);
        self
    }

    pub fn is_visible_to(&self, player: PlayerId) -> bool {
        self.seen_by.contains(player)
    }

    pub fn tile(&self) -> IVec2 {
        IVec2::new(
            self.position.x.div_euclid(TILE_UNITS),
            self.position.y.div_euclid(TILE_UNITS),
        )
    }
}

/// Straight-line distance between two world positions, truncated to whole tiles.
pub fn tile_distance(a: IVec2, b: IVec2) -> i32 {
    let dx = (a.x as i64 - b.x as i64) as f64;
    let dy = (a.y as i64 - b.y as i64) as f64;
    let world = (dx * dx + dy * dy).sqrt() as i64;
    (world / TILE_UNITS as i64) as i32
}
