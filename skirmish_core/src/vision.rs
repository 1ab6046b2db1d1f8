//! Read-only vision facts the fog and targeting code depend on.

use bevy::prelude::*;

use crate::{
    alliances::AllianceTable,
    player::{PlayerId, PlayerMask},
    tiles::MapTile,
};

/// The narrow slice of player state needed to decide what an observer sees.
pub trait VisionQuery {
    /// Players whose vision `observer` shares, `observer` included.
    /// Out-of-range observers get an empty mask.
    fn alliance_bits(&self, observer: PlayerId) -> PlayerMask;

    /// Players with a satellite uplink and therefore global vision.
    fn satellite_uplink(&self) -> PlayerMask;

    /// God mode: everything is visible.
    fn is_omniscient(&self) -> bool;

    /// Authoritative tile visibility used by game state, not by the fade.
    fn tile_visible(&self, observer: PlayerId, tile: &MapTile) -> bool {
        self.is_omniscient() || tile.explored_by.contains(observer)
    }
}

/// Per-session vision state: alliances, satellite uplinks and the god mode switch.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerVision {
    pub alliances: AllianceTable,
    pub satellite_uplink: PlayerMask,
    pub god_mode: bool,
}

impl PlayerVision {
    pub fn new(alliances: AllianceTable) -> Self {
        Self {
            alliances,
            ..Default::default()
        }
    }

    pub fn grant_satellite_uplink(&mut self, player: PlayerId) {
        self.satellite_uplink.insert(player);
    }

    pub fn revoke_satellite_uplink(&mut self, player: PlayerId) {
        self.satellite_uplink.remove(player);
    }

    pub fn set_god_mode(&mut self, enabled: bool) {
        if self.god_mode != enabled {
            tracing::info!(
                target: "skirmish::fog",
                enabled,
                "vision.god_mode"
            );
        }
        self.god_mode = enabled;
    }
}

impl VisionQuery for PlayerVision {
    fn alliance_bits(&self, observer: PlayerId) -> PlayerMask {
        self.alliances.alliance_bits(observer)
    }

    fn satellite_uplink(&self) -> PlayerMask {
        self.satellite_uplink
    }

    fn is_omniscient(&self) -> bool {
        self.god_mode
    }
}
