use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use bevy::prelude::Resource;

/// Total player indices a mask can address, scavenger slot included.
pub const MAX_PLAYERS: usize = 11;

/// Player indices that take part in alliances and shared vision.
pub const MAX_PLAYER_SLOTS: usize = 10;

/// Identifier for a player seat in the skirmish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this player occupies an alliance-capable slot.
    #[inline]
    pub fn is_slot(self) -> bool {
        self.index() < MAX_PLAYER_SLOTS
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bitset over player indices. Bit `n` belongs to `PlayerId(n)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PlayerMask(pub u32);

impl PlayerMask {
    pub const EMPTY: PlayerMask = PlayerMask(0);

    /// Mask holding only `player`; empty when the index cannot be represented.
    pub fn single(player: PlayerId) -> Self {
        if player.index() < MAX_PLAYERS {
            Self(1 << player.0)
        } else {
            Self::EMPTY
        }
    }

    pub fn from_players<I: IntoIterator<Item = PlayerId>>(players: I) -> Self {
        players
            .into_iter()
            .fold(Self::EMPTY, |mask, player| mask | Self::single(player))
    }

    #[inline]
    pub fn contains(self, player: PlayerId) -> bool {
        let bit = Self::single(player);
        !bit.is_empty() && self.intersects(bit)
    }

    #[inline]
    pub fn intersects(self, other: PlayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, player: PlayerId) {
        *self |= Self::single(player);
    }

    pub fn remove(&mut self, player: PlayerId) {
        self.0 &= !Self::single(player).0;
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn players(self) -> impl Iterator<Item = PlayerId> {
        (0..MAX_PLAYERS as u8)
            .map(PlayerId)
            .filter(move |player| self.contains(*player))
    }
}

impl BitOr for PlayerMask {
    type Output = PlayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        PlayerMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for PlayerMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PlayerMask {
    type Output = PlayerMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        PlayerMask(self.0 & rhs.0)
    }
}

/// The player whose view of the map is rendered on this client.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalObserver(pub PlayerId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rejects_out_of_range_players() {
        assert_eq!(PlayerMask::single(PlayerId(3)), PlayerMask(0b1000));
        assert!(PlayerMask::single(PlayerId(MAX_PLAYERS as u8)).is_empty());
        assert!(PlayerMask::single(PlayerId(200)).is_empty());
    }

    #[test]
    fn contains_and_remove() {
        let mut mask = PlayerMask::from_players([PlayerId(0), PlayerId(4)]);
        assert!(mask.contains(PlayerId(0)));
        assert!(mask.contains(PlayerId(4)));
        assert!(!mask.contains(PlayerId(1)));
        assert!(!mask.contains(PlayerId(64)));
        assert_eq!(mask.len(), 2);

        mask.remove(PlayerId(0));
        assert!(!mask.contains(PlayerId(0)));
        assert_eq!(mask.players().collect::<Vec<_>>(), vec![PlayerId(4)]);
    }

    #[test]
    fn slot_boundary() {
        assert!(PlayerId(9).is_slot());
        assert!(!PlayerId(10).is_slot());
    }
}
