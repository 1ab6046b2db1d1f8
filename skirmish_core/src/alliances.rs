//! Alliance bookkeeping between player slots.
//!
//! Pairwise state is stored in both directions so a pending request can be
//! told apart from the invitation the other side sees.

use crate::player::{PlayerId, PlayerMask, MAX_PLAYERS};

/// Relationship one player holds toward another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllianceState {
    #[default]
    Broken,
    /// We asked them; waiting for an answer.
    Requested,
    /// They asked us.
    Invitation,
    Formed,
}

/// Game-wide alliance rules chosen in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllianceMode {
    NoAlliances,
    #[default]
    Alliances,
    /// Teams fixed at game start; alliances cannot be broken.
    Teams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllianceError {
    #[error("alliances are disabled for this game")]
    AlliancesDisabled,
    #[error("player {0} cannot ally with itself")]
    SelfAlliance(PlayerId),
    #[error("player {0} does not occupy an alliance slot")]
    UnknownPlayer(PlayerId),
    #[error("alliance between {0} and {1} is locked by team rules")]
    TeamsLocked(PlayerId, PlayerId),
    #[error("player {1} has no pending request from player {0}")]
    NoPendingRequest(PlayerId, PlayerId),
}

#[derive(Debug, Clone)]
pub struct AllianceTable {
    mode: AllianceMode,
    states: [[AllianceState; MAX_PLAYERS]; MAX_PLAYERS],
}

impl Default for AllianceTable {
    fn default() -> Self {
        Self::new(AllianceMode::default())
    }
}

impl AllianceTable {
    pub fn new(mode: AllianceMode) -> Self {
        Self {
            mode,
            states: [[AllianceState::Broken; MAX_PLAYERS]; MAX_PLAYERS],
        }
    }

    pub fn mode(&self) -> AllianceMode {
        self.mode
    }

    /// State `from` holds toward `to`. Unknown players read as broken.
    pub fn state(&self, from: PlayerId, to: PlayerId) -> AllianceState {
        self.states
            .get(from.index())
            .and_then(|row| row.get(to.index()))
            .copied()
            .unwrap_or_default()
    }

    /// Players are always allied with themselves.
    pub fn is_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        a == b || self.state(a, b) == AllianceState::Formed
    }

    /// Mask of every player allied with `player`, including `player` itself.
    ///
    /// Players outside the alliance slots get an empty mask so they never
    /// borrow anyone's vision.
    pub fn alliance_bits(&self, player: PlayerId) -> PlayerMask {
        if !player.is_slot() {
            return PlayerMask::EMPTY;
        }
        (0..MAX_PLAYERS as u8)
            .map(PlayerId)
            .filter(|other| self.is_allied(player, *other))
            .fold(PlayerMask::EMPTY, |mask, other| {
                mask | PlayerMask::single(other)
            })
    }

    pub fn request(&mut self, from: PlayerId, to: PlayerId) -> Result<(), AllianceError> {
        self.check_pair(from, to)?;
        if self.is_allied(from, to) {
            return Ok(());
        }
        self.set_pair(from, to, AllianceState::Requested, AllianceState::Invitation);
        tracing::debug!(
            target: "skirmish::alliances",
            %from,
            %to,
            "alliance.requested"
        );
        Ok(())
    }

    /// `to` accepts the outstanding request made by `from`.
    pub fn accept(&mut self, from: PlayerId, to: PlayerId) -> Result<(), AllianceError> {
        self.check_pair(from, to)?;
        if self.state(to, from) != AllianceState::Invitation {
            return Err(AllianceError::NoPendingRequest(from, to));
        }
        self.set_pair(from, to, AllianceState::Formed, AllianceState::Formed);
        tracing::info!(
            target: "skirmish::alliances",
            %from,
            %to,
            "alliance.formed"
        );
        Ok(())
    }

    /// Forms an alliance immediately, as lobby team assignment does.
    pub fn form(&mut self, a: PlayerId, b: PlayerId) -> Result<(), AllianceError> {
        self.check_pair(a, b)?;
        self.set_pair(a, b, AllianceState::Formed, AllianceState::Formed);
        tracing::info!(
            target: "skirmish::alliances",
            %a,
            %b,
            "alliance.formed"
        );
        Ok(())
    }

    pub fn break_alliance(&mut self, a: PlayerId, b: PlayerId) -> Result<(), AllianceError> {
        self.check_pair(a, b)?;
        if self.mode == AllianceMode::Teams && self.is_allied(a, b) {
            return Err(AllianceError::TeamsLocked(a, b));
        }
        self.set_pair(a, b, AllianceState::Broken, AllianceState::Broken);
        tracing::info!(
            target: "skirmish::alliances",
            %a,
            %b,
            "alliance.broken"
        );
        Ok(())
    }

    fn check_pair(&self, a: PlayerId, b: PlayerId) -> Result<(), AllianceError> {
        if self.mode == AllianceMode::NoAlliances {
            return Err(AllianceError::AlliancesDisabled);
        }
        for player in [a, b] {
            if !player.is_slot() {
                return Err(AllianceError::UnknownPlayer(player));
            }
        }
        if a == b {
            return Err(AllianceError::SelfAlliance(a));
        }
        Ok(())
    }

    fn set_pair(&mut self, a: PlayerId, b: PlayerId, a_to_b: AllianceState, b_to_a: AllianceState) {
        self.states[a.index()][b.index()] = a_to_b;
        self.states[b.index()][a.index()] = b_to_a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_accept_forms_alliance() {
        let mut table = AllianceTable::default();
        let (a, b) = (PlayerId(0), PlayerId(1));

        table.request(a, b).unwrap();
        assert_eq!(table.state(a, b), AllianceState::Requested);
        assert_eq!(table.state(b, a), AllianceState::Invitation);
        assert!(!table.is_allied(a, b));

        table.accept(a, b).unwrap();
        assert!(table.is_allied(a, b));
        assert!(table.is_allied(b, a));
    }

    #[test]
    fn accept_without_request_fails() {
        let mut table = AllianceTable::default();
        assert_eq!(
            table.accept(PlayerId(2), PlayerId(3)),
            Err(AllianceError::NoPendingRequest(PlayerId(2), PlayerId(3)))
        );
    }

    #[test]
    fn alliance_bits_include_self_and_allies() {
        let mut table = AllianceTable::default();
        table.form(PlayerId(0), PlayerId(2)).unwrap();

        let bits = table.alliance_bits(PlayerId(0));
        assert!(bits.contains(PlayerId(0)));
        assert!(bits.contains(PlayerId(2)));
        assert!(!bits.contains(PlayerId(1)));
    }

    #[test]
    fn non_slot_players_have_no_alliance_bits() {
        let table = AllianceTable::default();
        assert!(table.alliance_bits(PlayerId(10)).is_empty());
        assert!(table.alliance_bits(PlayerId(42)).is_empty());
    }

    #[test]
    fn team_alliances_are_locked() {
        let mut table = AllianceTable::new(AllianceMode::Teams);
        table.form(PlayerId(0), PlayerId(1)).unwrap();
        assert_eq!(
            table.break_alliance(PlayerId(0), PlayerId(1)),
            Err(AllianceError::TeamsLocked(PlayerId(0), PlayerId(1)))
        );
        assert!(table.is_allied(PlayerId(0), PlayerId(1)));
    }

    #[test]
    fn no_alliance_mode_rejects_everything() {
        let mut table = AllianceTable::new(AllianceMode::NoAlliances);
        assert_eq!(
            table.form(PlayerId(0), PlayerId(1)),
            Err(AllianceError::AlliancesDisabled)
        );
        assert!(table.is_allied(PlayerId(4), PlayerId(4)));
    }
}
