//! Unit status: flags and the per-category state machines.
//!
//! Three small machines govern status transitions during combat resolution:
//!
//! - **Infantry morale**: `Steady → Breaking → Broken`, one step per failed
//!   check, with a rally path back from Breaking only.
//! - **Mech posture**: `Standing ↔ Prone`. The engine is the exclusive
//!   writer of Prone during combat; standing back up belongs to the
//!   movement layer.
//! - **Swarm attachment**: `Unattached → Swarming → Unattached`, at most one
//!   live attachment per infantry unit (enforced by the roster ledger).
//!
//! Transitions are methods returning the next state so illegal moves are
//! unrepresentable rather than checked at runtime.

use crate::unit::UnitId;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Boolean status flags shared by all unit categories.
    ///
    /// Stun is a countdown (`Unit::stunned_rounds`), not a flag.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Knocked down (mechs) or gone to ground (infantry).
        const PRONE = 1 << 0;
        /// Dug in; halves incoming fire damage, +1 to be hit at range.
        const ENTRENCHED = 1 << 1;
        /// Under suppressing fire; halves the unit's own fire pool.
        const SUPPRESSED = 1 << 2;
        /// Concealed; grants the ambush bonus until revealed.
        const HIDDEN = 1 << 3;
        /// Powered down; cannot act.
        const SHUTDOWN = 1 << 4;
        /// Eliminated; excluded from all further targeting and action.
        const DESTROYED = 1 << 5;
    }
}

/// Infantry morale state.
///
/// The failure path is unidirectional: a Steady unit that fails one check
/// becomes Breaking, never Broken directly. Broken is terminal for the
/// engagement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Morale {
    /// In good order.
    #[default]
    Steady,
    /// Wavering; attacks suffer and a further failure breaks the unit.
    Breaking,
    /// Routed; cannot attack for the rest of the engagement.
    Broken,
}

impl Morale {
    /// Advances one step down the failure path.
    #[must_use]
    pub const fn fail_check(self) -> Self {
        match self {
            Self::Steady => Self::Breaking,
            Self::Breaking | Self::Broken => Self::Broken,
        }
    }

    /// Attempts a rally.
    ///
    /// Only a Breaking unit that has moved away from the nearest enemy and
    /// passed its rally check recovers; a failed rally leaves the unit
    /// Breaking (only failed morale checks advance toward Broken).
    #[must_use]
    pub const fn rally(self, moved_away: bool, check_passed: bool) -> Self {
        match self {
            Self::Breaking if moved_away && check_passed => Self::Steady,
            other => other,
        }
    }

    /// Returns true when the unit may still attack.
    #[must_use]
    pub const fn can_attack(self) -> bool {
        !matches!(self, Self::Broken)
    }
}

/// Mech posture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Posture {
    /// Upright.
    #[default]
    Standing,
    /// Knocked down.
    Prone,
}

impl Posture {
    /// Resolves a piloting check: a pass keeps the current posture, a
    /// failure knocks the mech down.
    #[must_use]
    pub const fn after_piloting_check(self, passed: bool) -> Self {
        if passed {
            self
        } else {
            Self::Prone
        }
    }
}

/// A live swarm attachment: infantry clinging to a specific mech location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmAttachment {
    /// The mech being swarmed.
    pub mech: UnitId,
    /// The body location the troopers are attached to.
    pub location: super::MechLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod morale_tests {
        use super::*;

        #[test]
        fn steady_fails_to_breaking_never_broken() {
            assert_eq!(Morale::Steady.fail_check(), Morale::Breaking);
        }

        #[test]
        fn breaking_fails_to_broken() {
            assert_eq!(Morale::Breaking.fail_check(), Morale::Broken);
        }

        #[test]
        fn broken_stays_broken() {
            assert_eq!(Morale::Broken.fail_check(), Morale::Broken);
            assert_eq!(Morale::Broken.rally(true, true), Morale::Broken);
        }

        #[test]
        fn rally_requires_both_conditions() {
            assert_eq!(Morale::Breaking.rally(true, true), Morale::Steady);
            assert_eq!(Morale::Breaking.rally(false, true), Morale::Breaking);
            assert_eq!(Morale::Breaking.rally(true, false), Morale::Breaking);
        }

        #[test]
        fn steady_rally_is_noop() {
            assert_eq!(Morale::Steady.rally(true, true), Morale::Steady);
        }

        #[test]
        fn broken_cannot_attack() {
            assert!(Morale::Steady.can_attack());
            assert!(Morale::Breaking.can_attack());
            assert!(!Morale::Broken.can_attack());
        }
    }

    mod posture_tests {
        use super::*;

        #[test]
        fn failed_check_knocks_down() {
            assert_eq!(
                Posture::Standing.after_piloting_check(false),
                Posture::Prone
            );
        }

        #[test]
        fn passed_check_keeps_posture() {
            assert_eq!(
                Posture::Standing.after_piloting_check(true),
                Posture::Standing
            );
            assert_eq!(Posture::Prone.after_piloting_check(true), Posture::Prone);
        }
    }

    #[test]
    fn status_flags_compose() {
        let mut flags = StatusFlags::PRONE | StatusFlags::SUPPRESSED;
        assert!(flags.contains(StatusFlags::PRONE));
        flags.remove(StatusFlags::PRONE);
        assert!(!flags.contains(StatusFlags::PRONE));
        assert!(flags.contains(StatusFlags::SUPPRESSED));
    }
}
