//! Error taxonomy for the combat engine.
//!
//! Three distinct failure kinds, per the engine's contract:
//!
//! - [`RuleViolation`]: an *expected* rule-level rejection (wrong unit type,
//!   out of range, missing equipment). Always locally recoverable; the
//!   caller picks a different action.
//! - Not-found ([`EngineError::UnitNotFound`] / [`EngineError::HexNotFound`]):
//!   a referenced unit or hex is absent from battlefield state. This is a
//!   collaborator bug, not a rule violation, and should be logged as such.
//! - [`EngineError::Invariant`] and [`EngineError::OutcomeAlreadyApplied`]:
//!   the operation would corrupt state; the engine refuses rather than
//!   silently clamping. (Where clamping *is* the rule, such as to-hit in
//!   [2,12] and minimum-damage floors, it happens in the rules code.)
//!
//! The engine never panics for any of these.

use crate::hex::HexCoord;
use crate::unit::UnitId;
use thiserror::Error;

/// Rule-level reasons an attack request is illegal.
///
/// Every variant carries enough context to render a human-readable refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The attacker's unit category cannot perform this attack.
    #[error("attacker must be a {expected}")]
    WrongAttackerType {
        /// Required attacker category.
        expected: &'static str,
    },
    /// The target's unit category cannot receive this attack.
    #[error("target must be a {expected}")]
    WrongTargetType {
        /// Required target category.
        expected: &'static str,
    },
    /// The attacker and target are the same unit.
    #[error("a unit cannot attack itself")]
    SelfTarget,
    /// The attacker has been eliminated.
    #[error("attacker has been eliminated")]
    AttackerEliminated,
    /// The target has been eliminated.
    #[error("target has been eliminated")]
    TargetEliminated,
    /// The attacker is shut down.
    #[error("attacker is shut down")]
    AttackerShutDown,
    /// The attacker is stunned.
    #[error("attacker is stunned for {rounds} more round(s)")]
    AttackerStunned {
        /// Remaining stun duration.
        rounds: u8,
    },
    /// The attacker already attacked this turn.
    #[error("attacker has already acted this turn")]
    AlreadyActed,
    /// The attacker is prone and this attack requires standing.
    #[error("attacker is prone")]
    AttackerProne,
    /// The attacker's morale is Broken.
    #[error("attacker's morale is broken")]
    BrokenMorale,
    /// The target is beyond the attack's maximum range.
    #[error("target at distance {have} exceeds maximum range {need}")]
    OutOfRange {
        /// Maximum legal distance.
        need: i32,
        /// Actual distance.
        have: i32,
    },
    /// The attack requires occupying the target's hex.
    #[error("attack requires sharing the target's hex (distance {have})")]
    NotSameHex {
        /// Actual distance.
        have: i32,
    },
    /// No line of sight to the target.
    #[error("no line of sight to target")]
    NoLineOfSight,
    /// The attacker has too few troopers for this attack.
    #[error("attack requires at least {need} troopers ({have} remaining)")]
    InsufficientTroopers {
        /// Trooper floor for the attack.
        need: i32,
        /// Troopers remaining.
        have: i32,
    },
    /// A required piece of equipment is missing.
    #[error("attack requires {equipment}")]
    MissingEquipment {
        /// Human-readable equipment requirement.
        equipment: &'static str,
    },
    /// Swarming a heavy target requires magnetic clamps.
    #[error("swarming a {tonnage}-ton mech requires magnetic clamps")]
    ClampsRequired {
        /// Target tonnage that triggered the requirement.
        tonnage: i32,
    },
    /// The infantry unit is already attached to a different mech.
    #[error("unit is already swarming another mech")]
    AlreadySwarming,
    /// Firing weapons while attached to a mech is not possible.
    #[error("cannot fire weapons while swarming")]
    FiringWhileSwarming,
    /// Jump-based attacks require having jumped this turn.
    #[error("attack requires a jump this turn")]
    NotJumped,
    /// The requested jump distance exceeds the attacker's jump capability.
    #[error("jump distance {requested} exceeds jump capability {capability}")]
    JumpTooFar {
        /// Requested jump distance.
        requested: i32,
        /// Jump jets available.
        capability: i32,
    },
    /// The charge lacked a run-up.
    #[error("charge requires running at least 2 hexes (moved {moved})")]
    NoRunUp {
        /// Hexes actually moved.
        moved: i32,
    },
    /// The target is airborne and cannot be reached by this attack.
    #[error("target is airborne")]
    TargetAirborne,
    /// The request omitted a required parameter.
    #[error("attack requires the {param} parameter")]
    MissingParameter {
        /// Name of the missing parameter.
        param: &'static str,
    },
}

/// Top-level engine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The request is legal to ask but illegal to perform.
    #[error("attack is illegal: {0}")]
    Illegal(#[from] RuleViolation),
    /// A referenced unit is absent from the roster.
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),
    /// A referenced hex is outside the battlefield.
    #[error("hex {0} not found")]
    HexNotFound(HexCoord),
    /// The outcome has already been applied; re-application would
    /// double-count damage.
    #[error("outcome has already been applied")]
    OutcomeAlreadyApplied,
    /// An internal invariant would be violated; the operation is refused.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    /// Returns true for expected, rule-level rejections.
    #[must_use]
    pub const fn is_rule_violation(&self) -> bool {
        matches!(self, Self::Illegal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_violations_render_reasons() {
        let err = RuleViolation::ClampsRequired { tonnage: 85 };
        let msg = err.to_string();
        assert!(msg.contains("85"));
        assert!(msg.contains("magnetic clamps"));
    }

    #[test]
    fn illegal_wraps_rule_violation() {
        let err: EngineError = RuleViolation::AlreadyActed.into();
        assert!(err.is_rule_violation());
        assert!(err.to_string().contains("already acted"));
    }

    #[test]
    fn not_found_is_not_a_rule_violation() {
        let err = EngineError::UnitNotFound(UnitId::new(9));
        assert!(!err.is_rule_violation());
    }
}
