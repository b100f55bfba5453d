//! Resolution result types.
//!
//! Everything the resolver produces is a value: the to-hit breakdown, the
//! attack outcome with its critical effects and status-transition requests,
//! and the apply-step report. Outcomes are transient: created, optionally
//! previewed, applied at most once, then discarded.

use crate::attack::AttackKind;
use crate::modifier::Modifier;
use crate::unit::{MechLocation, UnitId, VehicleFacing};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A computed to-hit number with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToHitResult {
    /// Base value before modifiers.
    pub base: i32,
    /// Modifiers in declaration order.
    pub modifiers: Vec<Modifier>,
    /// Sum of all modifier deltas.
    pub modifier_total: i32,
    /// Final target number, clamped to [2, 12].
    pub target_number: i32,
}

impl fmt::Display for ToHitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (base {} {:+})",
            self.target_number, self.base, self.modifier_total
        )?;
        for m in &self.modifiers {
            write!(f, ", {} {:+}", m.label, m.delta)?;
        }
        Ok(())
    }
}

/// Where a hit landed, per target category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitLocation {
    /// A mech body location.
    Mech(MechLocation),
    /// A vehicle facing.
    Vehicle(VehicleFacing),
    /// Infantry have no locations; hits land on the platoon.
    Troopers,
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mech(loc) => write!(f, "{loc}"),
            Self::Vehicle(facing) => write!(f, "{facing}"),
            Self::Troopers => write!(f, "troopers"),
        }
    }
}

/// Pilot-affecting critical outcomes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotKind {
    /// Briefly unable to act.
    Stunned,
    /// Rattled by a head hit.
    Concussion,
}

/// A critical effect produced by the damage resolver.
///
/// Closed vocabulary shared with every consumer (renderer, log). Each
/// effect is applied exactly once, by the effect applicator only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalEffect {
    /// An actuator in the location is wrecked.
    ActuatorDamage(MechLocation),
    /// The target must pass a piloting check or fall.
    ForcedPilotingRoll {
        /// Added to the piloting target number.
        modifier: i32,
    },
    /// The target is shoved.
    Knockback {
        /// Hexes pushed.
        hexes: i32,
    },
    /// Damage bypasses armor into the structure at a location.
    InternalDamage {
        /// Affected location.
        location: MechLocation,
        /// Structure points lost.
        amount: i32,
    },
    /// The attack strikes a chosen location instead of rolling.
    HitLocationOverride(HitLocation),
    /// One or more internal component slots are hit.
    CriticalHit {
        /// Affected location.
        location: MechLocation,
        /// Slots hit.
        count: i32,
    },
    /// The pilot or crew is affected for a duration.
    PilotEffect {
        /// Effect kind.
        kind: PilotKind,
        /// Duration in rounds.
        rounds: u8,
    },
}

/// A status-transition request, executed only by the effect applicator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusChange {
    /// Knocked prone (failed piloting check, destroyed leg).
    KnockedProne,
    /// Stunned for a number of rounds.
    Stunned {
        /// Rounds of stun.
        rounds: u8,
    },
    /// Placed under suppression.
    Suppressed,
    /// Concealment lost (the unit attacked from hiding).
    RevealHidden,
    /// A failed morale check; steps the morale machine once.
    MoraleFailure,
    /// Attach to a mech at a location (successful swarm).
    Attach {
        /// Mech being boarded.
        mech: UnitId,
        /// Attachment location.
        location: MechLocation,
    },
    /// Clear the current swarm attachment.
    Detach,
    /// Remove a one-shot equipment item after use.
    ConsumeEquipment {
        /// Equipment slot to remove.
        slot: usize,
    },
}

/// How damage converts to trooper losses for infantry targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrooperLossRatio {
    /// General fire: one trooper per 2 damage, rounded up.
    #[default]
    General,
    /// Anti-mech mishaps: one trooper per point of damage.
    Mishap,
}

impl TrooperLossRatio {
    /// Converts damage into troopers lost.
    #[must_use]
    pub const fn troopers_lost(self, damage: i32) -> i32 {
        if damage <= 0 {
            return 0;
        }
        match self {
            Self::General => (damage + 1) / 2,
            Self::Mishap => damage,
        }
    }
}

/// The full result of resolving one attack.
///
/// Produced by `execute_attack`, consumed (exactly once) by
/// `apply_outcome`. The `applied` flag guards against double application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Attacking unit.
    pub attacker: UnitId,
    /// Target unit.
    pub target: UnitId,
    /// Attack family and variant.
    pub kind: AttackKind,
    /// Whether the attack hit.
    pub hit: bool,
    /// The 2d6 attack roll (0 for auto-hit follow-ups).
    pub roll: i32,
    /// The target number the roll was compared against.
    pub target_number: i32,
    /// Damage to the target (0 on a clean miss).
    pub damage: i32,
    /// Where the damage lands.
    pub location: Option<HitLocation>,
    /// Whether the critical gate opened.
    pub critical: bool,
    /// Critical effects, in the order they were drawn.
    pub critical_effects: Vec<CriticalEffect>,
    /// Damage the attacker takes (recoil, crashes, mishaps).
    pub attacker_damage: i32,
    /// Where the attacker's damage lands.
    pub attacker_location: Option<HitLocation>,
    /// Status transitions for the target.
    pub status_changes: Vec<StatusChange>,
    /// Status transitions for the attacker.
    pub attacker_status_changes: Vec<StatusChange>,
    /// Damage-to-trooper conversion for the target.
    pub trooper_ratio: TrooperLossRatio,
    /// Damage-to-trooper conversion for the attacker.
    pub attacker_trooper_ratio: TrooperLossRatio,
    /// Human-readable narration; never used for logic.
    pub messages: Vec<String>,
    /// Set by the applicator; a second apply is refused.
    pub applied: bool,
}

impl AttackOutcome {
    /// A clean miss skeleton for the request.
    #[must_use]
    pub fn miss(attacker: UnitId, target: UnitId, kind: AttackKind, roll: i32, tn: i32) -> Self {
        Self {
            attacker,
            target,
            kind,
            hit: false,
            roll,
            target_number: tn,
            damage: 0,
            location: None,
            critical: false,
            critical_effects: Vec::new(),
            attacker_damage: 0,
            attacker_location: None,
            status_changes: Vec::new(),
            attacker_status_changes: Vec::new(),
            trooper_ratio: TrooperLossRatio::General,
            attacker_trooper_ratio: TrooperLossRatio::General,
            messages: Vec::new(),
            applied: false,
        }
    }

    /// A hit skeleton for the request; damage and effects filled by the
    /// resolver.
    #[must_use]
    pub fn hit(attacker: UnitId, target: UnitId, kind: AttackKind, roll: i32, tn: i32) -> Self {
        Self {
            hit: true,
            ..Self::miss(attacker, target, kind, roll, tn)
        }
    }

    /// Appends a narration line.
    pub fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

/// Report from applying one outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    /// The target was eliminated by this outcome.
    pub target_destroyed: bool,
    /// The attacker was eliminated by this outcome.
    pub attacker_destroyed: bool,
    /// Troopers the target lost.
    pub troopers_lost: i32,
    /// Armor points removed from the target.
    pub armor_damage: i32,
    /// Structure points removed from the target.
    pub structure_damage: i32,
    /// Status transitions actually performed, rendered for the log.
    pub statuses: Vec<String>,
    /// Narration carried over from the outcome.
    pub messages: Vec<String>,
}

/// Result of a rally attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyOutcome {
    /// The rallying unit.
    pub unit: UnitId,
    /// The 2d6 rally roll.
    pub roll: i32,
    /// The number the roll had to meet.
    pub target_number: i32,
    /// Whether the unit returned to Steady.
    pub rallied: bool,
}

/// Result of a mech shaking off swarming infantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgeOutcome {
    /// The mech attempting the dislodge.
    pub mech: UnitId,
    /// The 2d6 dislodge roll.
    pub roll: i32,
    /// The number the roll had to meet.
    pub target_number: i32,
    /// Infantry thrown off, with the mishap damage each took.
    pub dislodged: Vec<(UnitId, i32)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::MeleeKind;

    #[test]
    fn trooper_ratio_general_is_two_per_trooper() {
        assert_eq!(TrooperLossRatio::General.troopers_lost(6), 3);
        assert_eq!(TrooperLossRatio::General.troopers_lost(7), 4);
        assert_eq!(TrooperLossRatio::General.troopers_lost(1), 1);
        assert_eq!(TrooperLossRatio::General.troopers_lost(0), 0);
    }

    #[test]
    fn trooper_ratio_mishap_is_one_to_one() {
        assert_eq!(TrooperLossRatio::Mishap.troopers_lost(4), 4);
        assert_eq!(TrooperLossRatio::Mishap.troopers_lost(0), 0);
    }

    #[test]
    fn miss_skeleton_is_inert() {
        let outcome = AttackOutcome::miss(
            UnitId::new(1),
            UnitId::new(2),
            AttackKind::Melee(MeleeKind::Strike),
            5,
            8,
        );
        assert!(!outcome.hit);
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.applied);
    }

    #[test]
    fn to_hit_display_includes_breakdown() {
        let result = ToHitResult {
            base: 9,
            modifiers: vec![Modifier::new("jump distance", 0)],
            modifier_total: 0,
            target_number: 9,
        };
        let text = result.to_string();
        assert!(text.contains('9'));
        assert!(text.contains("jump distance"));
    }
}
