//! Attack requests.
//!
//! An [`AttackRequest`] names an attacker, a target, and the attack kind:
//! one of four families, each with its in-family variants. Requests are
//! transient: created, resolved, and discarded within a single resolution
//! call.

use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Melee attacks performed by mechs (and, for charges, vehicles).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeleeKind {
    /// A standard arm strike.
    Strike,
    /// A kick; heavier damage, always a leg-level impact on the target.
    Kick,
    /// A charge following a run-up.
    Charge,
    /// A vibro-blade strike aimed at a specific component.
    PrecisionStrike,
}

/// Infantry anti-mech attacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntiMechKind {
    /// Climb aboard and attack at close quarters; attaches on success.
    Swarm,
    /// Attack the legs from the same hex.
    LegAttack,
    /// Place a demolition mine against a leg.
    MinePlacement,
}

/// Jump-powered attacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    /// A jet-assisted strike on an adjacent unit.
    JetStrike,
    /// Death From Above: land on the target.
    DeathFromAbove,
}

/// The four attack families and their in-family variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    /// Mech melee.
    Melee(MeleeKind),
    /// Infantry ranged fire.
    InfantryFire,
    /// Infantry anti-mech attack.
    AntiMech(AntiMechKind),
    /// Jump-powered attack.
    Jump(JumpKind),
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Melee(MeleeKind::Strike) => "strike",
            Self::Melee(MeleeKind::Kick) => "kick",
            Self::Melee(MeleeKind::Charge) => "charge",
            Self::Melee(MeleeKind::PrecisionStrike) => "precision strike",
            Self::InfantryFire => "infantry fire",
            Self::AntiMech(AntiMechKind::Swarm) => "swarm",
            Self::AntiMech(AntiMechKind::LegAttack) => "leg attack",
            Self::AntiMech(AntiMechKind::MinePlacement) => "mine placement",
            Self::Jump(JumpKind::JetStrike) => "jet strike",
            Self::Jump(JumpKind::DeathFromAbove) => "death from above",
        };
        write!(f, "{name}")
    }
}

/// Optional attack-specific parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttackParams {
    /// Hexes jumped, for Death From Above.
    pub jump_distance: Option<i32>,
    /// Equipment slot of the firing weapon, for ranged fire.
    pub weapon: Option<usize>,
}

impl AttackParams {
    /// Parameters for a Death From Above of the given jump distance.
    #[must_use]
    pub const fn jump(distance: i32) -> Self {
        Self {
            jump_distance: Some(distance),
            weapon: None,
        }
    }

    /// Parameters selecting a specific weapon slot.
    #[must_use]
    pub const fn with_weapon(slot: usize) -> Self {
        Self {
            jump_distance: None,
            weapon: Some(slot),
        }
    }
}

/// A request to resolve one attack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Attacking unit.
    pub attacker: UnitId,
    /// Target unit.
    pub target: UnitId,
    /// Attack family and variant.
    pub kind: AttackKind,
    /// Attack-specific parameters.
    pub params: AttackParams,
}

impl AttackRequest {
    /// Creates a request with default parameters.
    #[must_use]
    pub const fn new(attacker: UnitId, target: UnitId, kind: AttackKind) -> Self {
        Self {
            attacker,
            target,
            kind,
            params: AttackParams {
                jump_distance: None,
                weapon: None,
            },
        }
    }

    /// Replaces the parameters, builder-style.
    #[must_use]
    pub const fn with_params(mut self, params: AttackParams) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(
            AttackKind::Jump(JumpKind::DeathFromAbove).to_string(),
            "death from above"
        );
        assert_eq!(
            AttackKind::AntiMech(AntiMechKind::Swarm).to_string(),
            "swarm"
        );
    }

    #[test]
    fn builder_sets_params() {
        let req = AttackRequest::new(
            UnitId::new(1),
            UnitId::new(2),
            AttackKind::Jump(JumpKind::DeathFromAbove),
        )
        .with_params(AttackParams::jump(3));
        assert_eq!(req.params.jump_distance, Some(3));
    }
}
