//! Rules tables: hit locations and critical effects.
//!
//! All location tables are [`RollTable`]s with explicit defaults so
//! out-of-band rolls still resolve. Critical-effect selection is a nested
//! lookup keyed first by hit location, then by attack kind.

use crate::attack::{AttackKind, JumpKind, MeleeKind};
use crate::outcome::{CriticalEffect, PilotKind};
use crate::unit::{MechLocation, VehicleFacing};
use dicecup::{Roll, RollTable};

/// Standard 2d6 mech hit-location table.
#[must_use]
pub fn mech_standard_table() -> RollTable<MechLocation> {
    use MechLocation::{
        CenterTorso, Head, LeftArm, LeftLeg, LeftTorso, RightArm, RightLeg, RightTorso,
    };
    RollTable::new(
        "mech standard",
        [
            (2, CenterTorso),
            (3, RightArm),
            (4, RightArm),
            (5, RightLeg),
            (6, RightTorso),
            (7, CenterTorso),
            (8, LeftTorso),
            (9, LeftLeg),
            (10, LeftArm),
            (11, LeftArm),
            (12, Head),
        ],
        CenterTorso,
    )
}

/// 2d6 table for Death From Above impacts: head and torso heavy.
#[must_use]
pub fn dfa_table() -> RollTable<MechLocation> {
    use MechLocation::{CenterTorso, Head, LeftTorso, RightTorso};
    RollTable::new(
        "death from above",
        [
            (2, Head),
            (3, Head),
            (4, LeftTorso),
            (5, LeftTorso),
            (6, CenterTorso),
            (7, CenterTorso),
            (8, CenterTorso),
            (9, RightTorso),
            (10, RightTorso),
            (11, Head),
            (12, Head),
        ],
        CenterTorso,
    )
}

/// 2d6 table for swarm attacks from aboard the mech.
#[must_use]
pub fn swarm_table() -> RollTable<MechLocation> {
    use MechLocation::{CenterTorso, Head, LeftArm, LeftTorso, RightArm, RightTorso};
    RollTable::new(
        "swarm",
        [
            (2, Head),
            (3, RightTorso),
            (4, RightTorso),
            (5, RightArm),
            (6, CenterTorso),
            (7, CenterTorso),
            (8, CenterTorso),
            (9, LeftArm),
            (10, LeftTorso),
            (11, LeftTorso),
            (12, Head),
        ],
        CenterTorso,
    )
}

/// 2d6 vehicle hit-location table.
#[must_use]
pub fn vehicle_table() -> RollTable<VehicleFacing> {
    use VehicleFacing::{Front, Left, Right, Turret};
    RollTable::new(
        "vehicle",
        [
            (2, Turret),
            (3, Right),
            (4, Right),
            (5, Right),
            (6, Front),
            (7, Front),
            (8, Front),
            (9, Left),
            (10, Left),
            (11, Left),
            (12, Turret),
        ],
        Front,
    )
}

/// Rolls a leg on d6: odd left, even right.
pub fn roll_leg(roller: &mut dyn Roll) -> MechLocation {
    if roller.die(6) % 2 == 1 {
        MechLocation::LeftLeg
    } else {
        MechLocation::RightLeg
    }
}

/// Selects critical effects for a mech hit, keyed by location then kind.
#[must_use]
pub fn mech_critical_effects(kind: AttackKind, location: MechLocation) -> Vec<CriticalEffect> {
    let mut effects = Vec::new();
    match location {
        MechLocation::Head => {
            effects.push(CriticalEffect::PilotEffect {
                kind: PilotKind::Concussion,
                rounds: 2,
            });
            effects.push(CriticalEffect::CriticalHit {
                location: MechLocation::Head,
                count: 1,
            });
        }
        loc if loc.is_leg() => {
            effects.push(CriticalEffect::ActuatorDamage(loc));
            effects.push(CriticalEffect::ForcedPilotingRoll { modifier: 2 });
        }
        loc if loc.is_arm() => {
            effects.push(CriticalEffect::ActuatorDamage(loc));
        }
        loc if loc.is_side_torso() => {
            effects.push(CriticalEffect::InternalDamage {
                location: loc,
                amount: 2,
            });
        }
        _ => {
            effects.push(CriticalEffect::CriticalHit {
                location: MechLocation::CenterTorso,
                count: 1,
            });
            if matches!(
                kind,
                AttackKind::Melee(MeleeKind::Charge) | AttackKind::Jump(JumpKind::DeathFromAbove)
            ) {
                effects.push(CriticalEffect::Knockback { hexes: 1 });
            }
        }
    }
    effects
}

/// Selects critical effects for a vehicle hit.
#[must_use]
pub fn vehicle_critical_effects(kind: AttackKind, facing: VehicleFacing) -> Vec<CriticalEffect> {
    let mut effects = Vec::new();
    match facing {
        VehicleFacing::Turret => effects.push(CriticalEffect::CriticalHit {
            location: MechLocation::CenterTorso,
            count: 1,
        }),
        _ => effects.push(CriticalEffect::InternalDamage {
            location: MechLocation::CenterTorso,
            amount: 2,
        }),
    }
    if matches!(
        kind,
        AttackKind::Melee(MeleeKind::Charge) | AttackKind::Jump(JumpKind::DeathFromAbove)
    ) {
        effects.push(CriticalEffect::Knockback { hexes: 1 });
    }
    effects
}

/// The critical gate for a family: either a 2d6 threshold or a percent
/// chance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CriticalGate {
    /// Critical when 2d6 meets or beats the threshold.
    Threshold(i32),
    /// Critical with a flat percent chance.
    Percent(i32),
    /// Never critical.
    Never,
}

impl CriticalGate {
    /// The gate used by each attack kind.
    #[must_use]
    pub const fn for_kind(kind: AttackKind, target_is_mech: bool) -> Self {
        use crate::attack::AntiMechKind;
        match kind {
            AttackKind::Melee(MeleeKind::PrecisionStrike) => Self::Threshold(8),
            AttackKind::Melee(_) => Self::Threshold(10),
            AttackKind::InfantryFire => {
                if target_is_mech {
                    Self::Threshold(12)
                } else {
                    Self::Never
                }
            }
            AttackKind::AntiMech(AntiMechKind::Swarm) => Self::Percent(40),
            AttackKind::AntiMech(AntiMechKind::LegAttack) => Self::Percent(30),
            AttackKind::AntiMech(AntiMechKind::MinePlacement) => Self::Percent(20),
            AttackKind::Jump(JumpKind::JetStrike) => Self::Threshold(10),
            AttackKind::Jump(JumpKind::DeathFromAbove) => Self::Threshold(8),
        }
    }

    /// Rolls the gate.
    pub fn roll(self, roller: &mut dyn Roll) -> bool {
        match self {
            Self::Threshold(t) => roller.two_d6() >= t,
            Self::Percent(pct) => roller.chance(pct),
            Self::Never => false,
        }
    }
}
