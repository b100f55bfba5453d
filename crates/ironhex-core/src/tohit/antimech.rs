//! Anti-mech attack to-hit numbers (swarm, leg attack, mine placement).
//!
//! Base value comes from the platoon's experience tier. Swarm difficulty
//! scales with the target's tonnage tier. A platoon already aboard its
//! target skips the roll entirely at resolution time; the number computed
//! here is still meaningful as a preview for the initial climb.

use super::{ToHitInputs, attacker_condition, target_movement};
use crate::attack::AntiMechKind;
use crate::modifier::ModifierStack;
use crate::outcome::ToHitResult;
use crate::unit::UnitInner;

/// Swarm difficulty tier for a target of the given tonnage.
#[must_use]
pub const fn tonnage_tier_penalty(tonnage: i32) -> i32 {
    if tonnage <= 35 {
        0
    } else if tonnage <= 55 {
        1
    } else if tonnage <= 75 {
        2
    } else {
        3
    }
}

/// Computes the target number for an anti-mech attack.
#[must_use]
pub fn to_hit(kind: AntiMechKind, inputs: &ToHitInputs<'_>) -> ToHitResult {
    let base = match &inputs.attacker.inner {
        UnitInner::Infantry(platoon) => platoon.experience.base_to_hit(),
        UnitInner::Mech(mech) => mech.piloting,
        UnitInner::Vehicle(vehicle) => vehicle.gunnery,
    };
    let mut stack = ModifierStack::new(base);

    match kind {
        AntiMechKind::Swarm => {
            stack.add("target tonnage", tonnage_tier_penalty(inputs.target.tonnage()));
        }
        AntiMechKind::LegAttack => {}
        AntiMechKind::MinePlacement => stack.add("placement", 1),
    }

    target_movement(&mut stack, inputs.target);
    if inputs.target.is_prone() {
        stack.add("target prone", -2);
    }
    attacker_condition(&mut stack, inputs.attacker);

    stack.finish()
}
