//! Ranged infantry fire to-hit numbers.
//!
//! Base value comes from the platoon's experience tier. A prone target is
//! *harder* to hit at range (low silhouette), the opposite sign from the
//! melee families.

use super::{ToHitInputs, attacker_condition, target_movement, target_terrain, targeting_equipment, visibility};
use crate::modifier::ModifierStack;
use crate::outcome::ToHitResult;
use crate::unit::{StatusFlags, Tactics, UnitInner};

/// Range band penalty for a shot of `distance` hexes from a weapon with the
/// given maximum range: short +0, medium +2, long +4.
#[must_use]
pub fn range_band_penalty(distance: i32, range: i32) -> i32 {
    let short = (range / 3).max(1);
    let medium = (range * 2 / 3).max(short);
    if distance <= short {
        0
    } else if distance <= medium {
        2
    } else {
        4
    }
}

/// Computes the target number for ranged infantry fire.
#[must_use]
pub fn to_hit(inputs: &ToHitInputs<'_>) -> ToHitResult {
    let base = match &inputs.attacker.inner {
        UnitInner::Infantry(platoon) => platoon.experience.base_to_hit(),
        // Non-infantry shooters are rejected in validation; gunnery keeps
        // the preview number sane if a host asks anyway.
        UnitInner::Mech(mech) => mech.gunnery,
        UnitInner::Vehicle(vehicle) => vehicle.gunnery,
    };
    let mut stack = ModifierStack::new(base);

    if let Some((_, weapon)) = inputs.attacker.ranged_weapon(inputs.params.weapon) {
        stack.add(
            "range",
            range_band_penalty(inputs.distance, weapon.range),
        );
    }

    target_movement(&mut stack, inputs.target);
    target_terrain(&mut stack, inputs.target_hex);
    let elevation = inputs.target_hex.elevation - inputs.attacker_hex.elevation;
    if elevation > 0 {
        stack.add("target uphill", 1);
    } else if elevation < 0 {
        stack.add("target downhill", -1);
    }
    if inputs.target.is_prone() {
        stack.add("target prone", 1);
    }
    if inputs.target.flags.contains(StatusFlags::ENTRENCHED) {
        stack.add("target entrenched", 1);
    }
    visibility(&mut stack, inputs.ctx);
    if let UnitInner::Infantry(platoon) = &inputs.attacker.inner {
        if platoon.tactics == Tactics::Guerrilla && inputs.attacker_hex.terrain.is_woods() {
            stack.add("guerrilla tactics", -1);
        }
    }
    attacker_condition(&mut stack, inputs.attacker);
    targeting_equipment(&mut stack, inputs.attacker);

    stack.finish()
}
