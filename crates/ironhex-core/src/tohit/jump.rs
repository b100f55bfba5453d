//! Jump-powered attack to-hit numbers.
//!
//! Death From Above keeps its documented breakdown visible even when rows
//! contribute nothing: base 9, the piloting offset from the reference skill
//! of 4, and the jump-distance row are always present in the audit trail.

use super::{ToHitInputs, attacker_condition, target_movement, target_terrain, visibility};
use crate::attack::JumpKind;
use crate::modifier::ModifierStack;
use crate::outcome::ToHitResult;
use crate::unit::UnitInner;

/// Base target number for a Death From Above before skill and distance.
pub const DFA_BASE: i32 = 9;
/// Piloting skill the DFA base assumes; better pilots get a bonus, worse a
/// penalty.
pub const DFA_REFERENCE_PILOTING: i32 = 4;

/// Computes the target number for a jump-powered attack.
#[must_use]
pub fn to_hit(kind: JumpKind, inputs: &ToHitInputs<'_>) -> ToHitResult {
    let piloting = match &inputs.attacker.inner {
        UnitInner::Mech(mech) => mech.piloting,
        UnitInner::Vehicle(vehicle) => vehicle.gunnery,
        UnitInner::Infantry(platoon) => platoon.experience.base_to_hit(),
    };

    let mut stack = match kind {
        JumpKind::JetStrike => {
            let mut stack = ModifierStack::new(piloting + 2);
            target_movement(&mut stack, inputs.target);
            stack
        }
        JumpKind::DeathFromAbove => {
            let mut stack = ModifierStack::new(DFA_BASE);
            stack.add_always("piloting skill offset", piloting - DFA_REFERENCE_PILOTING);
            let distance = inputs.params.jump_distance.unwrap_or(1);
            stack.add_always("jump distance", distance - 1);
            target_movement(&mut stack, inputs.target);
            stack
        }
    };

    target_terrain(&mut stack, inputs.target_hex);
    if inputs.target.is_prone() {
        stack.add("target prone", -2);
    }
    visibility(&mut stack, inputs.ctx);
    attacker_condition(&mut stack, inputs.attacker);

    stack.finish()
}
