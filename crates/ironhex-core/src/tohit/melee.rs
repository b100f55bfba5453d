//! Melee to-hit numbers.
//!
//! Base value is the attacker's piloting skill (gunnery for vehicles, which
//! have no separate piloting rating). A prone target is *easier* to hit in
//! melee: the attacker stands over it.

use super::{ToHitInputs, attacker_condition, attacker_movement, target_movement, target_terrain, targeting_equipment, visibility};
use crate::attack::MeleeKind;
use crate::battlefield::Terrain;
use crate::modifier::ModifierStack;
use crate::outcome::ToHitResult;
use crate::unit::UnitInner;

/// Computes the target number for a melee attack.
#[must_use]
pub fn to_hit(kind: MeleeKind, inputs: &ToHitInputs<'_>) -> ToHitResult {
    let base = match &inputs.attacker.inner {
        UnitInner::Mech(mech) => mech.piloting,
        UnitInner::Vehicle(vehicle) => vehicle.gunnery,
        UnitInner::Infantry(platoon) => platoon.experience.base_to_hit(),
    };
    let mut stack = ModifierStack::new(base);

    match kind {
        MeleeKind::Strike | MeleeKind::Kick => {}
        MeleeKind::Charge => stack.add("momentum", -1),
        MeleeKind::PrecisionStrike => stack.add("critical-system targeting", 2),
    }

    attacker_movement(&mut stack, inputs.attacker);
    if inputs.attacker_hex.terrain == Terrain::Water {
        stack.add("poor footing", 1);
    }
    target_movement(&mut stack, inputs.target);
    target_terrain(&mut stack, inputs.target_hex);
    if inputs.target.is_prone() {
        stack.add("target prone", -2);
    }
    visibility(&mut stack, inputs.ctx);
    attacker_condition(&mut stack, inputs.attacker);
    targeting_equipment(&mut stack, inputs.attacker);

    stack.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackParams;
    use crate::battlefield::{BattleContext, Hex};
    use crate::hex::HexCoord;
    use crate::unit::{
        MechComponents, MoveKind, StatusFlags, Team, Unit, UnitId, UnitInner,
    };

    fn mech(id: u64, piloting: i32) -> Unit {
        Unit::new(
            UnitId::new(id),
            Team(0),
            "Test",
            HexCoord::new(0, 0),
            UnitInner::Mech(MechComponents::new(50, 4, piloting)),
        )
    }

    fn inputs<'a>(attacker: &'a Unit, target: &'a Unit) -> ToHitInputs<'a> {
        ToHitInputs {
            attacker,
            target,
            attacker_hex: Hex::open(),
            target_hex: Hex::open(),
            distance: 1,
            ctx: BattleContext::clear_day(),
            params: AttackParams::default(),
            attached_to_target: false,
        }
    }

    #[test]
    fn base_is_piloting() {
        let attacker = mech(1, 4);
        let target = mech(2, 5);
        let result = to_hit(MeleeKind::Strike, &inputs(&attacker, &target));
        assert_eq!(result.target_number, 4);
    }

    #[test]
    fn prone_target_is_easier() {
        let attacker = mech(1, 4);
        let mut target = mech(2, 5);
        target.flags.insert(StatusFlags::PRONE);
        let result = to_hit(MeleeKind::Strike, &inputs(&attacker, &target));
        assert_eq!(result.target_number, 2);
    }

    #[test]
    fn running_target_is_harder() {
        let attacker = mech(1, 4);
        let mut target = mech(2, 5);
        target.movement.kind = MoveKind::Ran;
        target.movement.hexes_moved = 5;
        let result = to_hit(MeleeKind::Strike, &inputs(&attacker, &target));
        assert_eq!(result.target_number, 6);
    }

    #[test]
    fn charge_gets_momentum_bonus() {
        let mut attacker = mech(1, 4);
        attacker.movement.kind = MoveKind::Ran;
        attacker.movement.hexes_moved = 4;
        let target = mech(2, 5);
        let result = to_hit(MeleeKind::Charge, &inputs(&attacker, &target));
        // 4 - 1 momentum + 2 attacker ran
        assert_eq!(result.target_number, 5);
    }

    #[test]
    fn precision_strike_is_harder() {
        let attacker = mech(1, 4);
        let target = mech(2, 5);
        let result = to_hit(MeleeKind::PrecisionStrike, &inputs(&attacker, &target));
        assert_eq!(result.target_number, 6);
    }
}
