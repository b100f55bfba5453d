//! To-hit calculation, one policy module per attack family.
//!
//! Each family defines its own base value and modifier set but shares the
//! accumulation contract: labeled modifiers in declaration order, summed
//! additively (every applicable bonus stacks), final number clamped to
//! [2, 12] by [`ModifierStack::finish`].

pub mod antimech;
pub mod infantry;
pub mod jump;
pub mod melee;

use crate::attack::{AttackKind, AttackParams};
use crate::battlefield::{BattleContext, Hex, Terrain};
use crate::modifier::ModifierStack;
use crate::outcome::ToHitResult;
use crate::unit::{StatusFlags, Unit, UnitInner};

/// Everything a to-hit calculation reads, materialized by the engine facade.
#[derive(Debug, Clone, Copy)]
pub struct ToHitInputs<'a> {
    /// Attacking unit.
    pub attacker: &'a Unit,
    /// Target unit.
    pub target: &'a Unit,
    /// Hex under the attacker.
    pub attacker_hex: Hex,
    /// Hex under the target.
    pub target_hex: Hex,
    /// Hex distance between them.
    pub distance: i32,
    /// Ambient context.
    pub ctx: BattleContext,
    /// Attack parameters.
    pub params: AttackParams,
    /// Whether the attacker is currently swarming the target.
    pub attached_to_target: bool,
}

/// Dispatches to the family calculator.
#[must_use]
pub fn calculate(kind: AttackKind, inputs: &ToHitInputs<'_>) -> ToHitResult {
    match kind {
        AttackKind::Melee(melee_kind) => melee::to_hit(melee_kind, inputs),
        AttackKind::InfantryFire => infantry::to_hit(inputs),
        AttackKind::AntiMech(am_kind) => antimech::to_hit(am_kind, inputs),
        AttackKind::Jump(jump_kind) => jump::to_hit(jump_kind, inputs),
    }
}

/// Penalty for the target's movement this turn.
pub(crate) fn target_movement(stack: &mut ModifierStack, target: &Unit) {
    stack.add("target moved", target.movement.kind.target_penalty());
}

/// Penalty for the attacker's own movement this turn.
pub(crate) fn attacker_movement(stack: &mut ModifierStack, attacker: &Unit) {
    stack.add("attacker moved", attacker.movement.kind.attacker_penalty());
}

/// Fixed delta for the terrain under the target.
pub(crate) fn target_terrain(stack: &mut ModifierStack, hex: Hex) {
    let delta = match hex.terrain {
        Terrain::LightWoods => 1,
        Terrain::HeavyWoods => 2,
        Terrain::Water => -1,
        Terrain::Building => 2,
        Terrain::Open | Terrain::Rough => 0,
    };
    stack.add("target terrain", delta);
}

/// Weather and light penalties.
pub(crate) fn visibility(stack: &mut ModifierStack, ctx: BattleContext) {
    stack.add("weather", ctx.weather.to_hit_penalty());
    stack.add("light", ctx.time.to_hit_penalty());
}

/// Attacker condition: suppression and wavering morale.
pub(crate) fn attacker_condition(stack: &mut ModifierStack, attacker: &Unit) {
    if attacker.flags.contains(StatusFlags::SUPPRESSED) {
        stack.add("suppressed", 1);
    }
    if let UnitInner::Infantry(platoon) = &attacker.inner {
        if platoon.morale == crate::unit::Morale::Breaking {
            stack.add("shaken", 1);
        }
    }
}

/// Advanced targeting equipment bonus.
pub(crate) fn targeting_equipment(stack: &mut ModifierStack, attacker: &Unit) {
    if attacker.has_equipment(crate::unit::EquipmentFlags::TARGETING) {
        stack.add("advanced targeting", -1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::Weather;
    use crate::hex::HexCoord;
    use crate::unit::{Experience, InfantryComponents, Morale, Team, UnitId};

    fn platoon() -> Unit {
        Unit::new(
            UnitId::new(1),
            Team(0),
            "Rifles",
            HexCoord::new(0, 0),
            UnitInner::Infantry(InfantryComponents::new(20, Experience::Regular)),
        )
    }

    #[test]
    fn terrain_deltas() {
        let mut hex = Hex::open();
        hex.terrain = Terrain::HeavyWoods;
        let mut stack = ModifierStack::new(4);
        target_terrain(&mut stack, hex);
        assert_eq!(stack.raw_total(), 6);
    }

    #[test]
    fn water_makes_targets_easier() {
        let mut hex = Hex::open();
        hex.terrain = Terrain::Water;
        let mut stack = ModifierStack::new(4);
        target_terrain(&mut stack, hex);
        assert_eq!(stack.raw_total(), 3);
    }

    #[test]
    fn visibility_stacks_weather_and_light() {
        let mut ctx = BattleContext::clear_day();
        ctx.weather = Weather::Snow;
        ctx.time = crate::battlefield::TimeOfDay::Night;
        let mut stack = ModifierStack::new(4);
        visibility(&mut stack, ctx);
        assert_eq!(stack.raw_total(), 8);
    }

    #[test]
    fn shaken_infantry_shoot_worse() {
        let mut unit = platoon();
        if let Some(p) = unit.as_infantry_mut() {
            p.morale = Morale::Breaking;
        }
        let mut stack = ModifierStack::new(6);
        attacker_condition(&mut stack, &unit);
        assert_eq!(stack.raw_total(), 7);
    }
}
