//! Damage and critical resolution.
//!
//! `resolve` turns a validated request plus its to-hit result into an
//! [`AttackOutcome`]. Every die the outcome depends on (the attack roll,
//! location, critical gate, critical selection, forced piloting checks,
//! morale checks, mishaps) is rolled here, so the later apply step is a
//! pure mutation over resolved randomness and outcomes can be previewed
//! before committing.

use crate::attack::{AntiMechKind, AttackKind, AttackRequest, JumpKind, MeleeKind};
use crate::error::EngineError;
use crate::outcome::{
    AttackOutcome, CriticalEffect, HitLocation, StatusChange, ToHitResult, TrooperLossRatio,
};
use crate::roster::Roster;
use crate::tables::{
    dfa_table, mech_critical_effects, mech_standard_table, roll_leg, swarm_table, vehicle_table,
    vehicle_critical_effects, CriticalGate,
};
use crate::unit::{EquipmentFlags, MechLocation, StatusFlags, Unit, UnitInner, UnitKind};
use dicecup::{roll_cluster, Roll};
use tracing::debug;

/// Margin of failure at which a missed Death From Above becomes a crash.
pub const DFA_CRASH_MARGIN: i32 = 5;

fn div_ceil(value: i32, divisor: i32) -> i32 {
    (value + divisor - 1) / divisor
}

/// Resolves one attack into an outcome. Does not mutate any unit.
pub fn resolve(
    roster: &Roster,
    request: &AttackRequest,
    to_hit: &ToHitResult,
    roller: &mut dyn Roll,
) -> Result<AttackOutcome, EngineError> {
    let attacker = roster.unit(request.attacker)?;
    let target = roster.unit(request.target)?;

    let attached = roster
        .attachment(attacker.id)
        .is_some_and(|a| a.mech == target.id);

    // Follow-up attacks from aboard skip the roll entirely.
    let (roll, hit) = if matches!(request.kind, AttackKind::AntiMech(AntiMechKind::Swarm))
        && attached
    {
        (0, true)
    } else {
        let roll = roller.two_d6();
        (roll, roll >= to_hit.target_number)
    };
    debug!(attacker = %attacker.id, target = %target.id, kind = %request.kind,
        roll, target_number = to_hit.target_number, hit, "attack rolled");

    let mut outcome = if hit {
        AttackOutcome::hit(attacker.id, target.id, request.kind, roll, to_hit.target_number)
    } else {
        AttackOutcome::miss(attacker.id, target.id, request.kind, roll, to_hit.target_number)
    };

    if hit {
        resolve_hit(&mut outcome, roster, attacker, target, request, roller);
    } else {
        resolve_miss(&mut outcome, attacker, target, request, to_hit, roller);
    }

    if attacker.flags.contains(StatusFlags::HIDDEN) {
        outcome
            .attacker_status_changes
            .push(StatusChange::RevealHidden);
    }
    consume_one_shots(&mut outcome, attacker, request.kind);

    Ok(outcome)
}

fn resolve_hit(
    outcome: &mut AttackOutcome,
    roster: &Roster,
    attacker: &Unit,
    target: &Unit,
    request: &AttackRequest,
    roller: &mut dyn Roll,
) {
    let damage = base_damage(attacker, target, request.kind);
    outcome.damage = damage;
    outcome.location = Some(hit_location(roster, attacker, target, request.kind, roller));

    match request.kind {
        AttackKind::InfantryFire => {
            outcome.damage = fire_damage(attacker, target, request, roller);
            // Massed fire pins opposing infantry.
            if target.kind() == UnitKind::Infantry && outcome.damage > 0 {
                outcome.status_changes.push(StatusChange::Suppressed);
            }
        }
        AttackKind::Melee(MeleeKind::Charge) => {
            outcome.attacker_damage = div_ceil(target.tonnage(), 10);
            outcome.attacker_location = Some(self_location(attacker, roller));
            forced_piloting(outcome, target, 0, roller, Side::Target);
            forced_piloting(outcome, attacker, 0, roller, Side::Attacker);
        }
        AttackKind::AntiMech(AntiMechKind::Swarm) => {
            // The attachment belongs to the attacker's side of the ledger.
            if let Some(HitLocation::Mech(loc)) = outcome.location {
                outcome.attacker_status_changes.push(StatusChange::Attach {
                    mech: target.id,
                    location: loc,
                });
            }
        }
        AttackKind::Jump(JumpKind::DeathFromAbove) => {
            outcome.attacker_damage = div_ceil(attacker.tonnage(), 5);
            outcome.attacker_location = Some(self_leg_location(attacker, roller));
            forced_piloting(outcome, target, 0, roller, Side::Target);
            forced_piloting(outcome, attacker, 0, roller, Side::Attacker);
            outcome.note("attacker lands beside the target");
        }
        _ => {}
    }

    // Second, independent critical gate.
    let gate = CriticalGate::for_kind(request.kind, target.kind() == UnitKind::Mech);
    if outcome.damage > 0 && gate.roll(roller) {
        outcome.critical = true;
        resolve_critical(outcome, target, request.kind, roller);
    }

    // Infantry about to take losses check their nerve.
    if outcome.damage > 0 {
        morale_check(outcome, target, roller);
    }

    if let Some(location) = outcome.location {
        outcome.note(format!(
            "{} hits {} in the {} for {}",
            request.kind, target.name, location, outcome.damage
        ));
    }
}

enum Side {
    Attacker,
    Target,
}

fn resolve_miss(
    outcome: &mut AttackOutcome,
    attacker: &Unit,
    target: &Unit,
    request: &AttackRequest,
    to_hit: &ToHitResult,
    roller: &mut dyn Roll,
) {
    match request.kind {
        AttackKind::Jump(JumpKind::DeathFromAbove) => {
            // The attacker comes down regardless, prone and hurting.
            let mut crash = div_ceil(attacker.tonnage(), 5);
            if to_hit.target_number - outcome.roll >= DFA_CRASH_MARGIN {
                crash *= 2;
                outcome.note("catastrophic miss: full crash landing");
            }
            outcome.attacker_damage = crash;
            outcome.attacker_location = Some(self_leg_location(attacker, roller));
            outcome
                .attacker_status_changes
                .push(StatusChange::KnockedProne);
            outcome.note("attacker crashes down beside the target");
        }
        AttackKind::AntiMech(AntiMechKind::Swarm) => {
            // Troopers fall off during the scramble.
            outcome.attacker_damage = roller.die(6);
            outcome.attacker_location = Some(HitLocation::Troopers);
            outcome.attacker_trooper_ratio = TrooperLossRatio::Mishap;
            outcome.note("the climb fails; troopers fall");
        }
        AttackKind::Melee(MeleeKind::Charge) => {
            forced_piloting(outcome, attacker, 0, roller, Side::Attacker);
            outcome.note("the charge stumbles past");
        }
        _ => {
            outcome.note(format!("{} misses {}", request.kind, target.name));
        }
    }
}

/// Family damage formulas. Infantry fire is handled separately because its
/// damage is a cluster roll, not a deterministic formula.
fn base_damage(attacker: &Unit, target: &Unit, kind: AttackKind) -> i32 {
    match kind {
        AttackKind::Melee(MeleeKind::Strike | MeleeKind::PrecisionStrike) => {
            let mut damage = div_ceil(attacker.tonnage(), 10);
            if let Some((_, blade)) = attacker.find_equipment(EquipmentFlags::BLADED) {
                damage = damage * blade.damage_mult_pct / 100;
            }
            damage.max(1)
        }
        AttackKind::Melee(MeleeKind::Kick) => div_ceil(attacker.tonnage(), 5),
        AttackKind::Melee(MeleeKind::Charge) => {
            div_ceil(attacker.tonnage(), 10) * (attacker.movement.hexes_moved / 2).max(1)
        }
        AttackKind::InfantryFire => 0,
        AttackKind::AntiMech(AntiMechKind::Swarm) => {
            let troopers = attacker.as_infantry().map_or(0, |p| p.troopers);
            let mut damage = div_ceil(troopers, 5);
            if attacker.has_equipment(EquipmentFlags::ANTI_MECH) {
                damage += 2;
            }
            damage
        }
        AttackKind::AntiMech(AntiMechKind::LegAttack) => {
            div_ceil(attacker.as_infantry().map_or(0, |p| p.troopers), 4)
        }
        AttackKind::AntiMech(AntiMechKind::MinePlacement) => 6,
        AttackKind::Jump(JumpKind::JetStrike) => {
            2 * attacker.as_mech().map_or(0, |m| m.jump_jets)
        }
        AttackKind::Jump(JumpKind::DeathFromAbove) => div_ceil(target.tonnage(), 10) * 2,
    }
}

fn fire_damage(
    attacker: &Unit,
    target: &Unit,
    request: &AttackRequest,
    roller: &mut dyn Roll,
) -> i32 {
    let troopers = attacker.as_infantry().map_or(0, |p| p.troopers);
    let mut pool = div_ceil(troopers, 2);
    if let Some((_, weapon)) = attacker.ranged_weapon(request.params.weapon) {
        pool = pool * weapon.damage_mult_pct / 100;
        if weapon.flags.contains(EquipmentFlags::ANTI_INFANTRY)
            && target.kind() == UnitKind::Infantry
        {
            pool = pool * 3 / 2;
        }
    }
    if attacker.flags.contains(StatusFlags::SUPPRESSED) {
        pool = (pool / 2).max(1);
    }
    let mut damage = roll_cluster(roller, pool);
    if attacker.flags.contains(StatusFlags::HIDDEN) && !attacker.acted {
        damage *= 2; // ambush
    }
    if target.flags.contains(StatusFlags::ENTRENCHED) {
        damage = (damage / 2).max(1);
    }
    damage
}

fn hit_location(
    roster: &Roster,
    attacker: &Unit,
    target: &Unit,
    kind: AttackKind,
    roller: &mut dyn Roll,
) -> HitLocation {
    match &target.inner {
        UnitInner::Infantry(_) => HitLocation::Troopers,
        UnitInner::Vehicle(_) => match kind {
            // Rams hit whatever is facing the attacker; the front by
            // resolver convention.
            AttackKind::Melee(MeleeKind::Charge) | AttackKind::Jump(JumpKind::DeathFromAbove) => {
                HitLocation::Vehicle(crate::unit::VehicleFacing::Front)
            }
            _ => HitLocation::Vehicle(*vehicle_table().lookup(roller.two_d6())),
        },
        UnitInner::Mech(_) => match kind {
            AttackKind::Melee(MeleeKind::Kick)
            | AttackKind::AntiMech(AntiMechKind::LegAttack | AntiMechKind::MinePlacement) => {
                HitLocation::Mech(roll_leg(roller))
            }
            AttackKind::Jump(JumpKind::DeathFromAbove) => {
                HitLocation::Mech(*dfa_table().lookup(roller.two_d6()))
            }
            AttackKind::AntiMech(AntiMechKind::Swarm) => {
                // Follow-ups keep hammering the location already boarded.
                match roster.attachment(attacker.id) {
                    Some(a) if a.mech == target.id => HitLocation::Mech(a.location),
                    _ => HitLocation::Mech(*swarm_table().lookup(roller.two_d6())),
                }
            }
            _ => HitLocation::Mech(*mech_standard_table().lookup(roller.two_d6())),
        },
    }
}

fn self_location(unit: &Unit, roller: &mut dyn Roll) -> HitLocation {
    match &unit.inner {
        UnitInner::Mech(_) => HitLocation::Mech(*mech_standard_table().lookup(roller.two_d6())),
        UnitInner::Vehicle(_) => HitLocation::Vehicle(crate::unit::VehicleFacing::Front),
        UnitInner::Infantry(_) => HitLocation::Troopers,
    }
}

fn self_leg_location(unit: &Unit, roller: &mut dyn Roll) -> HitLocation {
    match &unit.inner {
        UnitInner::Mech(_) => HitLocation::Mech(roll_leg(roller)),
        UnitInner::Vehicle(_) => HitLocation::Vehicle(crate::unit::VehicleFacing::Front),
        UnitInner::Infantry(_) => HitLocation::Troopers,
    }
}

fn resolve_critical(
    outcome: &mut AttackOutcome,
    target: &Unit,
    kind: AttackKind,
    roller: &mut dyn Roll,
) {
    // A precision strike that finds its mark redirects the blow.
    if matches!(kind, AttackKind::Melee(MeleeKind::PrecisionStrike))
        && matches!(outcome.location, Some(HitLocation::Mech(_)))
    {
        let aim = HitLocation::Mech(MechLocation::CenterTorso);
        outcome
            .critical_effects
            .push(CriticalEffect::HitLocationOverride(aim));
        outcome.location = Some(aim);
    }

    let effects = match outcome.location {
        Some(HitLocation::Mech(loc)) => mech_critical_effects(kind, loc),
        Some(HitLocation::Vehicle(facing)) => vehicle_critical_effects(kind, facing),
        _ => Vec::new(),
    };
    for effect in effects {
        if let CriticalEffect::ForcedPilotingRoll { modifier } = effect {
            forced_piloting(outcome, target, modifier, roller, Side::Target);
        }
        if let CriticalEffect::PilotEffect { rounds, .. } = effect {
            outcome.status_changes.push(StatusChange::Stunned { rounds });
        }
        outcome.critical_effects.push(effect);
    }
}

/// Resolves a forced piloting check now; a failure becomes a KnockedProne
/// status change so the apply step stays dice-free.
fn forced_piloting(
    outcome: &mut AttackOutcome,
    unit: &Unit,
    modifier: i32,
    roller: &mut dyn Roll,
    side: Side,
) {
    let Some(mech) = unit.as_mech() else {
        return;
    };
    let target_number = mech.piloting + modifier;
    let roll = roller.two_d6();
    let passed = roll >= target_number;
    debug!(unit = %unit.id, roll, target_number, passed, "piloting check");
    if !passed {
        let change = StatusChange::KnockedProne;
        match side {
            Side::Target => outcome.status_changes.push(change),
            Side::Attacker => outcome.attacker_status_changes.push(change),
        }
        outcome.note(format!("{} falls", unit.name));
    }
}

fn morale_check(outcome: &mut AttackOutcome, target: &Unit, roller: &mut dyn Roll) {
    let Some(platoon) = target.as_infantry() else {
        return;
    };
    if outcome.trooper_ratio.troopers_lost(outcome.damage) == 0 {
        return;
    }
    let target_number = platoon.experience.morale_target();
    let roll = roller.two_d6();
    if roll < target_number {
        outcome.status_changes.push(StatusChange::MoraleFailure);
        outcome.note(format!("{} waver under the losses", target.name));
    }
}

fn consume_one_shots(outcome: &mut AttackOutcome, attacker: &Unit, kind: AttackKind) {
    if matches!(kind, AttackKind::AntiMech(AntiMechKind::MinePlacement)) {
        if let Some((slot, _)) = attacker.find_equipment(EquipmentFlags::MINE) {
            outcome
                .attacker_status_changes
                .push(StatusChange::ConsumeEquipment { slot });
        }
    }
}
