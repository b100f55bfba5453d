//! Effect application: the single authority for mutating unit state.
//!
//! `apply_outcome` commits a resolved [`AttackOutcome`] to the roster:
//! armor/structure damage, trooper losses at the outcome's conversion
//! ratio, status transitions through the state machines, equipment
//! consumption, swarm ledger writes, and the positional consequences
//! (knockback, the Death-From-Above landing).
//!
//! An outcome is applied at most once; a second call is refused with
//! [`EngineError::OutcomeAlreadyApplied`] since re-application would
//! double-count damage. Forced piloting rolls and morale checks were
//! already resolved to status changes, so this step rolls no dice.

use crate::attack::{AttackKind, JumpKind};
use crate::error::EngineError;
use crate::outcome::{ApplyResult, AttackOutcome, CriticalEffect, HitLocation, StatusChange, TrooperLossRatio};
use crate::roster::Roster;
use crate::unit::{MechLocation, Morale, Posture, StatusFlags, Unit, UnitId, UnitInner};
use tracing::debug;

/// Applies a resolved outcome to the roster. See the module docs for the
/// double-application guard.
pub fn apply_outcome(
    roster: &mut Roster,
    outcome: &mut AttackOutcome,
) -> Result<ApplyResult, EngineError> {
    if outcome.applied {
        return Err(EngineError::OutcomeAlreadyApplied);
    }
    if outcome.damage < 0 || outcome.attacker_damage < 0 {
        return Err(EngineError::Invariant(format!(
            "negative damage in outcome ({} / {})",
            outcome.damage, outcome.attacker_damage
        )));
    }
    // Both units must exist before any mutation happens.
    roster.unit(outcome.attacker)?;
    roster.unit(outcome.target)?;

    let mut result = ApplyResult {
        messages: outcome.messages.clone(),
        ..ApplyResult::default()
    };

    // Target damage and critical effects.
    if let Some(location) = outcome.location {
        let target = roster.unit_mut(outcome.target)?;
        let report = apply_damage(target, location, outcome.damage, outcome.trooper_ratio);
        result.armor_damage = report.armor;
        result.structure_damage = report.structure;
        result.troopers_lost = report.troopers;
    }
    apply_criticals(roster, outcome, &mut result)?;
    apply_status_changes(roster, outcome.target, &outcome.status_changes, &mut result)?;

    // Attacker-side damage (recoil, crashes, mishaps) and statuses.
    if let Some(location) = outcome.attacker_location {
        let attacker = roster.unit_mut(outcome.attacker)?;
        apply_damage(
            attacker,
            location,
            outcome.attacker_damage,
            outcome.attacker_trooper_ratio,
        );
    }
    apply_status_changes(
        roster,
        outcome.attacker,
        &outcome.attacker_status_changes,
        &mut result,
    )?;

    // A Death-From-Above attacker comes down beside its target, hit or miss.
    if matches!(outcome.kind, AttackKind::Jump(JumpKind::DeathFromAbove)) {
        let target_pos = roster.unit(outcome.target)?.pos;
        let attacker = roster.unit_mut(outcome.attacker)?;
        attacker.pos = target_pos.step_toward(attacker.pos);
        result.statuses.push("attacker landed".to_string());
    }

    roster.unit_mut(outcome.attacker)?.acted = true;

    // Terminal-state cleanup: destruction releases swarm attachments.
    result.target_destroyed = finalize_destruction(roster, outcome.target)?;
    result.attacker_destroyed = finalize_destruction(roster, outcome.attacker)?;

    outcome.applied = true;
    debug!(target = %outcome.target, damage = outcome.damage,
        destroyed = result.target_destroyed, "outcome applied");
    Ok(result)
}

struct DamageReport {
    armor: i32,
    structure: i32,
    troopers: i32,
}

/// Writes damage into a unit's pools. Pools never go negative; overflow
/// beyond a destroyed location is lost.
fn apply_damage(
    unit: &mut Unit,
    location: HitLocation,
    damage: i32,
    ratio: TrooperLossRatio,
) -> DamageReport {
    let mut report = DamageReport {
        armor: 0,
        structure: 0,
        troopers: 0,
    };
    if damage <= 0 {
        return report;
    }
    let mut hulled = false;
    match &mut unit.inner {
        UnitInner::Mech(mech) => {
            if let HitLocation::Mech(loc) = location {
                let slot = mech.armor.slot_mut(loc);
                let absorbed = slot.armor.min(damage);
                slot.armor -= absorbed;
                report.armor = absorbed;
                let overflow = damage - absorbed;
                if overflow > 0 {
                    let structural = slot.structure.min(overflow);
                    slot.structure -= structural;
                    report.structure = structural;
                    if slot.structure == 0 {
                        slot.destroyed = true;
                    }
                }
            }
        }
        UnitInner::Vehicle(vehicle) => {
            if let HitLocation::Vehicle(facing) = location {
                let armor = vehicle.armor.facing_mut(facing);
                let absorbed = (*armor).min(damage);
                *armor -= absorbed;
                report.armor = absorbed;
                let overflow = damage - absorbed;
                if overflow > 0 {
                    let structural = vehicle.structure.min(overflow);
                    vehicle.structure -= structural;
                    report.structure = structural;
                }
                hulled = vehicle.structure == 0;
            }
        }
        UnitInner::Infantry(platoon) => {
            let lost = ratio.troopers_lost(damage).min(platoon.troopers);
            platoon.troopers -= lost;
            report.troopers = lost;
            hulled = platoon.troopers == 0;
        }
    }
    if hulled {
        unit.flags.insert(StatusFlags::DESTROYED);
    }
    propagate_mech_destruction(unit);
    report
}

/// Destroyed head or center torso kills the mech; a destroyed leg drops it.
fn propagate_mech_destruction(unit: &mut Unit) {
    let Some(mech) = unit.as_mech() else { return };
    let dead = mech.armor.head.destroyed || mech.armor.center_torso.destroyed;
    let legless = mech.armor.left_leg.destroyed || mech.armor.right_leg.destroyed;
    if dead {
        unit.flags.insert(StatusFlags::DESTROYED);
    }
    if legless {
        unit.flags.insert(StatusFlags::PRONE);
        if let Some(mech) = unit.as_mech_mut() {
            mech.posture = Posture::Prone;
        }
    }
}

fn apply_criticals(
    roster: &mut Roster,
    outcome: &AttackOutcome,
    result: &mut ApplyResult,
) -> Result<(), EngineError> {
    for effect in &outcome.critical_effects {
        match *effect {
            CriticalEffect::InternalDamage { location, amount } => {
                let target = roster.unit_mut(outcome.target)?;
                structure_damage(target, location, amount);
                result.structure_damage += amount;
                result.statuses.push(format!("internal damage to {location}"));
            }
            CriticalEffect::CriticalHit { location, count } => {
                let target = roster.unit_mut(outcome.target)?;
                structure_damage(target, location, count);
                result.structure_damage += count;
                result.statuses.push(format!("critical hit to {location}"));
            }
            CriticalEffect::ActuatorDamage(location) => {
                let target = roster.unit_mut(outcome.target)?;
                structure_damage(target, location, 1);
                result.statuses.push(format!("actuator damaged in {location}"));
            }
            CriticalEffect::Knockback { hexes } => {
                let attacker_pos = roster.unit(outcome.attacker)?.pos;
                let target = roster.unit_mut(outcome.target)?;
                for _ in 0..hexes {
                    target.pos = target.pos.step_away(attacker_pos);
                }
                result.statuses.push(format!("knocked back {hexes}"));
            }
            // Resolved during resolution: the override already moved the
            // hit location, and the piloting roll already produced its
            // KnockedProne status change.
            CriticalEffect::HitLocationOverride(_)
            | CriticalEffect::ForcedPilotingRoll { .. }
            | CriticalEffect::PilotEffect { .. } => {}
        }
    }
    Ok(())
}

/// Structure damage that bypasses armor (critical effects).
fn structure_damage(unit: &mut Unit, location: MechLocation, amount: i32) {
    let mut hulled = false;
    match &mut unit.inner {
        UnitInner::Mech(mech) => {
            let slot = mech.armor.slot_mut(location);
            slot.structure = (slot.structure - amount).max(0);
            if slot.structure == 0 {
                slot.destroyed = true;
            }
        }
        UnitInner::Vehicle(vehicle) => {
            // Vehicles keep one structure pool; the location is nominal.
            vehicle.structure = (vehicle.structure - amount).max(0);
            hulled = vehicle.structure == 0;
        }
        UnitInner::Infantry(_) => {}
    }
    if hulled {
        unit.flags.insert(StatusFlags::DESTROYED);
    }
    propagate_mech_destruction(unit);
}

fn apply_status_changes(
    roster: &mut Roster,
    subject: UnitId,
    changes: &[StatusChange],
    result: &mut ApplyResult,
) -> Result<(), EngineError> {
    for change in changes {
        match *change {
            StatusChange::KnockedProne => {
                let unit = roster.unit_mut(subject)?;
                unit.flags.insert(StatusFlags::PRONE);
                if let Some(mech) = unit.as_mech_mut() {
                    mech.posture = Posture::Prone;
                }
                result.statuses.push(format!("unit {subject} knocked prone"));
            }
            StatusChange::Stunned { rounds } => {
                let unit = roster.unit_mut(subject)?;
                unit.stunned_rounds = unit.stunned_rounds.max(rounds);
                result.statuses.push(format!("unit {subject} stunned"));
            }
            StatusChange::Suppressed => {
                roster.unit_mut(subject)?.flags.insert(StatusFlags::SUPPRESSED);
                result.statuses.push(format!("unit {subject} suppressed"));
            }
            StatusChange::RevealHidden => {
                roster.unit_mut(subject)?.flags.remove(StatusFlags::HIDDEN);
                result.statuses.push(format!("unit {subject} revealed"));
            }
            StatusChange::MoraleFailure => {
                let mut broke = false;
                if let Some(platoon) = roster.unit_mut(subject)?.as_infantry_mut() {
                    platoon.morale = platoon.morale.fail_check();
                    broke = platoon.morale == Morale::Broken;
                    result.statuses.push(format!(
                        "unit {subject} morale now {:?}",
                        platoon.morale
                    ));
                }
                // A broken platoon abandons any climb it was making.
                if broke {
                    roster.detach(subject);
                }
            }
            StatusChange::Attach { mech, location } => {
                roster.attach(subject, mech, location)?;
                result
                    .statuses
                    .push(format!("unit {subject} swarming unit {mech} ({location})"));
            }
            StatusChange::Detach => {
                roster.detach(subject);
                result.statuses.push(format!("unit {subject} detached"));
            }
            StatusChange::ConsumeEquipment { slot } => {
                let unit = roster.unit_mut(subject)?;
                if slot < unit.equipment.len() {
                    let item = unit.equipment.remove(slot);
                    result.statuses.push(format!("{} expended", item.name));
                }
            }
        }
    }
    Ok(())
}

/// Flags terminal units and releases swarm state. Returns whether the unit
/// ended up destroyed.
fn finalize_destruction(roster: &mut Roster, id: UnitId) -> Result<bool, EngineError> {
    let destroyed = !roster.unit(id)?.is_alive();
    if destroyed {
        roster.detach_all_from(id);
        roster.detach(id);
    }
    Ok(destroyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{AntiMechKind, MeleeKind};
    use crate::hex::HexCoord;
    use crate::outcome::PilotKind;
    use crate::unit::{
        Equipment, Experience, InfantryComponents, MechComponents, Team, UnitInner,
    };

    fn mech(id: u64, tonnage: i32) -> Unit {
        Unit::new(
            UnitId::new(id),
            Team(0),
            "Mech",
            HexCoord::new(0, 0),
            UnitInner::Mech(MechComponents::new(tonnage, 4, 4)),
        )
    }

    fn platoon(id: u64, troopers: i32) -> Unit {
        Unit::new(
            UnitId::new(id),
            Team(1),
            "Rifles",
            HexCoord::new(1, 0),
            UnitInner::Infantry(InfantryComponents::new(troopers, Experience::Regular)),
        )
    }

    fn simple_outcome(attacker: UnitId, target: UnitId, damage: i32) -> AttackOutcome {
        let mut outcome = AttackOutcome::hit(
            attacker,
            target,
            AttackKind::Melee(MeleeKind::Strike),
            10,
            7,
        );
        outcome.damage = damage;
        outcome.location = Some(HitLocation::Mech(MechLocation::CenterTorso));
        outcome
    }

    #[test]
    fn damage_flows_armor_then_structure() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50)); // CT: 10 armor, 5 structure
        let mut outcome = simple_outcome(a, t, 12);
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert_eq!(result.armor_damage, 10);
        assert_eq!(result.structure_damage, 2);
        let ct = roster.unit(t).unwrap().as_mech().unwrap().armor.center_torso;
        assert_eq!(ct.armor, 0);
        assert_eq!(ct.structure, 3);
        assert!(!ct.destroyed);
    }

    #[test]
    fn center_torso_destruction_kills_the_mech() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let mut outcome = simple_outcome(a, t, 99);
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(result.target_destroyed);
        assert!(!roster.unit(t).unwrap().is_alive());
    }

    #[test]
    fn leg_destruction_drops_the_mech() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let mut outcome = simple_outcome(a, t, 99);
        outcome.location = Some(HitLocation::Mech(MechLocation::LeftLeg));
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(!result.target_destroyed);
        let target = roster.unit(t).unwrap();
        assert!(target.is_prone());
        assert!(target.as_mech().unwrap().armor.left_leg.destroyed);
    }

    #[test]
    fn trooper_conversion_matches_ratio() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(platoon(2, 10));
        let mut outcome = simple_outcome(a, t, 6);
        outcome.location = Some(HitLocation::Troopers);
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert_eq!(result.troopers_lost, 3); // ceil(6 / 2)
        assert_eq!(
            roster.unit(t).unwrap().as_infantry().unwrap().troopers,
            7
        );
    }

    #[test]
    fn troopers_never_go_negative_and_zero_is_terminal() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(platoon(2, 3));
        let mut outcome = simple_outcome(a, t, 40);
        outcome.location = Some(HitLocation::Troopers);
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert_eq!(result.troopers_lost, 3);
        assert!(result.target_destroyed);
        assert_eq!(roster.unit(t).unwrap().as_infantry().unwrap().troopers, 0);
    }

    #[test]
    fn double_apply_is_refused() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let mut outcome = simple_outcome(a, t, 5);
        apply_outcome(&mut roster, &mut outcome).unwrap();
        let err = apply_outcome(&mut roster, &mut outcome).unwrap_err();
        assert_eq!(err, EngineError::OutcomeAlreadyApplied);
        // First application stuck; no double damage.
        let ct = roster.unit(t).unwrap().as_mech().unwrap().armor.center_torso;
        assert_eq!(ct.armor, 5);
    }

    #[test]
    fn attach_and_broken_morale_detach() {
        let mut roster = Roster::new();
        let t = roster.insert(mech(1, 50));
        let mut rifles = platoon(2, 10);
        rifles.as_infantry_mut().unwrap().morale = Morale::Breaking;
        let a = roster.insert(rifles);

        let mut outcome = AttackOutcome::hit(
            a,
            t,
            AttackKind::AntiMech(AntiMechKind::Swarm),
            0,
            7,
        );
        outcome.damage = 3;
        outcome.location = Some(HitLocation::Mech(MechLocation::Head));
        outcome.attacker_status_changes.push(StatusChange::Attach {
            mech: t,
            location: MechLocation::Head,
        });
        apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(roster.attachment(a).is_some());

        // Later, the platoon breaks: its attachment is abandoned.
        let mut second = AttackOutcome::hit(t, a, AttackKind::Melee(MeleeKind::Strike), 10, 7);
        second.damage = 4;
        second.location = Some(HitLocation::Troopers);
        second.status_changes.push(StatusChange::MoraleFailure);
        apply_outcome(&mut roster, &mut second).unwrap();
        assert_eq!(
            roster.unit(a).unwrap().as_infantry().unwrap().morale,
            Morale::Broken
        );
        assert!(roster.attachment(a).is_none());
    }

    #[test]
    fn destroying_a_swarmed_mech_releases_the_riders() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let riders = roster.insert(platoon(3, 10));
        roster.attach(riders, t, MechLocation::CenterTorso).unwrap();

        let mut outcome = simple_outcome(a, t, 99);
        let result = apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(result.target_destroyed);
        assert!(roster.attachment(riders).is_none());
    }

    #[test]
    fn consume_equipment_removes_the_item() {
        let mut roster = Roster::new();
        let t = roster.insert(mech(1, 50));
        let a = roster.insert(
            platoon(2, 10).with_equipment(Equipment::mine("satchel charge")),
        );
        let mut outcome = AttackOutcome::hit(
            a,
            t,
            AttackKind::AntiMech(AntiMechKind::MinePlacement),
            10,
            7,
        );
        outcome.damage = 6;
        outcome.location = Some(HitLocation::Mech(MechLocation::RightLeg));
        outcome
            .attacker_status_changes
            .push(StatusChange::ConsumeEquipment { slot: 0 });
        apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(roster.unit(a).unwrap().equipment.is_empty());
    }

    #[test]
    fn knockback_moves_the_target_away() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let mut far = mech(2, 50);
        far.pos = HexCoord::new(1, 0);
        let t = roster.insert(far);
        let mut outcome = simple_outcome(a, t, 4);
        outcome.critical = true;
        outcome
            .critical_effects
            .push(CriticalEffect::Knockback { hexes: 1 });
        apply_outcome(&mut roster, &mut outcome).unwrap();
        let new_pos = roster.unit(t).unwrap().pos;
        assert!(new_pos.distance(HexCoord::new(0, 0)) > 1);
    }

    #[test]
    fn stun_takes_the_longer_duration() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let mut dazed = mech(2, 50);
        dazed.stunned_rounds = 3;
        let t = roster.insert(dazed);
        let mut outcome = simple_outcome(a, t, 2);
        outcome.critical_effects.push(CriticalEffect::PilotEffect {
            kind: PilotKind::Concussion,
            rounds: 2,
        });
        outcome.status_changes.push(StatusChange::Stunned { rounds: 2 });
        apply_outcome(&mut roster, &mut outcome).unwrap();
        assert_eq!(roster.unit(t).unwrap().stunned_rounds, 3);
    }

    #[test]
    fn apply_marks_the_attacker_acted() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let mut outcome = simple_outcome(a, t, 2);
        apply_outcome(&mut roster, &mut outcome).unwrap();
        assert!(roster.unit(a).unwrap().acted);
    }

    #[test]
    fn negative_damage_is_an_invariant_violation() {
        let mut roster = Roster::new();
        let a = roster.insert(mech(1, 50));
        let t = roster.insert(mech(2, 50));
        let mut outcome = simple_outcome(a, t, -1);
        let err = apply_outcome(&mut roster, &mut outcome).unwrap_err();
        assert!(matches!(err, EngineError::Invariant(_)));
        assert!(!outcome.applied);
    }
}
