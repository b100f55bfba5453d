//! Attack precondition validation.
//!
//! `validate` determines whether an attack may legally be attempted. It
//! never mutates state and is safe to re-run before every resolution
//! attempt. Rule violations come back as `EngineError::Illegal`; missing
//! units or hexes as the distinct not-found variants.

use crate::attack::{AntiMechKind, AttackKind, AttackRequest, JumpKind, MeleeKind};
use crate::battlefield::{BattleContext, MapView};
use crate::error::{EngineError, RuleViolation};
use crate::roster::Roster;
use crate::unit::{EquipmentFlags, StatusFlags, Unit, UnitInner, UnitKind};
use tracing::debug;

/// Target tonnage above which swarming requires magnetic clamps.
pub const CLAMP_TONNAGE: i32 = 80;
/// Trooper floor for a swarm attempt.
pub const SWARM_TROOPER_FLOOR: i32 = 5;
/// Trooper floor for a leg attack.
pub const LEG_ATTACK_TROOPER_FLOOR: i32 = 4;

/// Validates an attack request against the current battlefield state.
pub fn validate(
    roster: &Roster,
    map: &dyn MapView,
    _ctx: &BattleContext,
    request: &AttackRequest,
) -> Result<(), EngineError> {
    let attacker = roster.unit(request.attacker)?;
    let target = roster.unit(request.target)?;

    if request.attacker == request.target {
        return Err(RuleViolation::SelfTarget.into());
    }
    shared_attacker_checks(attacker)?;
    if !target.is_alive() {
        return Err(RuleViolation::TargetEliminated.into());
    }

    // Both endpoints must be on the battlefield.
    map.hex(attacker.pos)
        .ok_or(EngineError::HexNotFound(attacker.pos))?;
    map.hex(target.pos)
        .ok_or(EngineError::HexNotFound(target.pos))?;
    let distance = map.distance(attacker.pos, target.pos);

    let result = match request.kind {
        AttackKind::Melee(kind) => validate_melee(kind, attacker, distance),
        AttackKind::InfantryFire => validate_fire(roster, map, attacker, target, distance, request),
        AttackKind::AntiMech(kind) => validate_antimech(kind, roster, attacker, target, distance),
        AttackKind::Jump(kind) => validate_jump(kind, attacker, target, distance, request),
    };
    if let Err(err) = &result {
        debug!(attacker = %attacker.id, target = %target.id, kind = %request.kind, %err, "attack rejected");
    }
    result
}

fn shared_attacker_checks(attacker: &Unit) -> Result<(), EngineError> {
    if !attacker.is_alive() {
        return Err(RuleViolation::AttackerEliminated.into());
    }
    if attacker.flags.contains(StatusFlags::SHUTDOWN) {
        return Err(RuleViolation::AttackerShutDown.into());
    }
    if attacker.stunned_rounds > 0 {
        return Err(RuleViolation::AttackerStunned {
            rounds: attacker.stunned_rounds,
        }
        .into());
    }
    if attacker.acted {
        return Err(RuleViolation::AlreadyActed.into());
    }
    if let UnitInner::Infantry(platoon) = &attacker.inner {
        if !platoon.morale.can_attack() {
            return Err(RuleViolation::BrokenMorale.into());
        }
    }
    Ok(())
}

fn validate_melee(kind: MeleeKind, attacker: &Unit, distance: i32) -> Result<(), EngineError> {
    match kind {
        MeleeKind::Strike | MeleeKind::Kick | MeleeKind::PrecisionStrike => {
            if attacker.kind() != UnitKind::Mech {
                return Err(RuleViolation::WrongAttackerType { expected: "mech" }.into());
            }
            if attacker.is_prone() {
                return Err(RuleViolation::AttackerProne.into());
            }
        }
        MeleeKind::Charge => {
            if attacker.kind() == UnitKind::Infantry {
                return Err(RuleViolation::WrongAttackerType {
                    expected: "mech or vehicle",
                }
                .into());
            }
            if attacker.is_prone() {
                return Err(RuleViolation::AttackerProne.into());
            }
            if attacker.movement.kind != crate::unit::MoveKind::Ran
                || attacker.movement.hexes_moved < 2
            {
                return Err(RuleViolation::NoRunUp {
                    moved: attacker.movement.hexes_moved,
                }
                .into());
            }
        }
    }
    if kind == MeleeKind::PrecisionStrike && !attacker.has_equipment(EquipmentFlags::VIBRO) {
        return Err(RuleViolation::MissingEquipment {
            equipment: "a vibro blade",
        }
        .into());
    }
    if distance > 1 {
        return Err(RuleViolation::OutOfRange {
            need: 1,
            have: distance,
        }
        .into());
    }
    Ok(())
}

fn validate_fire(
    roster: &Roster,
    map: &dyn MapView,
    attacker: &Unit,
    target: &Unit,
    distance: i32,
    request: &AttackRequest,
) -> Result<(), EngineError> {
    let Some(platoon) = attacker.as_infantry() else {
        return Err(RuleViolation::WrongAttackerType {
            expected: "infantry platoon",
        }
        .into());
    };
    if platoon.troopers < 1 {
        return Err(RuleViolation::InsufficientTroopers {
            need: 1,
            have: platoon.troopers,
        }
        .into());
    }
    if roster.attachment(attacker.id).is_some() {
        return Err(RuleViolation::FiringWhileSwarming.into());
    }
    let Some((_, weapon)) = attacker.ranged_weapon(request.params.weapon) else {
        return Err(RuleViolation::MissingEquipment {
            equipment: "a ranged weapon",
        }
        .into());
    };
    if distance > weapon.range {
        return Err(RuleViolation::OutOfRange {
            need: weapon.range,
            have: distance,
        }
        .into());
    }
    if !map.line_of_sight(attacker.pos, target.pos).clear {
        return Err(RuleViolation::NoLineOfSight.into());
    }
    Ok(())
}

fn validate_antimech(
    kind: AntiMechKind,
    roster: &Roster,
    attacker: &Unit,
    target: &Unit,
    distance: i32,
) -> Result<(), EngineError> {
    let Some(platoon) = attacker.as_infantry() else {
        return Err(RuleViolation::WrongAttackerType {
            expected: "infantry platoon",
        }
        .into());
    };
    let Some(mech) = target.as_mech() else {
        return Err(RuleViolation::WrongTargetType { expected: "mech" }.into());
    };

    match kind {
        AntiMechKind::Swarm => {
            if !attacker.has_equipment(EquipmentFlags::ANTI_MECH) {
                return Err(RuleViolation::MissingEquipment {
                    equipment: "anti-mech gear",
                }
                .into());
            }
            if platoon.troopers < SWARM_TROOPER_FLOOR {
                return Err(RuleViolation::InsufficientTroopers {
                    need: SWARM_TROOPER_FLOOR,
                    have: platoon.troopers,
                }
                .into());
            }
            if mech.tonnage > CLAMP_TONNAGE
                && !attacker.has_equipment(EquipmentFlags::MAGNETIC_CLAMP)
            {
                return Err(RuleViolation::ClampsRequired {
                    tonnage: mech.tonnage,
                }
                .into());
            }
            match roster.attachment(attacker.id) {
                // Follow-up attacks from aboard are always in contact.
                Some(attachment) if attachment.mech == target.id => {}
                Some(_) => return Err(RuleViolation::AlreadySwarming.into()),
                None if distance > 0 => {
                    return Err(RuleViolation::NotSameHex { have: distance }.into())
                }
                None => {}
            }
        }
        AntiMechKind::LegAttack => {
            if !attacker.has_equipment(EquipmentFlags::ANTI_MECH) {
                return Err(RuleViolation::MissingEquipment {
                    equipment: "anti-mech gear",
                }
                .into());
            }
            if platoon.troopers < LEG_ATTACK_TROOPER_FLOOR {
                return Err(RuleViolation::InsufficientTroopers {
                    need: LEG_ATTACK_TROOPER_FLOOR,
                    have: platoon.troopers,
                }
                .into());
            }
            if roster.attachment(attacker.id).is_some() {
                return Err(RuleViolation::AlreadySwarming.into());
            }
            if distance > 0 {
                return Err(RuleViolation::NotSameHex { have: distance }.into());
            }
        }
        AntiMechKind::MinePlacement => {
            if !attacker.has_equipment(EquipmentFlags::MINE) {
                return Err(RuleViolation::MissingEquipment {
                    equipment: "a demolition mine",
                }
                .into());
            }
            if platoon.troopers < 1 {
                return Err(RuleViolation::InsufficientTroopers {
                    need: 1,
                    have: platoon.troopers,
                }
                .into());
            }
            if distance > 0 {
                return Err(RuleViolation::NotSameHex { have: distance }.into());
            }
        }
    }
    Ok(())
}

fn validate_jump(
    kind: JumpKind,
    attacker: &Unit,
    target: &Unit,
    distance: i32,
    request: &AttackRequest,
) -> Result<(), EngineError> {
    let Some(mech) = attacker.as_mech() else {
        return Err(RuleViolation::WrongAttackerType { expected: "mech" }.into());
    };
    if mech.jump_jets < 1 || attacker.movement.kind != crate::unit::MoveKind::Jumped {
        return Err(RuleViolation::NotJumped.into());
    }

    match kind {
        JumpKind::JetStrike => {
            if attacker.is_prone() {
                return Err(RuleViolation::AttackerProne.into());
            }
            if distance > 1 {
                return Err(RuleViolation::OutOfRange {
                    need: 1,
                    have: distance,
                }
                .into());
            }
        }
        JumpKind::DeathFromAbove => {
            if let Some(vehicle) = target.as_vehicle() {
                if vehicle.vtol {
                    return Err(RuleViolation::TargetAirborne.into());
                }
            }
            let Some(jump_distance) = request.params.jump_distance else {
                return Err(RuleViolation::MissingParameter {
                    param: "jump distance",
                }
                .into());
            };
            if jump_distance < 1 || jump_distance > mech.jump_jets {
                return Err(RuleViolation::JumpTooFar {
                    requested: jump_distance,
                    capability: mech.jump_jets,
                }
                .into());
            }
        }
    }
    Ok(())
}
