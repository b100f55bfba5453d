//! Public engine facade.
//!
//! The exposed operations drive the shared pipeline:
//! validate → to-hit → roll → damage/critical → apply. `execute_attack`
//! deliberately stops short of mutation so callers can preview an outcome
//! ("what would happen") before committing it with [`apply_outcome`].
//!
//! The engine is synchronous and single-threaded: one request is
//! resolved to completion before the next begins, because each application
//! can change the legality and odds of the next. The host owns the roster,
//! map, context, and roller, and must serialize calls touching overlapping
//! units.

use crate::attack::AttackRequest;
use crate::battlefield::{BattleContext, MapView};
use crate::error::{EngineError, RuleViolation};
use crate::outcome::{AttackOutcome, DislodgeOutcome, RallyOutcome, ToHitResult};
use crate::roster::Roster;
use crate::tohit::{self, ToHitInputs};
use crate::unit::{Morale, UnitId};
use dicecup::Roll;
use tracing::debug;

pub use crate::apply::apply_outcome;
pub use crate::validate::validate as validate_attack;

/// Dislodge margin added to the mech's piloting skill.
pub const DISLODGE_MODIFIER: i32 = 4;

/// Computes the to-hit number for a request without rolling anything.
pub fn calculate_to_hit(
    roster: &Roster,
    map: &dyn MapView,
    ctx: &BattleContext,
    request: &AttackRequest,
) -> Result<ToHitResult, EngineError> {
    let attacker = roster.unit(request.attacker)?;
    let target = roster.unit(request.target)?;
    let attacker_hex = map
        .hex(attacker.pos)
        .ok_or(EngineError::HexNotFound(attacker.pos))?;
    let target_hex = map
        .hex(target.pos)
        .ok_or(EngineError::HexNotFound(target.pos))?;
    let inputs = ToHitInputs {
        attacker,
        target,
        attacker_hex,
        target_hex,
        distance: map.distance(attacker.pos, target.pos),
        ctx: *ctx,
        params: request.params,
        attached_to_target: roster
            .attachment(attacker.id)
            .is_some_and(|a| a.mech == target.id),
    };
    Ok(tohit::calculate(request.kind, &inputs))
}

/// Validates, computes the to-hit number, and resolves the attack.
///
/// Does **not** mutate any unit: the returned outcome is a preview until
/// the caller commits it with [`apply_outcome`].
pub fn execute_attack(
    roster: &Roster,
    map: &dyn MapView,
    ctx: &BattleContext,
    request: &AttackRequest,
    roller: &mut dyn Roll,
) -> Result<AttackOutcome, EngineError> {
    validate_attack(roster, map, ctx, request)?;
    let to_hit = calculate_to_hit(roster, map, ctx, request)?;
    debug!(attacker = %request.attacker, target = %request.target,
        kind = %request.kind, target_number = to_hit.target_number, "executing attack");
    crate::resolve::resolve(roster, request, &to_hit, roller)
}

/// Attempts to rally a Breaking infantry platoon.
///
/// Recovery requires both having moved away from the nearest enemy and a
/// passed rally check; a failed rally leaves the platoon Breaking.
pub fn attempt_rally(
    roster: &mut Roster,
    unit_id: UnitId,
    moved_away: bool,
    roller: &mut dyn Roll,
) -> Result<RallyOutcome, EngineError> {
    let unit = roster.unit_mut(unit_id)?;
    let Some(platoon) = unit.as_infantry_mut() else {
        return Err(RuleViolation::WrongAttackerType {
            expected: "infantry platoon",
        }
        .into());
    };
    let target_number = platoon.experience.morale_target();
    let roll = roller.two_d6();
    let check_passed = roll >= target_number;
    let before = platoon.morale;
    platoon.morale = platoon.morale.rally(moved_away, check_passed);
    let rallied = before == Morale::Breaking && platoon.morale == Morale::Steady;
    debug!(unit = %unit_id, roll, target_number, rallied, "rally attempt");
    Ok(RallyOutcome {
        unit: unit_id,
        roll,
        target_number,
        rallied,
    })
}

/// A mech tries to shake off every platoon swarming it.
///
/// One 2d6 roll against piloting + [`DISLODGE_MODIFIER`]; on a success all
/// riders are thrown off, each taking a d6 mishap at the fine
/// one-damage-per-trooper ratio.
pub fn attempt_dislodge(
    roster: &mut Roster,
    mech_id: UnitId,
    roller: &mut dyn Roll,
) -> Result<DislodgeOutcome, EngineError> {
    let mech_unit = roster.unit(mech_id)?;
    let Some(mech) = mech_unit.as_mech() else {
        return Err(RuleViolation::WrongAttackerType { expected: "mech" }.into());
    };
    let target_number = mech.piloting + DISLODGE_MODIFIER;
    let riders = roster.swarmers_of(mech_id);
    let roll = roller.two_d6();
    let mut dislodged = Vec::new();
    if roll >= target_number {
        for rider in riders {
            let mishap = roller.die(6);
            let mut wiped = false;
            if let Some(platoon) = roster.unit_mut(rider)?.as_infantry_mut() {
                let lost = mishap.min(platoon.troopers);
                platoon.troopers -= lost;
                wiped = platoon.troopers == 0;
            }
            if wiped {
                roster
                    .unit_mut(rider)?
                    .flags
                    .insert(crate::unit::StatusFlags::DESTROYED);
            }
            roster.detach(rider);
            dislodged.push((rider, mishap));
        }
    }
    debug!(mech = %mech_id, roll, target_number, thrown = dislodged.len(), "dislodge attempt");
    Ok(DislodgeOutcome {
        mech: mech_id,
        roll,
        target_number,
        dislodged,
    })
}
