//! Test factory functions for units and battlefields.

use crate::battlefield::{BattleContext, FlatMap};
use crate::hex::HexCoord;
use crate::roster::Roster;
use crate::unit::{
    Equipment, EquipmentFlags, Experience, InfantryComponents, MechComponents, Team, Unit, UnitId,
    UnitInner, VehicleComponents,
};

/// A 20x20 open battlefield with a clear-day context.
pub fn open_field() -> (FlatMap, BattleContext) {
    (FlatMap::new(20, 20), BattleContext::clear_day())
}

/// A mech with the given tonnage and piloting skill.
pub fn spawn_mech(roster: &mut Roster, id: u64, tonnage: i32, piloting: i32, pos: HexCoord) -> UnitId {
    roster.insert(Unit::new(
        UnitId::new(id),
        Team(0),
        "Mech",
        pos,
        UnitInner::Mech(MechComponents::new(tonnage, 4, piloting)),
    ))
}

/// A jump-capable mech that jumped this turn.
pub fn spawn_jumper(
    roster: &mut Roster,
    id: u64,
    tonnage: i32,
    piloting: i32,
    pos: HexCoord,
) -> UnitId {
    let mut unit = Unit::new(
        UnitId::new(id),
        Team(0),
        "Jumper",
        pos,
        UnitInner::Mech(MechComponents::new(tonnage, 4, piloting).with_jump_jets(5)),
    );
    unit.movement.kind = crate::unit::MoveKind::Jumped;
    unit.movement.hexes_moved = 1;
    roster.insert(unit)
}

/// A rifle platoon with a ranged weapon.
pub fn spawn_rifles(roster: &mut Roster, id: u64, troopers: i32, pos: HexCoord) -> UnitId {
    roster.insert(
        Unit::new(
            UnitId::new(id),
            Team(1),
            "Rifles",
            pos,
            UnitInner::Infantry(InfantryComponents::new(troopers, Experience::Regular)),
        )
        .with_equipment(Equipment::weapon("auto rifle", 6)),
    )
}

/// An anti-mech trained platoon (satchel charges, no clamps).
pub fn spawn_sappers(roster: &mut Roster, id: u64, troopers: i32, pos: HexCoord) -> UnitId {
    roster.insert(
        Unit::new(
            UnitId::new(id),
            Team(1),
            "Sappers",
            pos,
            UnitInner::Infantry(InfantryComponents::new(troopers, Experience::Regular)),
        )
        .with_equipment(Equipment::gear("satchel charges", EquipmentFlags::ANTI_MECH)),
    )
}

/// A ground vehicle.
pub fn spawn_vehicle(roster: &mut Roster, id: u64, tonnage: i32, pos: HexCoord) -> UnitId {
    roster.insert(Unit::new(
        UnitId::new(id),
        Team(0),
        "Tank",
        pos,
        UnitInner::Vehicle(VehicleComponents::new(tonnage, 4)),
    ))
}
