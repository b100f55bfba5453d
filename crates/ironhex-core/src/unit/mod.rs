//! Unit data model.
//!
//! Units are polymorphic over three categories (mechs, infantry platoons,
//! and vehicles) using the tag + typed-inner-storage shape: a [`UnitKind`]
//! tag for dispatch and a [`UnitInner`] enum holding the category's
//! components. Common state (identity, team, position, movement, status
//! flags, equipment) lives on [`Unit`] itself.
//!
//! # Invariants
//!
//! - Trooper counts, armor, and structure never go negative; the effect
//!   applicator clamps at zero and flags the unit DESTROYED.
//! - A DESTROYED unit is terminal: it is excluded from targeting and is
//!   never a legal attacker again.

pub mod equipment;
pub mod status;

pub use equipment::{Equipment, EquipmentFlags};
pub use status::{Morale, Posture, StatusFlags, SwarmAttachment};

use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a unit.
///
/// Newtype over `u64`; ordered by numeric value so roster iteration is
/// deterministic.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u64);

impl UnitId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UnitId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Team affiliation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(pub u8);

/// Unit category tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Battle mech.
    Mech,
    /// Infantry platoon.
    Infantry,
    /// Ground or VTOL vehicle.
    Vehicle,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mech => write!(f, "Mech"),
            Self::Infantry => write!(f, "Infantry"),
            Self::Vehicle => write!(f, "Vehicle"),
        }
    }
}

/// Mech body locations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MechLocation {
    /// Head.
    Head,
    /// Center torso.
    CenterTorso,
    /// Left torso.
    LeftTorso,
    /// Right torso.
    RightTorso,
    /// Left arm.
    LeftArm,
    /// Right arm.
    RightArm,
    /// Left leg.
    LeftLeg,
    /// Right leg.
    RightLeg,
}

impl MechLocation {
    /// Returns true for either leg.
    #[must_use]
    pub const fn is_leg(self) -> bool {
        matches!(self, Self::LeftLeg | Self::RightLeg)
    }

    /// Returns true for either arm.
    #[must_use]
    pub const fn is_arm(self) -> bool {
        matches!(self, Self::LeftArm | Self::RightArm)
    }

    /// Returns true for the side torsos.
    #[must_use]
    pub const fn is_side_torso(self) -> bool {
        matches!(self, Self::LeftTorso | Self::RightTorso)
    }
}

impl fmt::Display for MechLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Head => "head",
            Self::CenterTorso => "center torso",
            Self::LeftTorso => "left torso",
            Self::RightTorso => "right torso",
            Self::LeftArm => "left arm",
            Self::RightArm => "right arm",
            Self::LeftLeg => "left leg",
            Self::RightLeg => "right leg",
        };
        write!(f, "{name}")
    }
}

/// Vehicle facings (and the turret).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleFacing {
    /// Front armor.
    Front,
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// Rear armor.
    Rear,
    /// Turret.
    Turret,
}

impl fmt::Display for VehicleFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Front => "front",
            Self::Left => "left side",
            Self::Right => "right side",
            Self::Rear => "rear",
            Self::Turret => "turret",
        };
        write!(f, "{name}")
    }
}

/// Armor and internal structure of one mech location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    /// Remaining armor points.
    pub armor: i32,
    /// Remaining internal structure points.
    pub structure: i32,
    /// Whether the location has been destroyed.
    pub destroyed: bool,
}

impl LocationState {
    /// A fresh location with the given pools.
    #[must_use]
    pub const fn new(armor: i32, structure: i32) -> Self {
        Self {
            armor,
            structure,
            destroyed: false,
        }
    }
}

/// Per-location armor/structure for a mech.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechArmor {
    /// Head.
    pub head: LocationState,
    /// Center torso.
    pub center_torso: LocationState,
    /// Left torso.
    pub left_torso: LocationState,
    /// Right torso.
    pub right_torso: LocationState,
    /// Left arm.
    pub left_arm: LocationState,
    /// Right arm.
    pub right_arm: LocationState,
    /// Left leg.
    pub left_leg: LocationState,
    /// Right leg.
    pub right_leg: LocationState,
}

impl MechArmor {
    /// Uniform armor layout scaled from tonnage: torso locations carry the
    /// most, head the least.
    #[must_use]
    pub const fn for_tonnage(tonnage: i32) -> Self {
        let base = tonnage / 10;
        Self {
            head: LocationState::new(3, 3),
            center_torso: LocationState::new(base * 2, base),
            left_torso: LocationState::new(base * 3 / 2, base),
            right_torso: LocationState::new(base * 3 / 2, base),
            left_arm: LocationState::new(base, base / 2 + 1),
            right_arm: LocationState::new(base, base / 2 + 1),
            left_leg: LocationState::new(base, base / 2 + 1),
            right_leg: LocationState::new(base, base / 2 + 1),
        }
    }

    /// Borrows the state at a location.
    #[must_use]
    pub const fn slot(&self, loc: MechLocation) -> &LocationState {
        match loc {
            MechLocation::Head => &self.head,
            MechLocation::CenterTorso => &self.center_torso,
            MechLocation::LeftTorso => &self.left_torso,
            MechLocation::RightTorso => &self.right_torso,
            MechLocation::LeftArm => &self.left_arm,
            MechLocation::RightArm => &self.right_arm,
            MechLocation::LeftLeg => &self.left_leg,
            MechLocation::RightLeg => &self.right_leg,
        }
    }

    /// Mutably borrows the state at a location.
    pub fn slot_mut(&mut self, loc: MechLocation) -> &mut LocationState {
        match loc {
            MechLocation::Head => &mut self.head,
            MechLocation::CenterTorso => &mut self.center_torso,
            MechLocation::LeftTorso => &mut self.left_torso,
            MechLocation::RightTorso => &mut self.right_torso,
            MechLocation::LeftArm => &mut self.left_arm,
            MechLocation::RightArm => &mut self.right_arm,
            MechLocation::LeftLeg => &mut self.left_leg,
            MechLocation::RightLeg => &mut self.right_leg,
        }
    }
}

/// Per-facing armor for a vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleArmor {
    /// Front armor.
    pub front: i32,
    /// Left side armor.
    pub left: i32,
    /// Right side armor.
    pub right: i32,
    /// Rear armor.
    pub rear: i32,
    /// Turret armor.
    pub turret: i32,
}

impl VehicleArmor {
    /// Uniform armor scaled from tonnage.
    #[must_use]
    pub const fn for_tonnage(tonnage: i32) -> Self {
        let base = tonnage / 5;
        Self {
            front: base,
            left: base * 3 / 4,
            right: base * 3 / 4,
            rear: base / 2,
            turret: base * 3 / 4,
        }
    }

    /// Borrows the armor pool for a facing.
    #[must_use]
    pub const fn facing(&self, facing: VehicleFacing) -> i32 {
        match facing {
            VehicleFacing::Front => self.front,
            VehicleFacing::Left => self.left,
            VehicleFacing::Right => self.right,
            VehicleFacing::Rear => self.rear,
            VehicleFacing::Turret => self.turret,
        }
    }

    /// Mutably borrows the armor pool for a facing.
    pub fn facing_mut(&mut self, facing: VehicleFacing) -> &mut i32 {
        match facing {
            VehicleFacing::Front => &mut self.front,
            VehicleFacing::Left => &mut self.left,
            VehicleFacing::Right => &mut self.right,
            VehicleFacing::Rear => &mut self.rear,
            VehicleFacing::Turret => &mut self.turret,
        }
    }
}

/// Infantry experience tier.
///
/// Infantry carry a single rating covering both marksmanship and nerve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Experience {
    /// Freshly raised.
    Green,
    /// Line troops.
    Regular,
    /// Blooded.
    Veteran,
    /// The best.
    Elite,
}

impl Experience {
    /// Base to-hit number for ranged fire and anti-mech attacks.
    #[must_use]
    pub const fn base_to_hit(self) -> i32 {
        match self {
            Self::Green => 7,
            Self::Regular => 6,
            Self::Veteran => 5,
            Self::Elite => 4,
        }
    }

    /// Morale/rally check target: pass on 2d6 at or above this number.
    #[must_use]
    pub const fn morale_target(self) -> i32 {
        match self {
            Self::Green => 8,
            Self::Regular => 7,
            Self::Veteran => 6,
            Self::Elite => 5,
        }
    }
}

/// Infantry doctrine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tactics {
    /// Conventional line infantry.
    #[default]
    Line,
    /// Guerrilla-trained; fights better from woods.
    Guerrilla,
}

/// Movement performed this turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveKind {
    /// Did not move.
    #[default]
    Halted,
    /// Walked.
    Walked,
    /// Ran.
    Ran,
    /// Jumped.
    Jumped,
}

impl MoveKind {
    /// To-hit penalty for attacking a unit that moved this way.
    #[must_use]
    pub const fn target_penalty(self) -> i32 {
        match self {
            Self::Halted => 0,
            Self::Walked => 1,
            Self::Ran => 2,
            Self::Jumped => 3,
        }
    }

    /// To-hit penalty for attacking after moving this way.
    #[must_use]
    pub const fn attacker_penalty(self) -> i32 {
        self.target_penalty()
    }
}

/// This turn's movement record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementState {
    /// How the unit moved.
    pub kind: MoveKind,
    /// Hexes covered.
    pub hexes_moved: i32,
}

/// Mech-specific components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechComponents {
    /// Tonnage (size class).
    pub tonnage: i32,
    /// Gunnery skill (lower is better).
    pub gunnery: i32,
    /// Piloting skill (lower is better).
    pub piloting: i32,
    /// Working jump jets.
    pub jump_jets: i32,
    /// Per-location armor and structure.
    pub armor: MechArmor,
    /// Current posture.
    pub posture: Posture,
}

impl MechComponents {
    /// A mech with tonnage-scaled armor and the given skills.
    #[must_use]
    pub const fn new(tonnage: i32, gunnery: i32, piloting: i32) -> Self {
        Self {
            tonnage,
            gunnery,
            piloting,
            jump_jets: 0,
            armor: MechArmor::for_tonnage(tonnage),
            posture: Posture::Standing,
        }
    }

    /// Adds jump jets.
    #[must_use]
    pub const fn with_jump_jets(mut self, jets: i32) -> Self {
        self.jump_jets = jets;
        self
    }
}

/// Infantry-specific components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfantryComponents {
    /// Remaining troopers.
    pub troopers: i32,
    /// Experience tier.
    pub experience: Experience,
    /// Doctrine.
    pub tactics: Tactics,
    /// Morale state.
    pub morale: Morale,
    /// Detachments and dislodges accumulate fatigue.
    pub fatigue: i32,
}

impl InfantryComponents {
    /// A platoon of the given strength and experience.
    #[must_use]
    pub const fn new(troopers: i32, experience: Experience) -> Self {
        Self {
            troopers,
            experience,
            tactics: Tactics::Line,
            morale: Morale::Steady,
            fatigue: 0,
        }
    }

    /// Sets guerrilla doctrine.
    #[must_use]
    pub const fn guerrilla(mut self) -> Self {
        self.tactics = Tactics::Guerrilla;
        self
    }
}

/// Vehicle-specific components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleComponents {
    /// Tonnage (size class).
    pub tonnage: i32,
    /// Gunnery skill (lower is better).
    pub gunnery: i32,
    /// Per-facing armor.
    pub armor: VehicleArmor,
    /// Shared internal structure pool.
    pub structure: i32,
    /// Whether the vehicle is an airborne VTOL.
    pub vtol: bool,
}

impl VehicleComponents {
    /// A ground vehicle with tonnage-scaled armor.
    #[must_use]
    pub const fn new(tonnage: i32, gunnery: i32) -> Self {
        Self {
            tonnage,
            gunnery,
            armor: VehicleArmor::for_tonnage(tonnage),
            structure: tonnage / 10 + 2,
            vtol: false,
        }
    }
}

/// Category-specific component storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitInner {
    /// Mech components.
    Mech(MechComponents),
    /// Infantry components.
    Infantry(InfantryComponents),
    /// Vehicle components.
    Vehicle(VehicleComponents),
}

impl UnitInner {
    /// Returns the matching category tag.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            Self::Mech(_) => UnitKind::Mech,
            Self::Infantry(_) => UnitKind::Infantry,
            Self::Vehicle(_) => UnitKind::Vehicle,
        }
    }
}

/// A combat unit.
///
/// Owned by the host's battlefield state; the engine borrows units for the
/// duration of one resolution call and never retains them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Team affiliation.
    pub team: Team,
    /// Display name.
    pub name: String,
    /// Current hex.
    pub pos: HexCoord,
    /// Movement performed this turn.
    pub movement: MovementState,
    /// Boolean status flags.
    pub flags: StatusFlags,
    /// Remaining stun duration in rounds.
    pub stunned_rounds: u8,
    /// Whether the unit has attacked this turn.
    pub acted: bool,
    /// Ordered equipment list.
    pub equipment: Vec<Equipment>,
    /// Category-specific components.
    pub inner: UnitInner,
}

impl Unit {
    /// Creates a unit at a position.
    #[must_use]
    pub fn new(id: UnitId, team: Team, name: &str, pos: HexCoord, inner: UnitInner) -> Self {
        Self {
            id,
            team,
            name: name.to_string(),
            pos,
            movement: MovementState::default(),
            flags: StatusFlags::default(),
            stunned_rounds: 0,
            acted: false,
            equipment: Vec::new(),
            inner,
        }
    }

    /// Returns the category tag.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.inner.kind()
    }

    /// Mech components, if this is a mech.
    #[must_use]
    pub const fn as_mech(&self) -> Option<&MechComponents> {
        match &self.inner {
            UnitInner::Mech(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable mech components, if this is a mech.
    pub fn as_mech_mut(&mut self) -> Option<&mut MechComponents> {
        match &mut self.inner {
            UnitInner::Mech(m) => Some(m),
            _ => None,
        }
    }

    /// Infantry components, if this is infantry.
    #[must_use]
    pub const fn as_infantry(&self) -> Option<&InfantryComponents> {
        match &self.inner {
            UnitInner::Infantry(i) => Some(i),
            _ => None,
        }
    }

    /// Mutable infantry components, if this is infantry.
    pub fn as_infantry_mut(&mut self) -> Option<&mut InfantryComponents> {
        match &mut self.inner {
            UnitInner::Infantry(i) => Some(i),
            _ => None,
        }
    }

    /// Vehicle components, if this is a vehicle.
    #[must_use]
    pub const fn as_vehicle(&self) -> Option<&VehicleComponents> {
        match &self.inner {
            UnitInner::Vehicle(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable vehicle components, if this is a vehicle.
    pub fn as_vehicle_mut(&mut self) -> Option<&mut VehicleComponents> {
        match &mut self.inner {
            UnitInner::Vehicle(v) => Some(v),
            _ => None,
        }
    }

    /// Tonnage for mechs and vehicles; infantry platoons count as 1 ton per
    /// trooper for size comparisons.
    #[must_use]
    pub const fn tonnage(&self) -> i32 {
        match &self.inner {
            UnitInner::Mech(m) => m.tonnage,
            UnitInner::Vehicle(v) => v.tonnage,
            UnitInner::Infantry(i) => i.troopers,
        }
    }

    /// Returns true until the unit is eliminated.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.flags.contains(StatusFlags::DESTROYED)
    }

    /// Returns true when the unit is prone.
    #[must_use]
    pub const fn is_prone(&self) -> bool {
        self.flags.contains(StatusFlags::PRONE)
    }

    /// Returns true if any equipment item carries the flag.
    #[must_use]
    pub fn has_equipment(&self, flag: EquipmentFlags) -> bool {
        self.equipment.iter().any(|e| e.flags.contains(flag))
    }

    /// Finds the first equipment item carrying the flag.
    #[must_use]
    pub fn find_equipment(&self, flag: EquipmentFlags) -> Option<(usize, &Equipment)> {
        self.equipment
            .iter()
            .enumerate()
            .find(|(_, e)| e.flags.contains(flag))
    }

    /// Finds the firing weapon for a ranged attack: the requested slot, or
    /// the first ranged item.
    #[must_use]
    pub fn ranged_weapon(&self, slot: Option<usize>) -> Option<(usize, &Equipment)> {
        match slot {
            Some(i) => self.equipment.get(i).filter(|e| e.is_ranged()).map(|e| (i, e)),
            None => self
                .equipment
                .iter()
                .enumerate()
                .find(|(_, e)| e.is_ranged()),
        }
    }

    /// Adds an equipment item, builder-style.
    #[must_use]
    pub fn with_equipment(mut self, item: Equipment) -> Self {
        self.equipment.push(item);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mech() -> Unit {
        Unit::new(
            UnitId::new(1),
            Team(0),
            "Hammer",
            HexCoord::new(0, 0),
            UnitInner::Mech(MechComponents::new(50, 4, 4).with_jump_jets(5)),
        )
    }

    mod unit_id_tests {
        use super::*;

        #[test]
        fn ordering_and_display() {
            assert!(UnitId::new(1) < UnitId::new(2));
            assert_eq!(format!("{}", UnitId::new(7)), "7");
            assert_eq!(format!("{:?}", UnitId::new(7)), "UnitId(7)");
        }
    }

    mod accessor_tests {
        use super::*;

        #[test]
        fn kind_matches_inner() {
            let mech = sample_mech();
            assert_eq!(mech.kind(), UnitKind::Mech);
            assert!(mech.as_mech().is_some());
            assert!(mech.as_infantry().is_none());
            assert!(mech.as_vehicle().is_none());
        }

        #[test]
        fn tonnage_by_category() {
            assert_eq!(sample_mech().tonnage(), 50);
            let platoon = Unit::new(
                UnitId::new(2),
                Team(1),
                "Rifles",
                HexCoord::new(1, 0),
                UnitInner::Infantry(InfantryComponents::new(21, Experience::Regular)),
            );
            assert_eq!(platoon.tonnage(), 21);
        }
    }

    mod armor_tests {
        use super::*;

        #[test]
        fn slot_round_trips() {
            let mut armor = MechArmor::for_tonnage(50);
            armor.slot_mut(MechLocation::Head).armor = 1;
            assert_eq!(armor.slot(MechLocation::Head).armor, 1);
        }

        #[test]
        fn torso_carries_most_armor() {
            let armor = MechArmor::for_tonnage(50);
            assert!(armor.center_torso.armor > armor.left_arm.armor);
            assert!(armor.center_torso.armor > armor.head.armor);
        }

        #[test]
        fn vehicle_facings_round_trip() {
            let mut armor = VehicleArmor::for_tonnage(40);
            *armor.facing_mut(VehicleFacing::Rear) = 2;
            assert_eq!(armor.facing(VehicleFacing::Rear), 2);
        }
    }

    mod equipment_tests {
        use super::*;

        #[test]
        fn flag_queries() {
            let unit = sample_mech().with_equipment(Equipment::vibro_blade("vibro axe"));
            assert!(unit.has_equipment(EquipmentFlags::VIBRO));
            assert!(!unit.has_equipment(EquipmentFlags::MINE));
        }

        #[test]
        fn ranged_weapon_selection() {
            let unit = sample_mech()
                .with_equipment(Equipment::gear("clamps", EquipmentFlags::MAGNETIC_CLAMP))
                .with_equipment(Equipment::weapon("rifle", 6));
            let (slot, weapon) = unit.ranged_weapon(None).unwrap();
            assert_eq!(slot, 1);
            assert_eq!(weapon.range, 6);
            assert!(unit.ranged_weapon(Some(0)).is_none());
        }
    }

    #[test]
    fn experience_tables_are_monotonic() {
        assert!(Experience::Green.base_to_hit() > Experience::Elite.base_to_hit());
        assert!(Experience::Green.morale_target() > Experience::Elite.morale_target());
    }

    #[test]
    fn serialization_roundtrip() {
        let unit = sample_mech();
        let json = serde_json::to_string(&unit).unwrap();
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, back);
    }
}
