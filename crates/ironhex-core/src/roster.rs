//! Roster: the unit collection and swarm ledger the engine operates on.
//!
//! The roster is owned by the host's game-state container; the engine
//! borrows it per call. `BTreeMap` storage keeps iteration deterministic.

use crate::error::{EngineError, RuleViolation};
use crate::unit::{MechLocation, SwarmAttachment, Unit, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Units and swarm attachments for one battlefield.
///
/// The swarm ledger is keyed by infantry id, so at most one live attachment
/// per infantry unit holds by construction.
///
/// # Example
///
/// ```
/// use ironhex_core::roster::Roster;
/// use ironhex_core::unit::*;
/// use ironhex_core::hex::HexCoord;
///
/// let mut roster = Roster::new();
/// let id = roster.insert(Unit::new(
///     UnitId::new(1),
///     Team(0),
///     "Hammer",
///     HexCoord::new(0, 0),
///     UnitInner::Mech(MechComponents::new(50, 4, 4)),
/// ));
/// assert!(roster.unit(id).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    units: BTreeMap<UnitId, Unit>,
    swarms: BTreeMap<UnitId, SwarmAttachment>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a unit, returning its id.
    pub fn insert(&mut self, unit: Unit) -> UnitId {
        let id = unit.id;
        self.units.insert(id, unit);
        id
    }

    /// Borrows a unit, reporting a not-found failure when absent.
    pub fn unit(&self, id: UnitId) -> Result<&Unit, EngineError> {
        self.units.get(&id).ok_or(EngineError::UnitNotFound(id))
    }

    /// Mutably borrows a unit, reporting a not-found failure when absent.
    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit, EngineError> {
        self.units.get_mut(&id).ok_or(EngineError::UnitNotFound(id))
    }

    /// Iterates over all units in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Number of units on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true when the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the attachment an infantry unit currently holds, if any.
    #[must_use]
    pub fn attachment(&self, infantry: UnitId) -> Option<SwarmAttachment> {
        self.swarms.get(&infantry).copied()
    }

    /// Returns the infantry units attached to a mech, in id order.
    #[must_use]
    pub fn swarmers_of(&self, mech: UnitId) -> Vec<UnitId> {
        self.swarms
            .iter()
            .filter(|(_, a)| a.mech == mech)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Records a swarm attachment.
    ///
    /// Rejects attaching while the infantry unit already holds a different
    /// attachment; re-attaching to the same mech updates the location.
    pub fn attach(
        &mut self,
        infantry: UnitId,
        mech: UnitId,
        location: MechLocation,
    ) -> Result<(), EngineError> {
        if let Some(existing) = self.swarms.get(&infantry) {
            if existing.mech != mech {
                return Err(RuleViolation::AlreadySwarming.into());
            }
        }
        self.swarms
            .insert(infantry, SwarmAttachment { mech, location });
        Ok(())
    }

    /// Clears an infantry unit's attachment and increments its fatigue.
    ///
    /// Detaching while unattached is a no-op.
    pub fn detach(&mut self, infantry: UnitId) {
        if self.swarms.remove(&infantry).is_some() {
            if let Some(platoon) = self
                .units
                .get_mut(&infantry)
                .and_then(Unit::as_infantry_mut)
            {
                platoon.fatigue += 1;
            }
        }
    }

    /// Clears every attachment referencing a destroyed mech.
    pub fn detach_all_from(&mut self, mech: UnitId) {
        let riders: Vec<UnitId> = self.swarmers_of(mech);
        for rider in riders {
            self.detach(rider);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;
    use crate::unit::{Experience, InfantryComponents, MechComponents, Team, UnitInner};

    fn roster_with_pair() -> (Roster, UnitId, UnitId) {
        let mut roster = Roster::new();
        let mech = roster.insert(Unit::new(
            UnitId::new(1),
            Team(0),
            "Hammer",
            HexCoord::new(0, 0),
            UnitInner::Mech(MechComponents::new(50, 4, 4)),
        ));
        let platoon = roster.insert(Unit::new(
            UnitId::new(2),
            Team(1),
            "Rifles",
            HexCoord::new(0, 0),
            UnitInner::Infantry(InfantryComponents::new(20, Experience::Regular)),
        ));
        (roster, mech, platoon)
    }

    #[test]
    fn missing_unit_is_not_found() {
        let roster = Roster::new();
        assert_eq!(
            roster.unit(UnitId::new(9)).unwrap_err(),
            EngineError::UnitNotFound(UnitId::new(9))
        );
    }

    #[test]
    fn attach_detach_round_trip() {
        let (mut roster, mech, platoon) = roster_with_pair();
        roster
            .attach(platoon, mech, MechLocation::CenterTorso)
            .unwrap();
        assert_eq!(
            roster.attachment(platoon).unwrap().location,
            MechLocation::CenterTorso
        );
        assert_eq!(roster.swarmers_of(mech), vec![platoon]);

        roster.detach(platoon);
        assert!(roster.attachment(platoon).is_none());
        assert_eq!(roster.unit(platoon).unwrap().as_infantry().unwrap().fatigue, 1);
    }

    #[test]
    fn second_attachment_to_other_mech_rejected() {
        let (mut roster, mech, platoon) = roster_with_pair();
        let other = roster.insert(Unit::new(
            UnitId::new(3),
            Team(0),
            "Anvil",
            HexCoord::new(1, 0),
            UnitInner::Mech(MechComponents::new(60, 4, 5)),
        ));
        roster.attach(platoon, mech, MechLocation::Head).unwrap();
        let err = roster
            .attach(platoon, other, MechLocation::Head)
            .unwrap_err();
        assert_eq!(err, EngineError::Illegal(RuleViolation::AlreadySwarming));
    }

    #[test]
    fn reattach_same_mech_moves_location() {
        let (mut roster, mech, platoon) = roster_with_pair();
        roster.attach(platoon, mech, MechLocation::Head).unwrap();
        roster
            .attach(platoon, mech, MechLocation::LeftTorso)
            .unwrap();
        assert_eq!(
            roster.attachment(platoon).unwrap().location,
            MechLocation::LeftTorso
        );
    }

    #[test]
    fn detach_all_from_clears_riders() {
        let (mut roster, mech, platoon) = roster_with_pair();
        roster.attach(platoon, mech, MechLocation::Head).unwrap();
        roster.detach_all_from(mech);
        assert!(roster.attachment(platoon).is_none());
    }

    #[test]
    fn detach_unattached_is_noop() {
        let (mut roster, _, platoon) = roster_with_pair();
        roster.detach(platoon);
        assert_eq!(roster.unit(platoon).unwrap().as_infantry().unwrap().fatigue, 0);
    }
}
