//! Equipment carried by units.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Capability flags carried on an equipment item.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EquipmentFlags: u16 {
        /// Effective against mechs (enables anti-mech attacks, adds swarm
        /// damage).
        const ANTI_MECH = 1 << 0;
        /// Effective against infantry (boosts the fire damage pool).
        const ANTI_INFANTRY = 1 << 1;
        /// Consumed by a single use.
        const ONE_SHOT = 1 << 2;
        /// Bladed melee weapon; applies its damage multiplier.
        const BLADED = 1 << 3;
        /// Vibro blade; enables precision strikes.
        const VIBRO = 1 << 4;
        /// Magnetic clamps; required to swarm heavy mechs.
        const MAGNETIC_CLAMP = 1 << 5;
        /// Demolition mine; enables mine placement.
        const MINE = 1 << 6;
        /// Advanced targeting system; -1 to hit.
        const TARGETING = 1 << 7;
    }
}

/// One item in a unit's ordered equipment list.
///
/// # Example
///
/// ```
/// use ironhex_core::unit::{Equipment, EquipmentFlags};
///
/// let rifle = Equipment::weapon("auto rifle", 6);
/// assert_eq!(rifle.range, 6);
/// assert!(!rifle.flags.contains(EquipmentFlags::ONE_SHOT));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Display name.
    pub name: String,
    /// Capability flags.
    pub flags: EquipmentFlags,
    /// Maximum range in hexes (0 for non-ranged gear).
    pub range: i32,
    /// Damage multiplier as an integer percentage (100 = x1).
    pub damage_mult_pct: i32,
}

impl Equipment {
    /// A ranged weapon with no special flags.
    #[must_use]
    pub fn weapon(name: &str, range: i32) -> Self {
        Self {
            name: name.to_string(),
            flags: EquipmentFlags::empty(),
            range,
            damage_mult_pct: 100,
        }
    }

    /// A piece of non-ranged gear with the given flags.
    #[must_use]
    pub fn gear(name: &str, flags: EquipmentFlags) -> Self {
        Self {
            name: name.to_string(),
            flags,
            range: 0,
            damage_mult_pct: 100,
        }
    }

    /// A vibro blade: bladed, precision-capable, double damage.
    #[must_use]
    pub fn vibro_blade(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: EquipmentFlags::BLADED | EquipmentFlags::VIBRO,
            range: 0,
            damage_mult_pct: 200,
        }
    }

    /// A single-use demolition mine.
    #[must_use]
    pub fn mine(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: EquipmentFlags::MINE | EquipmentFlags::ONE_SHOT,
            range: 0,
            damage_mult_pct: 100,
        }
    }

    /// Returns true if the item can be fired at range.
    #[must_use]
    pub const fn is_ranged(&self) -> bool {
        self.range > 0
    }
}
