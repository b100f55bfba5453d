//! # Ironhex Core
//!
//! Hex-grid tactical combat resolution engine.
//!
//! This crate turns an attack request plus battlefield context into a
//! deterministic, auditable outcome: modifier-stacked to-hit numbers,
//! randomized resolution through an injectable dice source, location-based
//! damage, critical effects, and status transitions (prone, entrenched,
//! swarming, suppressed, broken morale).
//!
//! ## Architecture
//!
//! The pipeline is validate → to-hit → roll → damage/critical → apply.
//! Resolution is split from mutation so outcomes can be previewed:
//!
//! - [`engine::validate_attack`]: legality without side effects
//! - [`engine::calculate_to_hit`]: the clamped target number + audit trail
//! - [`engine::execute_attack`]: a resolved [`outcome::AttackOutcome`],
//!   no mutation
//! - [`engine::apply_outcome`]: commits the outcome, exactly once
//!
//! Each attack family (melee, infantry fire, anti-mech, jump/DFA) is a thin
//! policy layer selecting modifier sets, damage formulas, and location
//! tables over this shared pipeline.
//!
//! ## Usage
//!
//! ```
//! use dicecup::SeededRoller;
//! use ironhex_core::attack::{AttackKind, AttackRequest, MeleeKind};
//! use ironhex_core::battlefield::{BattleContext, FlatMap};
//! use ironhex_core::engine;
//! use ironhex_core::hex::HexCoord;
//! use ironhex_core::roster::Roster;
//! use ironhex_core::unit::*;
//!
//! let mut roster = Roster::new();
//! let attacker = roster.insert(Unit::new(
//!     UnitId::new(1), Team(0), "Hammer", HexCoord::new(0, 0),
//!     UnitInner::Mech(MechComponents::new(50, 4, 4)),
//! ));
//! let target = roster.insert(Unit::new(
//!     UnitId::new(2), Team(1), "Anvil", HexCoord::new(1, 0),
//!     UnitInner::Mech(MechComponents::new(60, 4, 5)),
//! ));
//!
//! let map = FlatMap::new(20, 20);
//! let ctx = BattleContext::clear_day();
//! let request = AttackRequest::new(attacker, target, AttackKind::Melee(MeleeKind::Strike));
//! let mut roller = SeededRoller::from_seed(42);
//!
//! let mut outcome = engine::execute_attack(&roster, &map, &ctx, &request, &mut roller).unwrap();
//! engine::apply_outcome(&mut roster, &mut outcome).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod apply;
pub mod attack;
pub mod battlefield;
pub mod engine;
pub mod error;
pub mod hex;
pub mod modifier;
pub mod outcome;
pub mod resolve;
pub mod roster;
pub mod tables;
pub mod tohit;
pub mod unit;
pub mod validate;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use attack::{AttackKind, AttackRequest};
pub use battlefield::{BattleContext, MapView};
pub use engine::{apply_outcome, calculate_to_hit, execute_attack, validate_attack};
pub use error::{EngineError, RuleViolation};
pub use outcome::{ApplyResult, AttackOutcome, ToHitResult};
pub use roster::Roster;
pub use unit::{Unit, UnitId};
