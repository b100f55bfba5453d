//! Scenario, property, and determinism tests for the engine.
//!
//! - `helpers.rs`: factory functions for units and battlefields
//! - `scenarios.rs`: end-to-end pinned-number scenarios
//! - `properties.rs`: proptest invariants (clamps, monotonic troopers)
//! - `determinism.rs`: same seed + same requests → identical outcomes

mod helpers;

pub use helpers::*;
