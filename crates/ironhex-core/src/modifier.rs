//! Modifier accumulation for to-hit math.
//!
//! Every to-hit calculation records its situational adjustments as labeled
//! `(label, delta)` pairs in declaration order, then folds them into one
//! total. Order matters only for audit readability; the sum is commutative.
//! When several bonuses could apply they all stack; there is no
//! "best-applies" rule, and downstream damage/critical thresholds rely on
//! that.

use crate::outcome::ToHitResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lower clamp for a final target number.
pub const TARGET_NUMBER_MIN: i32 = 2;
/// Upper clamp for a final target number.
pub const TARGET_NUMBER_MAX: i32 = 12;

/// One labeled to-hit adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// What the adjustment is for.
    pub label: String,
    /// Signed delta.
    pub delta: i32,
}

impl Modifier {
    /// Creates a labeled modifier.
    #[must_use]
    pub fn new(label: &str, delta: i32) -> Self {
        Self {
            label: label.to_string(),
            delta,
        }
    }
}

/// Ordered accumulator for to-hit modifiers.
///
/// # Example
///
/// ```
/// use ironhex_core::modifier::ModifierStack;
///
/// let mut stack = ModifierStack::new(9);
/// stack.add("target ran", 2);
/// stack.add("night", 2);
/// let result = stack.finish();
/// assert_eq!(result.target_number, 12); // 13 clamped to the 2..=12 band
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierStack {
    base: i32,
    entries: Vec<Modifier>,
}

impl ModifierStack {
    /// Starts a stack from a family's base value.
    #[must_use]
    pub const fn new(base: i32) -> Self {
        Self {
            base,
            entries: Vec::new(),
        }
    }

    /// Records a modifier, skipping zero deltas to keep the audit trail
    /// readable.
    pub fn add(&mut self, label: &str, delta: i32) {
        if delta != 0 {
            self.entries.push(Modifier::new(label, delta));
        }
    }

    /// Records a modifier even when its delta is zero.
    ///
    /// Used where the breakdown should show that a rule was consulted and
    /// contributed nothing (the jump-distance row of a Death From Above).
    pub fn add_always(&mut self, label: &str, delta: i32) {
        self.entries.push(Modifier::new(label, delta));
    }

    /// The base value the stack started from.
    #[must_use]
    pub const fn base(&self) -> i32 {
        self.base
    }

    /// Sum of all recorded deltas.
    #[must_use]
    pub fn modifier_total(&self) -> i32 {
        self.entries.iter().map(|m| m.delta).sum()
    }

    /// Unclamped base + modifiers.
    #[must_use]
    pub fn raw_total(&self) -> i32 {
        self.base + self.modifier_total()
    }

    /// Folds the stack into a [`ToHitResult`] with the target number
    /// clamped to [2, 12].
    #[must_use]
    pub fn finish(self) -> ToHitResult {
        let modifier_total = self.modifier_total();
        let target_number = (self.base + modifier_total)
            .clamp(TARGET_NUMBER_MIN, TARGET_NUMBER_MAX);
        debug!(
            base = self.base,
            modifier_total, target_number, "to-hit computed"
        );
        ToHitResult {
            base: self.base,
            modifiers: self.entries,
            modifier_total,
            target_number,
        }
    }
}
