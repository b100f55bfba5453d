//! Axial hex coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial hex-grid coordinate.
///
/// Distance is the standard axial metric: `(|dq| + |dr| + |dq + dr|) / 2`.
///
/// # Example
///
/// ```
/// use ironhex_core::hex::HexCoord;
///
/// let a = HexCoord::new(0, 0);
/// let b = HexCoord::new(2, -1);
/// assert_eq!(a.distance(b), 2);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    /// Axial q (column) coordinate.
    pub q: i32,
    /// Axial r (row) coordinate.
    pub r: i32,
}

impl HexCoord {
    /// Creates a coordinate from axial components.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Hex distance to another coordinate.
    #[must_use]
    pub const fn distance(self, other: Self) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// Steps one hex from `self` toward `toward`.
    ///
    /// Returns `self` unchanged when the two coordinates coincide. Used for
    /// knockback and for placing a Death-From-Above attacker next to its
    /// target.
    #[must_use]
    pub fn step_toward(self, toward: Self) -> Self {
        if self == toward {
            return self;
        }
        let dq = (toward.q - self.q).signum();
        let dr = (toward.r - self.r).signum();
        // Prefer the axis with the larger remaining delta so the step always
        // reduces distance by exactly one.
        let candidate_q = Self::new(self.q + dq, self.r);
        let candidate_r = Self::new(self.q, self.r + dr);
        let candidate_qr = Self::new(self.q + dq, self.r + dr);
        let mut best = candidate_q;
        for cand in [candidate_r, candidate_qr] {
            if cand.distance(toward) < best.distance(toward) {
                best = cand;
            }
        }
        best
    }

    /// Steps one hex directly away from `from`.
    #[must_use]
    pub fn step_away(self, from: Self) -> Self {
        if self == from {
            return Self::new(self.q + 1, self.r);
        }
        let dq = (self.q - from.q).signum();
        let dr = (self.r - from.r).signum();
        Self::new(self.q + dq, self.r + dr)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let a = HexCoord::new(3, -2);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(-2, 5);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn adjacent_hexes_are_distance_one() {
        let origin = HexCoord::new(0, 0);
        for (q, r) in [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)] {
            assert_eq!(origin.distance(HexCoord::new(q, r)), 1, "({q}, {r})");
        }
    }

    #[test]
    fn step_toward_reduces_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(4, -2);
        let stepped = a.step_toward(b);
        assert_eq!(stepped.distance(b), a.distance(b) - 1);
    }

    #[test]
    fn step_toward_self_is_identity() {
        let a = HexCoord::new(2, 2);
        assert_eq!(a.step_toward(a), a);
    }

    #[test]
    fn step_away_increases_distance() {
        let a = HexCoord::new(1, 1);
        let from = HexCoord::new(0, 0);
        let stepped = a.step_away(from);
        assert!(stepped.distance(from) > a.distance(from));
    }
}
