//! Cluster-hits math.
//!
//! Volley-style attacks (massed infantry fire) land a fraction of their base
//! count determined by a 2d6 roll against a fixed fraction table. The table
//! is the rules constant; both the pure lookup and the rolling wrapper live
//! here so tests can pin exact rows.

use crate::roll::Roll;
use tracing::trace;

/// The fixed roll→percent rows of the cluster table.
///
/// Index 0 corresponds to a roll of 2; index 10 to a roll of 12.
pub const CLUSTER_PERCENT_ROWS: [i32; 11] = [0, 17, 33, 50, 67, 83, 100, 117, 133, 150, 167];

fn cluster_percent(roll: i32) -> i32 {
    match roll {
        i32::MIN..=2 => CLUSTER_PERCENT_ROWS[0],
        3..=12 => CLUSTER_PERCENT_ROWS[(roll - 2) as usize],
        _ => CLUSTER_PERCENT_ROWS[10],
    }
}

/// Computes cluster hits for a base count and a fixed 2d6 roll.
///
/// The base count is scaled by the rolled percentage, rounded half-up, and
/// floored at 1 whenever the base count is positive. A base of zero always
/// yields zero.
///
/// # Example
///
/// ```
/// use dicecup::cluster_hits;
///
/// assert_eq!(cluster_hits(10, 8), 10);  // 100% row
/// assert_eq!(cluster_hits(10, 12), 17); // 167% row
/// assert_eq!(cluster_hits(10, 2), 1);   // 0% row still floors at 1
/// assert_eq!(cluster_hits(0, 8), 0);
/// ```
#[must_use]
pub fn cluster_hits(base: i32, roll: i32) -> i32 {
    if base <= 0 {
        return 0;
    }
    let pct = cluster_percent(roll);
    let scaled = (base * pct + 50) / 100; // round half-up
    scaled.max(1)
}

/// Rolls 2d6 and computes cluster hits for the base count.
pub fn roll_cluster(roller: &mut dyn Roll, base: i32) -> i32 {
    if base <= 0 {
        return 0;
    }
    let roll = roller.two_d6();
    let hits = cluster_hits(base, roll);
    trace!(base, roll, hits, "cluster");
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::ScriptedRoller;
    use proptest::prelude::*;

    #[test]
    fn hundred_percent_row_returns_base() {
        assert_eq!(cluster_hits(10, 8), 10);
        assert_eq!(cluster_hits(7, 8), 7);
        assert_eq!(cluster_hits(1, 8), 1);
    }

    #[test]
    fn every_row_matches_table() {
        // base 100 makes the percent rows read off directly
        let expected = [0, 17, 33, 50, 67, 83, 100, 117, 133, 150, 167];
        for (i, pct) in expected.iter().enumerate() {
            let roll = i as i32 + 2;
            let want = if *pct == 0 { 1 } else { *pct };
            assert_eq!(cluster_hits(100, roll), want, "roll {roll}");
        }
    }

    #[test]
    fn rounds_half_up() {
        // 3 * 17% = 0.51 -> 1; 3 * 50% = 1.5 -> 2
        assert_eq!(cluster_hits(3, 3), 1);
        assert_eq!(cluster_hits(3, 5), 2);
    }

    #[test]
    fn floors_at_one_for_positive_base() {
        assert_eq!(cluster_hits(1, 2), 1);
        assert_eq!(cluster_hits(2, 2), 1);
    }

    #[test]
    fn zero_base_is_zero() {
        for roll in 2..=12 {
            assert_eq!(cluster_hits(0, roll), 0);
        }
    }

    #[test]
    fn out_of_range_rolls_clamp_to_edge_rows() {
        assert_eq!(cluster_hits(10, 1), cluster_hits(10, 2));
        assert_eq!(cluster_hits(10, 13), cluster_hits(10, 12));
    }

    #[test]
    fn roll_cluster_consumes_two_dice() {
        let mut roller = ScriptedRoller::new([4, 4]);
        assert_eq!(roll_cluster(&mut roller, 10), 10);
        assert_eq!(roller.remaining(), 0);
    }

    #[test]
    fn roll_cluster_zero_base_rolls_nothing() {
        let mut roller = ScriptedRoller::new([6, 6]);
        assert_eq!(roll_cluster(&mut roller, 0), 0);
        assert_eq!(roller.remaining(), 2);
    }

    proptest! {
        #[test]
        fn bounds_hold(base in 1..200i32, roll in -3..18i32) {
            let hits = cluster_hits(base, roll);
            prop_assert!(hits >= 1);
            // table ceiling: 167%, rounded half-up
            prop_assert!(hits <= (base * 167 + 50) / 100);
        }
    }
}
