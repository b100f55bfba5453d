//! Die-rolling sources.
//!
//! The [`Roll`] trait is the single entropy seam for the engine: resolution
//! code takes `&mut dyn Roll` and never touches an RNG directly. Production
//! callers hand in a [`SeededRoller`]; tests hand in a [`ScriptedRoller`]
//! with forced results.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use tracing::trace;

/// Source of individual die results.
///
/// Implementors provide [`Roll::die`]; the sum/percentile helpers are
/// derived from it so a scripted source controls every derived roll too.
///
/// # Example
///
/// ```
/// use dicecup::{Roll, ScriptedRoller};
///
/// let mut roller = ScriptedRoller::new([4, 6]);
/// assert_eq!(roller.two_d6(), 10);
/// ```
pub trait Roll {
    /// Rolls a single die with the given number of sides, returning a value
    /// in `1..=sides`.
    fn die(&mut self, sides: u32) -> i32;

    /// Rolls `count` dice with the given number of sides and sums them.
    fn sum(&mut self, count: u32, sides: u32) -> i32 {
        (0..count).map(|_| self.die(sides)).sum()
    }

    /// Rolls the standard two six-sided dice (2..=12).
    fn two_d6(&mut self) -> i32 {
        self.sum(2, 6)
    }

    /// Rolls a percentile die (1..=100).
    fn percentile(&mut self) -> i32 {
        self.die(100)
    }

    /// Returns true with the given percent chance.
    ///
    /// `chance(0)` is always false; `chance(100)` is always true. The
    /// percentile die is consumed either way so roll sequences stay aligned
    /// across replays.
    fn chance(&mut self, pct: i32) -> bool {
        self.percentile() <= pct
    }
}

/// Seeded, deterministic die source backed by ChaCha8.
///
/// Same seed, same sequence, on every platform. This is the production
/// roller; hosts that want replayable battles persist the seed.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: ChaCha8Rng,
}

impl SeededRoller {
    /// Creates a roller from a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a roller seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Roll for SeededRoller {
    fn die(&mut self, sides: u32) -> i32 {
        let sides = sides.max(1);
        #[allow(clippy::cast_possible_wrap)]
        let result = self.rng.gen_range(1..=sides) as i32;
        trace!(sides, result, "die");
        result
    }
}

/// Die source that replays a fixed script of results.
///
/// Intended for tests that pin exact outcomes ("a forced roll of 8").
/// When the script runs dry it falls back to the die's midpoint,
/// `(sides + 1) / 2`, so an under-scripted test degrades to average rolls
/// instead of panicking.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    script: VecDeque<i32>,
}

impl ScriptedRoller {
    /// Creates a scripted roller from a sequence of forced die results.
    ///
    /// Note that the script is consumed per *die*, not per sum: forcing a
    /// 2d6 roll of 10 takes two entries, e.g. `[4, 6]`.
    pub fn new<I: IntoIterator<Item = i32>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Appends further forced results to the script.
    pub fn push<I: IntoIterator<Item = i32>>(&mut self, more: I) {
        self.script.extend(more);
    }

    /// Returns how many forced results remain unconsumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Roll for ScriptedRoller {
    fn die(&mut self, sides: u32) -> i32 {
        let sides = sides.max(1);
        #[allow(clippy::cast_possible_wrap)]
        let midpoint = ((sides + 1) / 2) as i32;
        self.script.pop_front().unwrap_or(midpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod seeded_tests {
        use super::*;

        #[test]
        fn same_seed_same_sequence() {
            let mut a = SeededRoller::from_seed(7);
            let mut b = SeededRoller::from_seed(7);
            for _ in 0..100 {
                assert_eq!(a.two_d6(), b.two_d6());
            }
        }

        #[test]
        fn different_seeds_diverge() {
            let mut a = SeededRoller::from_seed(1);
            let mut b = SeededRoller::from_seed(2);
            let rolls_a: Vec<i32> = (0..20).map(|_| a.die(6)).collect();
            let rolls_b: Vec<i32> = (0..20).map(|_| b.die(6)).collect();
            assert_ne!(rolls_a, rolls_b);
        }

        #[test]
        fn die_stays_in_range() {
            let mut roller = SeededRoller::from_seed(99);
            for _ in 0..1000 {
                let d = roller.die(6);
                assert!((1..=6).contains(&d));
            }
        }

        #[test]
        fn two_d6_stays_in_range() {
            let mut roller = SeededRoller::from_seed(99);
            for _ in 0..1000 {
                let r = roller.two_d6();
                assert!((2..=12).contains(&r));
            }
        }

        #[test]
        fn percentile_stays_in_range() {
            let mut roller = SeededRoller::from_seed(3);
            for _ in 0..1000 {
                let p = roller.percentile();
                assert!((1..=100).contains(&p));
            }
        }
    }

    mod scripted_tests {
        use super::*;

        #[test]
        fn replays_script_in_order() {
            let mut roller = ScriptedRoller::new([1, 2, 3]);
            assert_eq!(roller.die(6), 1);
            assert_eq!(roller.die(6), 2);
            assert_eq!(roller.die(6), 3);
        }

        #[test]
        fn falls_back_to_midpoint_when_exhausted() {
            let mut roller = ScriptedRoller::new([6]);
            assert_eq!(roller.die(6), 6);
            assert_eq!(roller.die(6), 3); // (6 + 1) / 2
            assert_eq!(roller.die(100), 50);
        }

        #[test]
        fn forced_two_d6() {
            let mut roller = ScriptedRoller::new([4, 6]);
            assert_eq!(roller.two_d6(), 10);
        }

        #[test]
        fn chance_consumes_percentile() {
            let mut roller = ScriptedRoller::new([40, 41]);
            assert!(roller.chance(40));
            assert!(!roller.chance(40));
        }

        #[test]
        fn remaining_counts_down() {
            let mut roller = ScriptedRoller::new([1, 2]);
            assert_eq!(roller.remaining(), 2);
            roller.die(6);
            assert_eq!(roller.remaining(), 1);
        }
    }
}
