//! Keyed roll tables with a defined out-of-range default.
//!
//! Modifier math can push effective rolls outside the nominal 2–12 band, so
//! every table carries a default result rather than panicking or returning
//! an option the caller would have to invent a policy for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping from die-roll values to results, with a default for rolls
/// outside the keyed range.
///
/// Rows are held in a `BTreeMap` so iteration (and serialization) order is
/// deterministic.
///
/// # Example
///
/// ```
/// use dicecup::RollTable;
///
/// let table = RollTable::new("odd-even", [(1, "odd"), (2, "even")], "even");
/// assert_eq!(*table.lookup(1), "odd");
/// assert_eq!(*table.lookup(7), "even"); // out of range -> default
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollTable<T> {
    name: String,
    rows: BTreeMap<i32, T>,
    default: T,
}

impl<T> RollTable<T> {
    /// Builds a table from `(roll, result)` rows and a default result.
    pub fn new<I>(name: &str, rows: I, default: T) -> Self
    where
        I: IntoIterator<Item = (i32, T)>,
    {
        Self {
            name: name.to_string(),
            rows: rows.into_iter().collect(),
            default,
        }
    }

    /// Looks up the result for a roll, falling back to the default for
    /// rolls with no keyed row.
    #[must_use]
    pub fn lookup(&self, roll: i32) -> &T {
        self.rows.get(&roll).unwrap_or(&self.default)
    }

    /// Returns the table's name (used in trace output and messages).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of keyed rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no keyed rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
