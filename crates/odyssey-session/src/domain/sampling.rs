//! Anti-repeat content selection.

use std::collections::BTreeSet;

use odyssey_core::content::{QuestionRow, ScenarioRow};
use odyssey_core::rng::DeterministicRng;

/// A content row identified by its key.
pub trait Keyed {
    /// Identity used for anti-repeat tracking.
    fn key(&self) -> &str;
}

impl Keyed for ScenarioRow {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for QuestionRow {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Draws one row whose key is not in `used`, uniformly at random.
///
/// Candidates are deduplicated by key (first occurrence wins) before the
/// draw, so every unused key is equally likely regardless of fetch order or
/// duplicate rows. Returns `None` when every key has been used.
pub fn draw_unused<'a, T: Keyed>(
    rows: &'a [T],
    used: &BTreeSet<String>,
    rng: &mut dyn DeterministicRng,
) -> Option<&'a T> {
    let mut seen = BTreeSet::new();
    let mut candidates: Vec<&T> = Vec::new();
    for row in rows {
        if !used.contains(row.key()) && seen.insert(row.key()) {
            candidates.push(row);
        }
    }

    if candidates.is_empty() {
        return None;
    }
    let index = rng.next_index(candidates.len());
    candidates.get(index).copied()
}
