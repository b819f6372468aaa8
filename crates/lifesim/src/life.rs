//! Generation advance for B3/S23 over a sparse live-cell set.
//!
//! Only positions with at least one live neighbour are ever materialised, so
//! the cost of a step is proportional to the population, not the board extent.

use std::collections::HashMap;

use crate::cell::CellKey;
use crate::{AgeMap, LiveCells};

/// Output of [`advance`]: the next live set and its ages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub live: LiveCells,
    pub ages: AgeMap,
    /// Cells in `live` that were dead in the input.
    pub births: usize,
}

impl Generation {
    /// Cells alive in both the input and the output.
    #[must_use]
    pub fn survivors(&self) -> usize {
        self.live.len() - self.births
    }
}

/// Next state under the standard rules.
///
/// Inputs are borrowed immutably and new containers are returned, so callers
/// can still compare against the previous generation afterwards. A survivor's
/// age is its old age plus one; a birth starts at zero.
#[must_use]
pub fn advance(live: &LiveCells, ages: &AgeMap) -> Generation {
    let mut counts: HashMap<CellKey, u8> = HashMap::with_capacity(live.len() * 8);
    for key in live {
        for n in key.neighbors() {
            *counts.entry(n).or_insert(0) += 1;
        }
    }

    let mut next = Generation {
        live: LiveCells::with_capacity(live.len()),
        ages: AgeMap::with_capacity(live.len()),
        births: 0,
    };
    for (key, count) in counts {
        let was_alive = live.contains(&key);
        if count == 3 || (count == 2 && was_alive) {
            let age = if was_alive {
                ages.get(&key).copied().unwrap_or(0).saturating_add(1)
            } else {
                next.births += 1;
                0
            };
            next.live.insert(key);
            next.ages.insert(key, age);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Position;
    use proptest::prelude::*;

    fn board(cells: &[(i32, i32)]) -> (LiveCells, AgeMap) {
        let live: LiveCells = cells.iter().map(|&(r, c)| CellKey::encode(r, c)).collect();
        let ages = live.iter().map(|&k| (k, 0)).collect();
        (live, ages)
    }

    fn sorted(live: &LiveCells) -> Vec<Position> {
        let mut v: Vec<Position> = live.iter().map(|k| k.decode()).collect();
        v.sort();
        v
    }

    #[test]
    fn empty_stays_empty() {
        let next = advance(&LiveCells::new(), &AgeMap::new());
        assert!(next.live.is_empty());
        assert!(next.ages.is_empty());
        assert_eq!(next.births, 0);
    }

    #[test]
    fn isolated_cell_dies() {
        let (live, ages) = board(&[(4, -9)]);
        let next = advance(&live, &ages);
        assert!(next.live.is_empty());
        assert!(next.ages.is_empty());
    }

    #[test]
    fn block_is_stable_and_ages() {
        let (live, mut ages) = board(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        ages.insert(CellKey::encode(1, 1), 7);
        let next = advance(&live, &ages);
        assert_eq!(next.live, live);
        assert_eq!(next.births, 0);
        assert_eq!(next.ages[&CellKey::encode(0, 0)], 1);
        assert_eq!(next.ages[&CellKey::encode(1, 1)], 8);
    }

    #[test]
    fn blinker_has_period_two_and_reborn_cells_start_at_zero() {
        let (live, ages) = board(&[(0, -1), (0, 0), (0, 1)]);
        let vertical = advance(&live, &ages);
        assert_eq!(
            sorted(&vertical.live),
            vec![Position::new(-1, 0), Position::new(0, 0), Position::new(1, 0)]
        );
        assert_eq!(vertical.births, 2);
        assert_eq!(vertical.survivors(), 1);

        let horizontal = advance(&vertical.live, &vertical.ages);
        assert_eq!(horizontal.live, live);
        assert_eq!(horizontal.ages[&CellKey::encode(0, 0)], 2);
        assert_eq!(horizontal.ages[&CellKey::encode(0, -1)], 0);
        assert_eq!(horizontal.ages[&CellKey::encode(0, 1)], 0);
    }

    #[test]
    fn glider_translates_diagonally() {
        let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
        let (mut live, mut ages) = board(&glider);
        for _ in 0..4 {
            let next = advance(&live, &ages);
            live = next.live;
            ages = next.ages;
        }
        let (expected, _) = board(&glider.map(|(r, c)| (r + 1, c + 1)));
        assert_eq!(live, expected);
    }

    #[test]
    fn works_across_the_origin_and_far_away() {
        for (r0, c0) in [(-1, -1), (1_000_000, -2_000_000)] {
            let (live, ages) = board(&[(r0, c0), (r0, c0 + 1), (r0 + 1, c0), (r0 + 1, c0 + 1)]);
            assert_eq!(advance(&live, &ages).live, live);
        }
    }

    #[test]
    fn inputs_are_untouched() {
        let (live, ages) = board(&[(0, 0), (0, 1), (0, 2), (5, 5)]);
        let (live_before, ages_before) = (live.clone(), ages.clone());
        let _ = advance(&live, &ages);
        assert_eq!(live, live_before);
        assert_eq!(ages, ages_before);
    }

    fn arb_soup() -> impl Strategy<Value = Vec<(i32, i32)>> {
        proptest::collection::vec((-12i32..12, -12i32..12), 0..120)
    }

    proptest! {
        #[test]
        fn prop_advance_is_deterministic(cells in arb_soup()) {
            let (live, ages) = board(&cells);
            prop_assert_eq!(advance(&live, &ages), advance(&live, &ages));
        }

        #[test]
        fn prop_age_keys_match_live_set(cells in arb_soup()) {
            let (live, ages) = board(&cells);
            let next = advance(&live, &ages);
            prop_assert_eq!(next.live.len(), next.ages.len());
            for key in &next.live {
                let age = next.ages[key];
                if live.contains(key) {
                    prop_assert_eq!(age, 1);
                } else {
                    prop_assert_eq!(age, 0);
                }
            }
        }

        #[test]
        fn prop_births_only_next_to_live_cells(cells in arb_soup()) {
            let (live, ages) = board(&cells);
            let next = advance(&live, &ages);
            for key in &next.live {
                let touched = key.neighbors().iter().any(|n| live.contains(n));
                prop_assert!(touched);
            }
        }
    }
}
