//! Unbounded Game of Life engine.

pub mod brush;
pub mod cell;
pub mod clock;
pub mod config;
pub mod error;
pub mod life;
pub mod overlay;
pub mod palette;
pub mod pattern;
pub mod universe;
pub mod viewport;

use std::collections::{HashMap, HashSet};

use brush::BrushMode;
use cell::{Bounds, CellKey, Position};
use life::Generation;

pub use error::{LifeError, Result};
pub use universe::Universe;

/// Keys of every live cell.
pub type LiveCells = HashSet<CellKey>;
/// Generations survived by each live cell.
pub type AgeMap = HashMap<CellKey, u32>;

/// Authoritative simulation state: the live set and its ages, always replaced together.
///
/// Every public method leaves `ages.keys() == live`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    live: LiveCells,
    ages: AgeMap,
}

/// Population change produced by one [`Board::tick`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TickStats {
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from possibly inconsistent parts: ages of dead cells are
    /// dropped and live cells without an age start at zero.
    #[must_use]
    pub fn from_parts(live: LiveCells, mut ages: AgeMap) -> Self {
        ages.retain(|k, _| live.contains(k));
        for &key in &live {
            ages.entry(key).or_insert(0);
        }
        Self { live, ages }
    }

    /// Fresh board with every given position alive at age zero.
    #[must_use]
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        let live: LiveCells = positions.into_iter().map(Position::key).collect();
        let ages = live.iter().map(|&k| (k, 0)).collect();
        Self { live, ages }
    }

    #[must_use]
    pub fn live(&self) -> &LiveCells {
        &self.live
    }

    #[must_use]
    pub fn ages(&self) -> &AgeMap {
        &self.ages
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn is_alive(&self, p: Position) -> bool {
        self.live.contains(&p.key())
    }

    #[must_use]
    pub fn age(&self, p: Position) -> Option<u32> {
        self.ages.get(&p.key()).copied()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.live.iter().map(|k| k.decode())
    }

    /// Bounding rectangle of the live cells, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.positions())
    }

    /// Sets one cell. Painting an already-live cell keeps its age.
    /// Returns whether the cell changed state.
    pub fn set(&mut self, p: Position, mode: BrushMode) -> bool {
        let key = p.key();
        match mode {
            BrushMode::Alive => {
                if self.live.insert(key) {
                    self.ages.insert(key, 0);
                    true
                } else {
                    false
                }
            }
            BrushMode::Dead => {
                self.ages.remove(&key);
                self.live.remove(&key)
            }
        }
    }

    /// Applies `mode` to every position, returning how many cells changed.
    pub fn paint<I: IntoIterator<Item = Position>>(
        &mut self,
        positions: I,
        mode: BrushMode,
    ) -> usize {
        positions.into_iter().filter(|&p| self.set(p, mode)).count()
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.ages.clear();
    }

    /// Advance one generation, replacing both containers at once.
    pub fn tick(&mut self) -> TickStats {
        let next = life::advance(&self.live, &self.ages);
        let stats = TickStats {
            population: next.live.len(),
            births: next.births,
            deaths: self.live.len() - next.survivors(),
        };
        self.commit(next);
        stats
    }

    /// Installs a generation computed elsewhere, e.g. off the main thread.
    pub fn commit(&mut self, next: Generation) {
        debug_assert_eq!(next.live.len(), next.ages.len());
        self.live = next.live;
        self.ages = next.ages;
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.live.len() == self.ages.len() && self.ages.keys().all(|k| self.live.contains(k))
    }
}
