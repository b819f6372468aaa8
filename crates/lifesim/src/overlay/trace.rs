//! Every cell that has ever been alive since the last reset.

use std::collections::HashSet;

use crate::cell::CellKey;
use crate::LiveCells;

#[derive(Debug, Clone, Default)]
pub struct TraceField {
    visited: HashSet<CellKey>,
}

impl TraceField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generation(&mut self, live: &LiveCells) {
        self.visited.extend(live.iter().copied());
    }

    #[must_use]
    pub fn contains(&self, key: CellKey) -> bool {
        self.visited.contains(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }
}
