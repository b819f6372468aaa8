//! Per-cell opacity easing toward alive (1) or dead (0).

use std::collections::HashMap;

use crate::cell::CellKey;

/// Opacity per cell. Entries that fade out completely are dropped, so the map
/// only holds recently changed or currently visible live cells.
#[derive(Debug, Clone, Default)]
pub struct FadeField {
    values: HashMap<CellKey, f32>,
}

impl FadeField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves one cell's opacity a `step` toward its target and returns the new value.
    pub fn update(&mut self, key: CellKey, alive: bool, step: f32) -> f32 {
        let current = self.get(key);
        let next = if alive {
            (current + step).min(1.0)
        } else {
            (current - step).max(0.0)
        };
        if next > 0.0 {
            self.values.insert(key, next);
        } else {
            self.values.remove(&key);
        }
        next
    }

    #[must_use]
    pub fn get(&self, key: CellKey) -> f32 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn contains(&self, key: CellKey) -> bool {
        self.values.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
