//! Cumulative visit heat with optional cooling and diffusion.

use std::collections::HashMap;

use crate::cell::CellKey;
use crate::config::HeatConfig;
use crate::LiveCells;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSettings {
    pub cool_off: bool,
    pub spread: bool,
    pub cool_step: f64,
    pub spread_threshold: f64,
    pub spread_fraction: f64,
}

impl From<&HeatConfig> for HeatSettings {
    fn from(config: &HeatConfig) -> Self {
        Self {
            cool_off: config.cool_off,
            spread: config.spread,
            cool_step: config.cool_step,
            spread_threshold: config.spread_threshold,
            spread_fraction: config.spread_fraction,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeatField {
    values: HashMap<CellKey, f64>,
}

impl HeatField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One generation of bookkeeping: every live cell gains one unit, then dead
    /// cells cool, then hot cells spread. Both later passes finish before returning.
    pub fn record_generation(&mut self, live: &LiveCells, settings: &HeatSettings) {
        for &key in live {
            *self.values.entry(key).or_insert(0.0) += 1.0;
        }
        if settings.cool_off {
            self.cool(live, settings.cool_step);
        }
        if settings.spread {
            self.diffuse(settings.spread_threshold, settings.spread_fraction);
        }
    }

    fn cool(&mut self, live: &LiveCells, step: f64) {
        self.values.retain(|key, heat| {
            if !live.contains(key) {
                *heat = (*heat - step).max(0.0);
            }
            *heat > 0.0
        });
    }

    /// Each cell above `threshold` gives away `fraction` of its heat, split evenly
    /// over its eight neighbours. Sources are read from the field as it stood
    /// before this pass.
    fn diffuse(&mut self, threshold: f64, fraction: f64) {
        let sources: Vec<(CellKey, f64)> = self
            .values
            .iter()
            .filter(|&(_, &heat)| heat > threshold)
            .map(|(&key, &heat)| (key, heat * fraction))
            .collect();

        for (key, given) in sources {
            if let Some(heat) = self.values.get_mut(&key) {
                *heat -= given;
            }
            let share = given / 8.0;
            for n in key.neighbors() {
                *self.values.entry(n).or_insert(0.0) += share;
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: CellKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.values().copied().fold(0.0, f64::max)
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
