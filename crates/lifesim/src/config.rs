//! Tunable limits and defaults.
//!
//! Every group is `#[serde(default)]`, so a partial JSON document such as
//!
//! ```json
//! { "speed": { "initial_period_ms": 50 }, "heat": { "enabled": true, "spread": true } }
//! ```
//!
//! overrides only the named fields. [`LifeConfig::sanitized`] repairs bounds that
//! contradict each other instead of rejecting the document.

use serde::{Deserialize, Serialize};

use crate::brush::BrushShape;
use crate::error::{LifeError, Result};

/// Cell size in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub initial_cell_size: u32,
    pub min_cell_size: u32,
    pub max_cell_size: u32,
    pub zoom_step: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial_cell_size: 20,
            min_cell_size: 8,
            max_cell_size: 40,
            zoom_step: 2,
        }
    }
}

impl ZoomConfig {
    #[must_use]
    pub fn clamp(&self, cell_size: u32) -> u32 {
        cell_size.clamp(self.min_cell_size, self.max_cell_size)
    }
}

/// Simulation timer period in milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial_period_ms: u32,
    pub min_period_ms: u32,
    pub max_period_ms: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial_period_ms: 30,
            min_period_ms: 5,
            max_period_ms: 100,
        }
    }
}

impl SpeedConfig {
    #[must_use]
    pub fn clamp(&self, period_ms: u32) -> u32 {
        period_ms.clamp(self.min_period_ms, self.max_period_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FadeConfig {
    /// Opacity change per rendered frame.
    pub fade_step: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self { fade_step: 0.15 }
    }
}

/// Brush size is a diameter in cells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BrushConfig {
    pub initial_size: u32,
    pub max_size: u32,
    pub shape: BrushShape,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            initial_size: 1,
            max_size: 15,
            shape: BrushShape::Circle,
        }
    }
}

impl BrushConfig {
    #[must_use]
    pub fn clamp(&self, size: u32) -> u32 {
        size.clamp(1, self.max_size)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HeatConfig {
    pub enabled: bool,
    /// Decay heat of dead cells by `cool_step` per generation.
    pub cool_off: bool,
    /// Share heat above `spread_threshold` with the eight neighbours.
    pub spread: bool,
    pub cool_step: f64,
    pub spread_threshold: f64,
    /// Fraction of a hot cell's heat given away per generation.
    pub spread_fraction: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cool_off: false,
            spread: false,
            cool_step: 0.05,
            spread_threshold: 4.0,
            spread_fraction: 0.2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TraceConfig {
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LifeConfig {
    pub zoom: ZoomConfig,
    pub speed: SpeedConfig,
    pub fade: FadeConfig,
    pub brush: BrushConfig,
    pub heat: HeatConfig,
    pub trace: TraceConfig,
}

impl LifeConfig {
    /// Parses a (possibly partial) JSON document and sanitizes it.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::Config`] if the text is not valid JSON for this shape.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| LifeError::config(e.to_string()))?;
        Ok(config.sanitized())
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Repairs contradictory or non-finite settings.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let zoom = &mut self.zoom;
        zoom.min_cell_size = zoom.min_cell_size.max(1);
        if zoom.min_cell_size > zoom.max_cell_size {
            std::mem::swap(&mut zoom.min_cell_size, &mut zoom.max_cell_size);
        }
        zoom.initial_cell_size = zoom.clamp(zoom.initial_cell_size);
        zoom.zoom_step = zoom.zoom_step.max(1);

        let speed = &mut self.speed;
        speed.min_period_ms = speed.min_period_ms.max(1);
        if speed.min_period_ms > speed.max_period_ms {
            std::mem::swap(&mut speed.min_period_ms, &mut speed.max_period_ms);
        }
        speed.initial_period_ms = speed.clamp(speed.initial_period_ms);

        if !(self.fade.fade_step.is_finite() && self.fade.fade_step > 0.0) {
            self.fade.fade_step = defaults.fade.fade_step;
        }
        self.fade.fade_step = self.fade.fade_step.min(1.0);

        self.brush.max_size = self.brush.max_size.max(1);
        self.brush.initial_size = self.brush.clamp(self.brush.initial_size);

        let heat = &mut self.heat;
        if !(heat.cool_step.is_finite() && heat.cool_step >= 0.0) {
            heat.cool_step = defaults.heat.cool_step;
        }
        if !(heat.spread_threshold.is_finite() && heat.spread_threshold >= 0.0) {
            heat.spread_threshold = defaults.heat.spread_threshold;
        }
        if !heat.spread_fraction.is_finite() {
            heat.spread_fraction = defaults.heat.spread_fraction;
        }
        heat.spread_fraction = heat.spread_fraction.clamp(0.0, 1.0);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_ui() {
        let config = LifeConfig::default();
        assert_eq!(config.zoom.initial_cell_size, 20);
        assert_eq!((config.zoom.min_cell_size, config.zoom.max_cell_size), (8, 40));
        assert_eq!(config.speed.initial_period_ms, 30);
        assert_eq!((config.speed.min_period_ms, config.speed.max_period_ms), (5, 100));
        assert!((config.fade.fade_step - 0.15).abs() < f32::EPSILON);
        assert!(!config.heat.enabled);
        assert!(!config.trace.enabled);
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn partial_json_overrides_named_fields_only() {
        let config = LifeConfig::from_json(
            r#"{ "speed": { "initial_period_ms": 50 }, "trace": { "enabled": true } }"#,
        )
        .unwrap();
        assert_eq!(config.speed.initial_period_ms, 50);
        assert_eq!(config.speed.max_period_ms, 100);
        assert!(config.trace.enabled);
        assert_eq!(config.zoom, ZoomConfig::default());
    }

    #[test]
    fn brush_shape_parses_lowercase() {
        let config = LifeConfig::from_json(r#"{ "brush": { "shape": "square" } }"#).unwrap();
        assert_eq!(config.brush.shape, BrushShape::Square);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(LifeConfig::from_json("{ nope"), Err(LifeError::Config(_))));
        let err = LifeConfig::from_json(r#"{ "zoom": { "min_cell_size": -1 } }"#).unwrap_err();
        assert!(matches!(err, LifeError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn sanitize_repairs_inverted_bounds() {
        let mut config = LifeConfig::default();
        config.zoom.min_cell_size = 50;
        config.zoom.max_cell_size = 10;
        config.speed.initial_period_ms = 1_000;
        config.fade.fade_step = f32::NAN;
        config.heat.spread_fraction = 3.0;
        config.brush.max_size = 0;
        let config = config.sanitized();
        assert_eq!((config.zoom.min_cell_size, config.zoom.max_cell_size), (10, 50));
        assert_eq!(config.zoom.initial_cell_size, 20);
        assert_eq!(config.speed.initial_period_ms, 100);
        assert!((config.fade.fade_step - 0.15).abs() < f32::EPSILON);
        assert!((config.heat.spread_fraction - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.brush.max_size, 1);
    }

    #[test]
    fn clamps() {
        let config = LifeConfig::default();
        assert_eq!(config.zoom.clamp(2), 8);
        assert_eq!(config.zoom.clamp(400), 40);
        assert_eq!(config.speed.clamp(1), 5);
        assert_eq!(config.speed.clamp(250), 100);
        assert_eq!(config.brush.clamp(0), 1);
        assert_eq!(config.brush.clamp(99), 15);
    }

    #[test]
    fn json_round_trip_preserves_settings() {
        let mut config = LifeConfig::default();
        config.heat.enabled = true;
        config.heat.spread = true;
        let text = config.to_json();
        assert_eq!(LifeConfig::from_json(&text).unwrap(), config);
    }
}
