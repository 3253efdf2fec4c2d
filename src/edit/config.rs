//! Editor tunables

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Configuration for the stroke engine.
///
/// Every field has a default matching the classic editor behavior, so a
/// JSON file only needs to list what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Cells with influence at or below this are left untouched
    pub skip_threshold: f32,
    /// Flatten modes only write where influence exceeds this
    pub flatten_threshold: f32,
    /// Multiplier on the smooth lerp factor
    pub smooth_gain: f32,
    /// Raise/lower rate is `influence * strength / divisor` per second
    pub raise_divisor: f32,
    /// Maximum snapshots kept by the undo stack
    pub undo_capacity: usize,
    /// Initial brush radius in world units
    pub default_brush_radius: f32,
    /// Initial brush strength
    pub default_strength: f32,
    /// Initial flatten-by-value target, normalized height
    pub default_flatten_target: f32,
    /// Seed for detail painting
    pub detail_seed: u64,
    /// Minimum weight for a layer to show on the radar
    pub radar_threshold: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            skip_threshold: 0.001,
            flatten_threshold: 0.5,
            smooth_gain: 4.0,
            raise_divisor: 2.0,
            undo_capacity: 32,
            default_brush_radius: 1.0,
            default_strength: 1.0,
            default_flatten_target: 1.0,
            detail_seed: 0x5eed,
            radar_threshold: 0.1,
        }
    }
}

impl EditorConfig {
    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Reject values the stroke rules cannot work with
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("skip_threshold", self.skip_threshold),
            ("flatten_threshold", self.flatten_threshold),
            ("smooth_gain", self.smooth_gain),
            ("default_brush_radius", self.default_brush_radius),
            ("default_strength", self.default_strength),
            ("radar_threshold", self.radar_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if !self.raise_divisor.is_finite() || self.raise_divisor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "raise_divisor must be > 0, got {}",
                self.raise_divisor
            )));
        }
        if !(0.0..=1.0).contains(&self.default_flatten_target) {
            return Err(Error::InvalidConfig(format!(
                "default_flatten_target must be within [0, 1], got {}",
                self.default_flatten_target
            )));
        }
        if self.undo_capacity == 0 {
            return Err(Error::InvalidConfig("undo_capacity must be > 0".to_string()));
        }
        Ok(())
    }
}
