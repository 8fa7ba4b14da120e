//! Game settings
//!
//! Supplied by the host page as JSON and validated on load. Never persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings load/validation failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bet limits invalid: min {min}, max {max}, step {step}")]
    BetLimits { min: f64, max: f64, step: f64 },
    #[error("grid size must be between 1 and {max}, got {size}")]
    GridSize { size: u32, max: u32 },
    #[error("default bet {0} is outside the bet limits")]
    DefaultBet(f64),
}

/// Largest supported grid edge
pub const MAX_GRID_SIZE: u32 = 32;

/// Allowed bet range and increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min: MIN_BET,
            max: MAX_BET,
            step: BET_STEP,
        }
    }
}

impl BetLimits {
    /// Clamp into range and snap down to a step above `min`.
    ///
    /// Anything at or above `max` yields `max`, even when `max` is off the step grid.
    pub fn clamp(&self, amount: f64) -> f64 {
        if !amount.is_finite() {
            return self.min;
        }
        if amount >= self.max {
            return self.max;
        }
        let clamped = amount.max(self.min);
        let steps = ((clamped - self.min) / self.step).floor();
        (self.min + steps * self.step).min(self.max)
    }

    pub fn contains(&self, amount: f64) -> bool {
        (self.min..=self.max).contains(&amount)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min >= 0.0
            && self.min <= self.max
            && self.step > 0.0;
        if ok {
            Ok(())
        } else {
            Err(SettingsError::BetLimits {
                min: self.min,
                max: self.max,
                step: self.step,
            })
        }
    }
}

/// Pixel metrics for laying out the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Pitch between cell centres
    pub cell_size: f32,
    /// Gap trimmed from each drawn cell
    pub cell_inset: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal nudge applied after centring (leaves room for the side panel)
    pub offset_x: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            cell_inset: CELL_INSET,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            offset_x: GRID_OFFSET_X,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting grid edge (square)
    pub grid_size: u32,
    /// Bet used for a new session
    pub default_bet: f64,
    pub bet_limits: BetLimits,
    pub layout: LayoutMetrics,

    // === Presentation timing hints (the core never waits) ===
    /// Laser warning shown before firing (ms)
    pub laser_warning_ms: u32,
    /// Pause after a survived sweep before the next pick (ms)
    pub clear_delay_ms: u32,

    // === Audio ===
    /// Sound cue volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            default_bet: DEFAULT_BET,
            bet_limits: BetLimits::default(),
            layout: LayoutMetrics::default(),
            laser_warning_ms: LASER_WARNING_MS,
            clear_delay_ms: CLEAR_DELAY_MS,
            sfx_volume: SFX_VOLUME,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {}x{} grid, bet {} ({}-{})",
            settings.grid_size,
            settings.grid_size,
            settings.default_bet,
            settings.bet_limits.min,
            settings.bet_limits.max
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(SettingsError::GridSize {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        self.bet_limits.validate()?;
        if !self.bet_limits.contains(self.default_bet) {
            return Err(SettingsError::DefaultBet(self.default_bet));
        }
        Ok(())
    }

    /// Effective sound cue volume
    pub fn effective_sfx_volume(&self) -> f32 {
        self.sfx_volume.clamp(0.0, 1.0)
    }
}
