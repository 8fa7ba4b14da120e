//! Laser Grid - a shrinking-grid laser dodging minigame
//!
//! Core modules:
//! - `sim`: Deterministic round engine (grid, payouts, state machine)
//! - `session`: Presentation-facing controller (bet, cash-out, events)
//! - `layout`: Grid geometry for the renderer
//! - `settings`: Host-supplied configuration

pub mod layout;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use layout::GridLayout;
pub use session::{Session, SessionEvent, SessionPhase, SoundCue};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Starting grid edge
    pub const DEFAULT_GRID_SIZE: u32 = 8;
    /// Bet for a fresh session
    pub const DEFAULT_BET: f64 = 10.0;

    /// Bet limits
    pub const MIN_BET: f64 = 5.0;
    pub const MAX_BET: f64 = 500.0;
    pub const BET_STEP: f64 = 5.0;

    /// Layout (pixels)
    pub const CELL_SIZE: f32 = 60.0;
    pub const CELL_INSET: f32 = 4.0;
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 1080.0;
    pub const GRID_OFFSET_X: f32 = 25.0;

    /// Warning shown before the laser fires (ms)
    pub const LASER_WARNING_MS: u32 = 900;
    /// Pause after a survived sweep (ms)
    pub const CLEAR_DELAY_MS: u32 = 400;

    pub const SFX_VOLUME: f32 = 0.8;
}
