//! Deterministic game core
//!
//! All round logic lives here. This module must stay pure:
//! - No timing (warning delays belong to the presentation layer)
//! - Randomness only through an injected `LaserSource`
//! - No rendering or platform dependencies

pub mod engine;
pub mod grid;
pub mod payout;
pub mod rng;

pub use engine::{Cell, EngineState, LaserEvent, RoundEngine, RoundResult, Selection};
pub use grid::GridDimensions;
pub use payout::{MULTIPLIERS, PayoutTable};
pub use rng::{LaserSource, RngState};
