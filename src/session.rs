//! Session controller
//!
//! Sits between the presentation layer and the round engine: owns the seeded
//! RNG, holds the pending laser between warning and firing, guards the bet
//! and cash-out, and queues events for the renderer and sound player.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{Cell, EngineState, LaserEvent, RngState, RoundEngine, RoundResult, Selection};

/// What the player currently sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Start screen, bet adjustable
    Idle,
    /// Waiting for a cell pick
    Playing,
    /// Laser warning showing
    Locked,
    Won,
    Lost,
    CashedOut,
}

/// Sound cues the host plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    Laser,
    Win,
    Lose,
}

/// Presentation events, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    Started,
    Selected { row: u32, col: u32 },
    /// Show the warning band; call `fire` once it has played out
    LaserWarning { is_row: bool, index: u32 },
    /// Laser fired; `rate` is the playback rate for the laser cue
    LaserFired { is_row: bool, index: u32, rate: f32 },
    RowRemoved { index: u32 },
    ColumnRemoved { index: u32 },
    Won { winnings: f64, multiplier: f64, rounds: u32 },
    Lost { bet: f64, rounds: u32, multiplier: f64 },
    CashedOut { winnings: f64, multiplier: f64 },
    BetChanged { amount: f64 },
    Restarted,
}

impl SessionEvent {
    /// Sound to play for this event, if any
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            SessionEvent::LaserFired { .. } => Some(SoundCue::Laser),
            SessionEvent::Won { .. } => Some(SoundCue::Win),
            SessionEvent::Lost { .. } => Some(SoundCue::Lose),
            _ => None,
        }
    }
}

/// Serializable snapshot for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub phase: SessionPhase,
    pub rows: u32,
    pub cols: u32,
    pub rounds: u32,
    pub multiplier: f64,
    pub bet: f64,
    pub winnings: f64,
    pub selected: Option<Cell>,
}

/// Playback-rate jitter range for the laser cue
const LASER_RATE_RANGE: (f32, f32) = (0.95, 1.05);

/// One player's game session
pub struct Session {
    settings: Settings,
    engine: RoundEngine,
    rng: Pcg32,
    /// Laser aimed but not yet fired
    pending: Option<LaserEvent>,
    /// Set once the player has banked winnings
    cashed_out: Option<f64>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let bet = settings.bet_limits.clamp(settings.default_bet);
        let engine = RoundEngine::new(settings.grid_size, bet);
        log::info!(
            "Session created: {}x{} grid, bet {}, seed {}",
            settings.grid_size,
            settings.grid_size,
            engine.bet_amount(),
            seed
        );
        Self {
            settings,
            engine,
            rng: RngState::new(seed).to_rng(),
            pending: None,
            cashed_out: None,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn phase(&self) -> SessionPhase {
        if self.cashed_out.is_some() {
            return SessionPhase::CashedOut;
        }
        match self.engine.state() {
            EngineState::Idle => SessionPhase::Idle,
            EngineState::Playing => SessionPhase::Playing,
            EngineState::Locked => SessionPhase::Locked,
            EngineState::Ended if self.won() => SessionPhase::Won,
            EngineState::Ended => SessionPhase::Lost,
        }
    }

    /// Laser waiting to be fired
    pub fn pending_laser(&self) -> Option<LaserEvent> {
        self.pending
    }

    /// Live multiplier; wins and cash-outs pay this value
    pub fn multiplier(&self) -> f64 {
        self.engine.multiplier()
    }

    /// Sound cue and playback volume for an event
    pub fn cue(&self, event: &SessionEvent) -> Option<(SoundCue, f32)> {
        event
            .sound()
            .map(|cue| (cue, self.settings.effective_sfx_volume()))
    }

    pub fn bet(&self) -> f64 {
        self.engine.bet_amount()
    }

    /// Payout for the current phase: banked amount, win payout, or 0 after a loss
    pub fn winnings(&self) -> f64 {
        match self.phase() {
            SessionPhase::CashedOut => self.cashed_out.unwrap_or(0.0),
            SessionPhase::Lost => 0.0,
            _ => self.engine.winnings(),
        }
    }

    /// Set the bet (Idle only). Returns the bet in effect afterwards.
    pub fn set_bet(&mut self, amount: f64) -> f64 {
        if self.phase() != SessionPhase::Idle {
            return self.bet();
        }
        let amount = self.settings.bet_limits.clamp(amount);
        if self.engine.set_bet_amount(amount) {
            self.events.push(SessionEvent::BetChanged { amount });
        }
        self.bet()
    }

    pub fn increase_bet(&mut self) -> f64 {
        let step = self.settings.bet_limits.step;
        self.set_bet(self.bet() + step)
    }

    pub fn decrease_bet(&mut self) -> f64 {
        let step = self.settings.bet_limits.step;
        self.set_bet(self.bet() - step)
    }

    /// Handle a click on cell (row, col).
    ///
    /// A click after the game ended restarts; the first click starts the game
    /// and also counts as the first pick.
    pub fn click(&mut self, row: u32, col: u32) {
        match self.phase() {
            SessionPhase::Won | SessionPhase::Lost | SessionPhase::CashedOut => {
                self.restart();
                return;
            }
            SessionPhase::Idle => {
                self.engine.start();
                self.events.push(SessionEvent::Started);
            }
            SessionPhase::Playing => {}
            SessionPhase::Locked => return,
        }

        match self.engine.select(row, col) {
            Selection::Accepted => {}
            Selection::Ignored | Selection::OutOfRange => return,
        }
        log::debug!("Selected ({}, {})", row, col);
        self.events.push(SessionEvent::Selected { row, col });

        match self.engine.generate_laser(&mut self.rng) {
            Some(LaserEvent::Sweep { is_row, index }) => {
                self.pending = Some(LaserEvent::Sweep { is_row, index });
                self.events.push(SessionEvent::LaserWarning { is_row, index });
            }
            Some(LaserEvent::Win) => {
                // Resolves immediately: nothing left to sweep
                self.engine.resolve_laser(false, 0);
                self.finish_won();
            }
            None => {}
        }
    }

    /// Fire the pending laser and resolve it
    pub fn fire(&mut self) -> Option<RoundResult> {
        let Some(LaserEvent::Sweep { is_row, index }) = self.pending.take() else {
            return None;
        };

        let rate = self.rng.random_range(LASER_RATE_RANGE.0..=LASER_RATE_RANGE.1);
        self.events.push(SessionEvent::LaserFired { is_row, index, rate });

        let result = self.engine.resolve_laser(is_row, index);
        match result {
            RoundResult::Invalid => {
                log::warn!("Laser resolved without a selection");
            }
            RoundResult::Lose => {
                let rounds = self.engine.survived_rounds();
                log::info!("Lost after {} rounds", rounds);
                self.events.push(SessionEvent::Lost {
                    bet: self.bet(),
                    rounds,
                    multiplier: self.engine.multiplier(),
                });
            }
            RoundResult::Survived | RoundResult::Win => {
                self.events.push(if is_row {
                    SessionEvent::RowRemoved { index }
                } else {
                    SessionEvent::ColumnRemoved { index }
                });
                if result == RoundResult::Win {
                    self.finish_won();
                }
            }
        }
        Some(result)
    }

    /// Bank `bet x multiplier` (Playing only). Returns the amount banked.
    pub fn cash_out(&mut self) -> Option<f64> {
        if self.phase() != SessionPhase::Playing {
            return None;
        }
        let multiplier = self.engine.multiplier();
        let winnings = self.engine.winnings();
        self.cashed_out = Some(winnings);
        log::info!("Cashed out {:.2} at x{:.2}", winnings, multiplier);
        self.events.push(SessionEvent::CashedOut { winnings, multiplier });
        Some(winnings)
    }

    /// New game with the same bet
    pub fn restart(&mut self) {
        self.engine.reset();
        self.pending = None;
        self.cashed_out = None;
        self.events.push(SessionEvent::Restarted);
    }

    /// Take all queued events in emission order
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> SessionSummary {
        let grid = self.engine.grid();
        SessionSummary {
            phase: self.phase(),
            rows: grid.rows,
            cols: grid.cols,
            rounds: self.engine.survived_rounds(),
            multiplier: self.engine.multiplier(),
            bet: self.bet(),
            winnings: self.winnings(),
            selected: self.engine.selected(),
        }
    }

    fn won(&self) -> bool {
        self.engine.state() == EngineState::Ended && self.engine.grid().is_one_by_one()
    }

    fn finish_won(&mut self) {
        let rounds = self.engine.survived_rounds();
        let multiplier = self.engine.multiplier();
        let winnings = self.engine.winnings();
        log::info!("Won {:.2} after {} rounds", winnings, rounds);
        self.events.push(SessionEvent::Won {
            winnings,
            multiplier,
            rounds,
        });
    }
}
