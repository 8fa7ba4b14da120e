//! Round engine state machine
//!
//! `Idle -> Playing -> Locked -> (Playing | Ended)`, with `Ended` terminal until
//! `reset`. Calls made in the wrong state are ignored or answered with a
//! sentinel so a presentation layer can fire events defensively.

use serde::{Deserialize, Serialize};

use super::grid::GridDimensions;
use super::payout::PayoutTable;
use super::rng::LaserSource;

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for the first click
    #[default]
    Idle,
    /// Player may pick a cell
    Playing,
    /// Laser aimed, selection frozen
    Locked,
    /// Round over (won or lost)
    Ended,
}

/// A selected cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

/// Outcome of `RoundEngine::select`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Selection {
    Accepted,
    /// Not in `Playing`; nothing changed
    Ignored,
    /// Cell lies outside the current grid; nothing changed
    OutOfRange,
}

/// Laser produced by `RoundEngine::generate_laser`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserEvent {
    /// Grid already 1x1, nothing left to sweep
    Win,
    /// Sweep a full row (`is_row`) or column at `index`
    Sweep { is_row: bool, index: u32 },
}

/// Outcome of `RoundEngine::resolve_laser`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    /// No selection held
    Invalid,
    Lose,
    Survived,
    Win,
}

/// Orchestrates one game: selection, laser aiming and resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEngine {
    bet_amount: f64,
    grid: GridDimensions,
    #[serde(skip)]
    table: PayoutTable,
    state: EngineState,
    survived_rounds: u32,
    selected: Option<Cell>,
}

impl RoundEngine {
    /// Create an engine on a square grid. Negative or non-finite bets become 0.
    pub fn new(grid_size: u32, bet_amount: f64) -> Self {
        let mut engine = Self {
            bet_amount: sanitize_bet(bet_amount),
            grid: GridDimensions::new(grid_size),
            table: PayoutTable::new(),
            state: EngineState::Idle,
            survived_rounds: 0,
            selected: None,
        };
        engine.reset();
        engine
    }

    /// Back to `Idle` with a fresh grid, zero rounds and no selection
    pub fn reset(&mut self) {
        self.grid.reset();
        self.state = EngineState::Idle;
        self.survived_rounds = 0;
        self.selected = None;
    }

    /// `Idle -> Playing`; no-op otherwise
    pub fn start(&mut self) {
        if self.state == EngineState::Idle {
            self.state = EngineState::Playing;
        }
    }

    /// Record the player's cell, replacing any earlier pick
    pub fn select(&mut self, row: u32, col: u32) -> Selection {
        if self.state != EngineState::Playing {
            return Selection::Ignored;
        }
        if !self.grid.contains(row, col) {
            log::warn!(
                "Rejected selection ({}, {}) outside {}x{} grid",
                row,
                col,
                self.grid.rows,
                self.grid.cols
            );
            return Selection::OutOfRange;
        }
        self.selected = Some(Cell { row, col });
        Selection::Accepted
    }

    /// Aim the next laser and lock the selection.
    ///
    /// Returns `None` unless `Playing`. A collapsed axis (length 1) is never
    /// swept; the other axis is forced instead.
    pub fn generate_laser<S: LaserSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Option<LaserEvent> {
        if self.state != EngineState::Playing {
            return None;
        }

        self.state = EngineState::Locked;

        if self.grid.is_one_by_one() {
            return Some(LaserEvent::Win);
        }

        let is_row = if self.grid.rows == 1 {
            false
        } else if self.grid.cols == 1 {
            true
        } else {
            source.coin_flip()
        };

        let bound = if is_row { self.grid.rows } else { self.grid.cols };
        let index = source.index_below(bound);

        log::debug!(
            "Laser aimed at {} {}",
            if is_row { "row" } else { "column" },
            index
        );

        Some(LaserEvent::Sweep { is_row, index })
    }

    /// Resolve a sweep against the held selection
    pub fn resolve_laser(&mut self, is_row: bool, index: u32) -> RoundResult {
        let Some(selected) = self.selected else {
            return RoundResult::Invalid;
        };

        // Nothing left to sweep
        if self.grid.is_one_by_one() {
            self.selected = None;
            self.state = EngineState::Ended;
            return RoundResult::Win;
        }

        let hit = if is_row {
            selected.row == index
        } else {
            selected.col == index
        };

        if hit {
            self.state = EngineState::Ended;
            return RoundResult::Lose;
        }

        self.survived_rounds += 1;
        if is_row {
            self.grid.remove_row();
        } else {
            self.grid.remove_column();
        }
        self.selected = None;

        if self.grid.is_one_by_one() {
            self.state = EngineState::Ended;
            return RoundResult::Win;
        }

        self.state = EngineState::Playing;
        RoundResult::Survived
    }

    /// Current payout multiplier
    pub fn multiplier(&self) -> f64 {
        self.table.multiplier(i64::from(self.survived_rounds))
    }

    /// Bet times current multiplier
    pub fn winnings(&self) -> f64 {
        self.bet_amount * self.multiplier()
    }

    /// Change the bet. Only applies while `Idle`; returns whether it did.
    pub fn set_bet_amount(&mut self, amount: f64) -> bool {
        if self.state != EngineState::Idle {
            return false;
        }
        self.bet_amount = sanitize_bet(amount);
        true
    }

    pub fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn grid(&self) -> &GridDimensions {
        &self.grid
    }

    pub fn survived_rounds(&self) -> u32 {
        self.survived_rounds
    }

    pub fn selected(&self) -> Option<Cell> {
        self.selected
    }
}

fn sanitize_bet(amount: f64) -> f64 {
    if amount.is_finite() { amount.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::RngState;
    use proptest::prelude::*;

    /// Replays fixed draws
    struct Scripted {
        flips: Vec<bool>,
        indices: Vec<u32>,
    }

    impl LaserSource for Scripted {
        fn coin_flip(&mut self) -> bool {
            self.flips.remove(0)
        }

        fn index_below(&mut self, bound: u32) -> u32 {
            let index = self.indices.remove(0);
            assert!(index < bound, "scripted index {} out of bound {}", index, bound);
            index
        }
    }

    fn playing(size: u32, bet: f64) -> RoundEngine {
        let mut engine = RoundEngine::new(size, bet);
        engine.start();
        engine
    }

    #[test]
    fn test_fresh_engine_is_idle() {
        let engine = RoundEngine::new(8, 10.0);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.survived_rounds(), 0);
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.multiplier(), 1.0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = RoundEngine::new(8, 10.0);
        engine.start();
        assert_eq!(engine.state(), EngineState::Playing);
        engine.start();
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn test_start_does_not_leave_ended() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(1, 1);
        assert_eq!(engine.resolve_laser(true, 1), RoundResult::Lose);
        engine.start();
        assert_eq!(engine.state(), EngineState::Ended);
    }

    // Resolution only requires a held selection, so a stray second resolve
    // after a loss reopens play
    #[test]
    fn test_resolve_after_loss_reopens() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(1, 1);
        assert_eq!(engine.resolve_laser(true, 1), RoundResult::Lose);
        assert_eq!(engine.resolve_laser(true, 0), RoundResult::Survived);
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.survived_rounds(), 1);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn test_hit_loses() {
        let mut engine = playing(3, 50.0);
        assert_eq!(engine.select(1, 1), Selection::Accepted);
        assert_eq!(engine.resolve_laser(true, 1), RoundResult::Lose);
        assert_eq!(engine.state(), EngineState::Ended);
        // Loss leaves selection and grid alone
        assert_eq!(engine.selected(), Some(Cell { row: 1, col: 1 }));
        assert_eq!((engine.grid().rows, engine.grid().cols), (3, 3));
    }

    #[test]
    fn test_column_hit_loses() {
        let mut engine = playing(4, 10.0);
        let _ = engine.select(0, 2);
        assert_eq!(engine.resolve_laser(false, 2), RoundResult::Lose);
    }

    #[test]
    fn test_one_by_one_resolves_to_win() {
        let mut engine = playing(1, 10.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(false, 0), RoundResult::Win);
        assert_eq!(engine.state(), EngineState::Ended);
        assert_eq!(engine.survived_rounds(), 0);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn test_miss_survives_and_shrinks() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(true, 1), RoundResult::Survived);
        assert_eq!(engine.survived_rounds(), 1);
        assert_eq!(engine.multiplier(), 1.06);
        assert_eq!((engine.grid().rows, engine.grid().cols), (2, 3));
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.selected(), None);
    }

    #[test]
    fn test_column_miss_shrinks_columns() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(false, 2), RoundResult::Survived);
        assert_eq!((engine.grid().rows, engine.grid().cols), (3, 2));
    }

    #[test]
    fn test_winnings_after_one_round() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(0, 0);
        engine.resolve_laser(true, 1);
        assert!((engine.winnings() - 53.0).abs() < 1e-9);
    }

    #[test]
    fn test_winnings_before_any_round() {
        let mut engine = playing(3, 50.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.winnings(), 50.0 * engine.multiplier());
        assert_eq!(engine.winnings(), 50.0);
    }

    #[test]
    fn test_resolve_without_selection_is_invalid() {
        let mut engine = playing(3, 10.0);
        assert_eq!(engine.resolve_laser(true, 0), RoundResult::Invalid);
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.survived_rounds(), 0);

        let mut idle = RoundEngine::new(3, 10.0);
        assert_eq!(idle.resolve_laser(false, 0), RoundResult::Invalid);
        assert_eq!(idle.state(), EngineState::Idle);
    }

    #[test]
    fn test_select_ignored_outside_playing() {
        let mut engine = RoundEngine::new(3, 10.0);
        assert_eq!(engine.select(0, 0), Selection::Ignored);
        assert_eq!(engine.selected(), None);

        engine.start();
        let _ = engine.select(0, 0);
        let mut source = RngState::new(3).to_rng();
        engine.generate_laser(&mut source);
        assert_eq!(engine.state(), EngineState::Locked);
        assert_eq!(engine.select(2, 2), Selection::Ignored);
        assert_eq!(engine.selected(), Some(Cell { row: 0, col: 0 }));
    }

    #[test]
    fn test_select_overwrites() {
        let mut engine = playing(4, 10.0);
        let _ = engine.select(0, 0);
        let _ = engine.select(3, 2);
        assert_eq!(engine.selected(), Some(Cell { row: 3, col: 2 }));
    }

    // Deliberately stricter than the reference core, which accepted any coordinates
    #[test]
    fn test_select_out_of_range_rejected() {
        let mut engine = playing(3, 10.0);
        let _ = engine.select(1, 1);
        assert_eq!(engine.select(3, 0), Selection::OutOfRange);
        assert_eq!(engine.select(0, 7), Selection::OutOfRange);
        assert_eq!(engine.selected(), Some(Cell { row: 1, col: 1 }));
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn test_generate_laser_requires_playing() {
        let mut source = RngState::new(1).to_rng();
        let mut engine = RoundEngine::new(3, 10.0);
        assert_eq!(engine.generate_laser(&mut source), None);
        assert_eq!(engine.state(), EngineState::Idle);

        engine.start();
        assert!(engine.generate_laser(&mut source).is_some());
        // Already locked
        assert_eq!(engine.generate_laser(&mut source), None);
    }

    #[test]
    fn test_generate_laser_win_on_one_by_one() {
        let mut engine = playing(1, 10.0);
        let mut source = Scripted { flips: vec![], indices: vec![] };
        assert_eq!(engine.generate_laser(&mut source), Some(LaserEvent::Win));
        assert_eq!(engine.state(), EngineState::Locked);
    }

    #[test]
    fn test_generate_laser_uses_coin_and_index() {
        let mut engine = playing(4, 10.0);
        let mut source = Scripted {
            flips: vec![false],
            indices: vec![3],
        };
        assert_eq!(
            engine.generate_laser(&mut source),
            Some(LaserEvent::Sweep { is_row: false, index: 3 })
        );
    }

    #[test]
    fn test_collapsed_rows_force_column_sweep() {
        let mut engine = playing(3, 10.0);
        for _ in 0..2 {
            let _ = engine.select(0, 0);
            assert_eq!(engine.resolve_laser(true, 1), RoundResult::Survived);
        }
        assert_eq!(engine.grid().rows, 1);

        // No coin flip is consumed
        let mut source = Scripted {
            flips: vec![],
            indices: vec![1],
        };
        assert_eq!(
            engine.generate_laser(&mut source),
            Some(LaserEvent::Sweep { is_row: false, index: 1 })
        );
    }

    #[test]
    fn test_collapsed_cols_force_row_sweep() {
        let mut engine = playing(2, 10.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(false, 1), RoundResult::Survived);
        assert_eq!(engine.grid().cols, 1);

        let mut source = Scripted {
            flips: vec![],
            indices: vec![0],
        };
        assert_eq!(
            engine.generate_laser(&mut source),
            Some(LaserEvent::Sweep { is_row: true, index: 0 })
        );
    }

    #[test]
    fn test_full_game_to_win() {
        let mut engine = playing(2, 20.0);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(true, 1), RoundResult::Survived);
        let _ = engine.select(0, 0);
        assert_eq!(engine.resolve_laser(false, 1), RoundResult::Win);
        assert_eq!(engine.state(), EngineState::Ended);
        assert_eq!(engine.survived_rounds(), 2);
        assert_eq!(engine.selected(), None);
        assert!((engine.winnings() - 20.0 * 1.18).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_idle() {
        let mut engine = playing(3, 10.0);
        let _ = engine.select(0, 0);
        engine.resolve_laser(true, 2);
        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.survived_rounds(), 0);
        assert_eq!(engine.selected(), None);
        assert_eq!((engine.grid().rows, engine.grid().cols), (3, 3));
    }

    #[test]
    fn test_bet_only_changes_while_idle() {
        let mut engine = RoundEngine::new(3, 10.0);
        assert!(engine.set_bet_amount(25.0));
        assert_eq!(engine.bet_amount(), 25.0);
        engine.start();
        assert!(!engine.set_bet_amount(100.0));
        assert_eq!(engine.bet_amount(), 25.0);
    }

    #[test]
    fn test_bad_bets_become_zero() {
        assert_eq!(RoundEngine::new(3, -5.0).bet_amount(), 0.0);
        assert_eq!(RoundEngine::new(3, f64::NAN).bet_amount(), 0.0);
    }

    #[test]
    fn test_seeded_games_are_deterministic() {
        let play = |seed: u64| {
            let mut source = RngState::new(seed).to_rng();
            let mut engine = playing(6, 10.0);
            let mut lasers = Vec::new();
            while engine.state() == EngineState::Playing {
                let _ = engine.select(0, 0);
                let laser = engine.generate_laser(&mut source);
                lasers.push(laser);
                if let Some(LaserEvent::Sweep { is_row, index }) = laser {
                    engine.resolve_laser(is_row, index);
                }
            }
            (lasers, engine.survived_rounds())
        };
        assert_eq!(play(2024), play(2024));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Select(u32, u32),
        Generate,
        Resolve(bool, u32),
        Reset,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            (0u32..8, 0u32..8).prop_map(|(r, c)| Op::Select(r, c)),
            Just(Op::Generate),
            (any::<bool>(), 0u32..8).prop_map(|(r, i)| Op::Resolve(r, i)),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_engine_invariants(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..80)) {
            let mut source = RngState::new(seed).to_rng();
            let mut engine = RoundEngine::new(5, 10.0);
            for op in ops {
                let before = engine.state();
                match op {
                    Op::Start => engine.start(),
                    Op::Select(r, c) => { let _ = engine.select(r, c); }
                    Op::Generate => {
                        if let Some(LaserEvent::Sweep { is_row, index }) = engine.generate_laser(&mut source) {
                            let bound = if is_row { engine.grid().rows } else { engine.grid().cols };
                            prop_assert!(index < bound);
                            prop_assert!(bound > 1);
                        }
                    }
                    Op::Resolve(is_row, index) => {
                        if engine.resolve_laser(is_row, index) == RoundResult::Invalid {
                            prop_assert_eq!(engine.state(), before);
                        }
                    }
                    Op::Reset => engine.reset(),
                }
                prop_assert!(engine.grid().rows >= 1 && engine.grid().cols >= 1);
                prop_assert_eq!(engine.multiplier(), PayoutTable::new().multiplier(i64::from(engine.survived_rounds())));
                if engine.state() == EngineState::Idle {
                    prop_assert_eq!(engine.selected(), None);
                }
            }
        }
    }
}
