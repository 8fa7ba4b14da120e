//! Browser bindings
//!
//! The page owns rendering, tweens and audio; it drives a `LaserGame` and
//! renders whatever `events_json` reports. Timing between `click` and `fire`
//! is up to the page (see `laser_warning_ms` in the settings).

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::layout::GridLayout;
use crate::session::{Session, SessionPhase};
use crate::settings::Settings;
use crate::sim::RoundResult;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Laser Grid starting...");
}

/// One game session exposed to JavaScript
#[wasm_bindgen]
pub struct LaserGame {
    session: Session,
    layout: GridLayout,
}

#[wasm_bindgen]
impl LaserGame {
    /// Create a game from optional settings JSON (defaults when omitted)
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<LaserGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Settings::default(),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            layout: GridLayout::new(settings.layout),
            session: Session::new(settings, seed),
        })
    }

    pub fn click(&mut self, row: u32, col: u32) {
        self.session.click(row, col);
    }

    /// Click at viewport coordinates. Returns false when no cell was hit.
    ///
    /// Any click restarts a finished game, even off the grid.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if matches!(
            self.session.phase(),
            SessionPhase::Won | SessionPhase::Lost | SessionPhase::CashedOut
        ) {
            self.session.restart();
            return true;
        }
        let grid = *self.session.engine().grid();
        match self.layout.cell_at(&grid, Vec2::new(x, y)) {
            Some(cell) => {
                self.session.click(cell.row, cell.col);
                true
            }
            None => false,
        }
    }

    /// Fire the pending laser. Returns the result name, or undefined when none was pending.
    pub fn fire(&mut self) -> Option<String> {
        self.session.fire().map(|result| {
            match result {
                RoundResult::Invalid => "INVALID",
                RoundResult::Lose => "LOSE",
                RoundResult::Survived => "SURVIVED",
                RoundResult::Win => "WIN",
            }
            .to_string()
        })
    }

    pub fn cash_out(&mut self) -> Option<f64> {
        self.session.cash_out()
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn set_bet(&mut self, amount: f64) -> f64 {
        self.session.set_bet(amount)
    }

    pub fn increase_bet(&mut self) -> f64 {
        self.session.increase_bet()
    }

    pub fn decrease_bet(&mut self) -> f64 {
        self.session.decrease_bet()
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> u32 {
        self.session.engine().grid().rows
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> u32 {
        self.session.engine().grid().cols
    }

    #[wasm_bindgen(getter)]
    pub fn rounds(&self) -> u32 {
        self.session.engine().survived_rounds()
    }

    #[wasm_bindgen(getter)]
    pub fn multiplier(&self) -> f64 {
        self.session.multiplier()
    }

    #[wasm_bindgen(getter)]
    pub fn winnings(&self) -> f64 {
        self.session.winnings()
    }

    #[wasm_bindgen(getter)]
    pub fn bet(&self) -> f64 {
        self.session.bet()
    }

    /// Volume for sound cues named in `events_json`
    #[wasm_bindgen(getter)]
    pub fn sfx_volume(&self) -> f32 {
        self.session.settings().effective_sfx_volume()
    }

    /// Cell centre in viewport pixels as `[x, y]`
    pub fn cell_center(&self, row: u32, col: u32) -> Vec<f32> {
        let grid = self.session.engine().grid();
        self.layout.cell_center(grid, row, col).to_array().to_vec()
    }

    /// Laser warning band as `[cx, cy, w, h]`
    pub fn laser_rect(&self, is_row: bool, index: u32) -> Vec<f32> {
        let grid = self.session.engine().grid();
        let rect = self.layout.laser_rect(grid, is_row, index);
        vec![rect.center.x, rect.center.y, rect.size.x, rect.size.y]
    }

    /// Drain queued events as a JSON array
    pub fn events_json(&mut self) -> Result<String, JsValue> {
        let events = self.session.drain_events();
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn summary_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.summary()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.session
            .settings()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
