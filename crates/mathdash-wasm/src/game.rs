//! Game controller exposed to JavaScript

use crate::storage::ConsoleNotifier;
use mathdash_core::{GameConfig, LeaderboardEntry, SessionEngine, SessionState, Status};
use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Snapshot handed to the page each frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView<'a> {
    #[serde(flatten)]
    pub state: &'a SessionState,
    pub time_left_label: String,
    pub problem_label: Option<String>,
}

/// The WASM game controller
#[wasm_bindgen]
pub struct MathGame {
    engine: SessionEngine,
    /// `performance.now()` at the previous tick
    last_tick_ms: Option<f64>,
}

impl Default for MathGame {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MathGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MathGame {
        MathGame {
            engine: SessionEngine::new(Box::new(ConsoleNotifier)),
            last_tick_ms: None,
        }
    }

    /// Apply a `{ operators, difficulty, playerName, mode }` object
    #[wasm_bindgen]
    pub fn configure(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        self.engine
            .configure(config)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.engine.start();
        self.last_tick_ms = Some(Self::now());
    }

    #[wasm_bindgen]
    pub fn end(&mut self) {
        self.engine.end();
        self.last_tick_ms = None;
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.engine.reset();
        self.last_tick_ms = None;
    }

    /// Check an answer typed by the player
    #[wasm_bindgen]
    pub fn check_answer(&mut self, input: f64) -> bool {
        if !input.is_finite() || input.fract() != 0.0 {
            return false;
        }
        self.engine.check_answer(input as i64)
    }

    #[wasm_bindgen]
    pub fn skip(&mut self) -> bool {
        self.engine.skip()
    }

    /// Advance the round clock (call from requestAnimationFrame)
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        let now = Self::now();
        self.advance_to(now);
    }

    #[wasm_bindgen]
    pub fn is_playing(&self) -> bool {
        self.engine.state().status == Status::Playing
    }

    #[wasm_bindgen]
    pub fn is_finished(&self) -> bool {
        self.engine.state().status == Status::Finished
    }

    #[wasm_bindgen]
    pub fn score(&self) -> u32 {
        self.engine.state().score
    }

    #[wasm_bindgen]
    pub fn time_left(&self) -> u32 {
        self.engine.state().time_left
    }

    /// Get current round state as JSON
    #[wasm_bindgen]
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&self.view()).unwrap_or_default()
    }

    /// Leaderboard entry for a finished ranked round, or `null`
    #[wasm_bindgen]
    pub fn leaderboard_entry(&self) -> Result<JsValue, JsValue> {
        match self.engine.leaderboard_entry() {
            Some(entry) => Ok(serde_wasm_bindgen::to_value(&entry)?),
            None => Ok(JsValue::NULL),
        }
    }
}

impl MathGame {
    /// Get current timestamp in milliseconds
    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub(crate) fn advance_to(&mut self, now_ms: f64) {
        if let Some(last) = self.last_tick_ms {
            let elapsed = (now_ms - last).max(0.0);
            self.engine.advance(Duration::from_secs_f64(elapsed / 1000.0));
        }
        self.last_tick_ms = if self.engine.is_timer_running() {
            Some(now_ms)
        } else {
            None
        };
    }

    pub(crate) fn round_entry(&self) -> Option<LeaderboardEntry> {
        self.engine.leaderboard_entry()
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    fn view(&self) -> StateView<'_> {
        let state = self.engine.state();
        StateView {
            state,
            time_left_label: state.time_left_string(),
            problem_label: state.current_problem.as_ref().map(|p| format!("{} = ?", p)),
        }
    }
}
