//! WebAssembly bindings for MathDash
//!
//! Exposes the round engine and the leaderboard to a browser page. The
//! page renders; this crate keeps score. Scores are cached in
//! `localStorage`; there is no remote table in the browser build.

use mathdash_core::{LeaderboardEntry, LeaderboardStore};
use wasm_bindgen::prelude::*;

mod game;
mod storage;


pub use game::MathGame;
pub use storage::{BrowserStorageSlot, ConsoleNotifier};

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// High scores kept in the browser
#[wasm_bindgen]
pub struct Leaderboard {
    store: LeaderboardStore,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Leaderboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Leaderboard {
        Leaderboard {
            store: LeaderboardStore::local_only(Box::new(BrowserStorageSlot::new())),
        }
    }

    /// Top ten entries, highest score first
    #[wasm_bindgen]
    pub fn fetch(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.store.fetch())?)
    }

    /// Top ten entries as a JSON string
    #[wasm_bindgen]
    pub fn fetch_json(&self) -> String {
        serde_json::to_string(&self.store.fetch()).unwrap_or_default()
    }

    /// Record an entry `{ player_name, score, difficulty, operation }`
    #[wasm_bindgen]
    pub fn submit(&self, entry: JsValue) -> Result<(), JsValue> {
        let entry: LeaderboardEntry = serde_wasm_bindgen::from_value(entry)?;
        self.store
            .submit(entry)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))
    }

    /// Record the result of a finished round, if it was ranked
    #[wasm_bindgen]
    pub fn submit_round(&self, game: &MathGame) -> Result<bool, JsValue> {
        let Some(entry) = game.round_entry() else {
            return Ok(false);
        };
        self.store
            .submit(entry)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
        Ok(true)
    }
}
