//! Browser-side leaderboard slot and feedback sink

use mathdash_core::{GameEvent, LeaderboardError, LeaderboardResult, LocalSlot, Notifier, LEADERBOARD_KEY};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.localStorage` under the fixed leaderboard key
pub struct BrowserStorageSlot {
    storage: Option<Storage>,
}

impl BrowserStorageSlot {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            web_sys::console::warn_1(&JsValue::from_str(
                "localStorage unavailable, leaderboard will not persist",
            ));
        }
        Self { storage }
    }
}

impl Default for BrowserStorageSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSlot for BrowserStorageSlot {
    fn read(&self) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(LEADERBOARD_KEY).ok().flatten())
    }

    fn write(&self, contents: &str) -> LeaderboardResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| LeaderboardError::Storage("localStorage unavailable".into()))?;
        storage.set_item(LEADERBOARD_KEY, contents).map_err(|e| {
            LeaderboardError::Storage(e.as_string().unwrap_or_else(|| "quota exceeded".into()))
        })
    }

    fn slot_name(&self) -> &'static str {
        "LocalStorage"
    }
}

/// Sends engine events to the browser console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: GameEvent) {
        web_sys::console::log_1(&JsValue::from_str(&format!("Audio: {}", event)));
    }
}
