//! High-score persistence
//!
//! Two cooperating backends:
//! - Local: a single key/value slot holding the whole board as JSON.
//!   Always written first so the player sees their score immediately.
//! - Remote: a shared table, best-effort. Failures are logged and the
//!   local board is used instead.

mod local;
mod remote;
#[cfg(feature = "remote")]
mod rest;

pub use local::{FileSlot, LocalSlot, MaybeSendSync, MemorySlot, LEADERBOARD_KEY};
pub use remote::{create_remote, DisabledRemote, MockRemote, RemoteBackend, RemoteConfig};
#[cfg(feature = "remote")]
pub use rest::RestRemote;

use crate::types::{Difficulty, Operator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Entries returned by [`LeaderboardStore::fetch`]
pub const FETCH_LIMIT: usize = 10;
/// Entries kept in the local cache
pub const LOCAL_CAPACITY: usize = 50;

/// One row on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Assigned by the remote table
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "id_from_string_or_number"
    )]
    pub id: Option<String>,
    pub player_name: String,
    pub score: u64,
    pub difficulty: Difficulty,
    pub operation: Operator,
    /// Set when the entry is submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    pub fn new(player_name: &str, score: u64, difficulty: Difficulty, operation: Operator) -> Self {
        Self {
            id: None,
            player_name: player_name.to_string(),
            score,
            difficulty,
            operation,
            created_at: None,
        }
    }

    fn stamped(&self, at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(at),
            ..self.clone()
        }
    }
}

// remote tables use either uuid strings or bigint ids
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// Placeholder rows written to an empty local board
pub fn seed_entries() -> Vec<LeaderboardEntry> {
    vec![
        LeaderboardEntry::new("Robot-Anna", 150, Difficulty::Hard, Operator::Multiply),
        LeaderboardEntry::new("Robot-Erik", 120, Difficulty::Medium, Operator::Add),
        LeaderboardEntry::new("Robot-Lars", 90, Difficulty::Easy, Operator::Subtract),
    ]
}

/// Highest score first; ties keep insertion order
fn sort_by_score(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Result type for leaderboard operations
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// Errors that can occur during leaderboard operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Remote leaderboard not configured")]
    NotConfigured,
}

/// Backends currently in use, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardStatus {
    pub remote_backend: &'static str,
    pub local_backend: &'static str,
    pub remote_configured: bool,
}

/// Leaderboard with a local cache in front of a best-effort remote table
pub struct LeaderboardStore {
    remote: Arc<dyn RemoteBackend>,
    local: Box<dyn LocalSlot>,
    /// Serializes read-modify-write cycles on the local slot across threads
    local_lock: Mutex<()>,
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore")
            .field("remote", &self.remote.backend_name())
            .field("local", &self.local.slot_name())
            .finish()
    }
}

impl LeaderboardStore {
    pub fn new(remote: Arc<dyn RemoteBackend>, local: Box<dyn LocalSlot>) -> Self {
        Self {
            remote,
            local,
            local_lock: Mutex::new(()),
        }
    }

    /// Remote chosen from the environment, local board on disk
    pub fn auto() -> Self {
        Self::new(create_remote(RemoteConfig::from_env()), Box::new(FileSlot::new()))
    }

    /// Only the local slot, no remote table
    pub fn local_only(local: Box<dyn LocalSlot>) -> Self {
        Self::new(Arc::new(DisabledRemote), local)
    }

    /// Top entries, highest score first. Never fails.
    pub fn fetch(&self) -> Vec<LeaderboardEntry> {
        match self.remote.fetch_top(FETCH_LIMIT) {
            Ok(mut entries) => {
                entries.truncate(FETCH_LIMIT);
                return entries;
            }
            Err(LeaderboardError::NotConfigured) => {
                log::debug!("remote leaderboard not configured, using local");
            }
            Err(e) => {
                log::error!(
                    "Error fetching from {}, falling back to local: {}",
                    self.remote.backend_name(),
                    e
                );
            }
        }

        self.fetch_local()
    }

    /// Record a score locally, then offer it to the remote table.
    ///
    /// Only a failed local write is reported; remote failures are logged.
    pub fn submit(&self, entry: LeaderboardEntry) -> LeaderboardResult<()> {
        let local_result = self.append_local(entry.stamped(Utc::now()));
        if let Err(ref e) = local_result {
            log::error!("Error saving score locally: {}", e);
        }

        match self.remote.insert(&entry) {
            Ok(()) => log::info!(
                "score {} for {} sent to {}",
                entry.score,
                entry.player_name,
                self.remote.backend_name()
            ),
            Err(LeaderboardError::NotConfigured) => {}
            Err(e) => log::error!(
                "Error submitting score to {}: {}",
                self.remote.backend_name(),
                e
            ),
        }

        local_result
    }

    pub fn status(&self) -> LeaderboardStatus {
        LeaderboardStatus {
            remote_backend: self.remote.backend_name(),
            local_backend: self.local.slot_name(),
            remote_configured: self.remote.is_configured(),
        }
    }

    fn fetch_local(&self) -> Vec<LeaderboardEntry> {
        let _guard = self.local_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut entries = self.load_local();
        if entries.is_empty() {
            let seed = seed_entries();
            if let Err(e) = self.save_local(&seed) {
                log::warn!("could not persist seed leaderboard: {}", e);
            }
            return seed;
        }

        sort_by_score(&mut entries);
        entries.truncate(FETCH_LIMIT);
        entries
    }

    fn append_local(&self, entry: LeaderboardEntry) -> LeaderboardResult<()> {
        let _guard = self.local_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut entries = self.load_local();
        entries.push(entry);
        sort_by_score(&mut entries);
        entries.truncate(LOCAL_CAPACITY);
        self.save_local(&entries)
    }

    fn load_local(&self) -> Vec<LeaderboardEntry> {
        let Some(json) = self.local.read() else {
            return Vec::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("discarding unreadable local leaderboard: {}", e);
            Vec::new()
        })
    }

    fn save_local(&self, entries: &[LeaderboardEntry]) -> LeaderboardResult<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| LeaderboardError::Storage(e.to_string()))?;
        self.local.write(&json)
    }
}
