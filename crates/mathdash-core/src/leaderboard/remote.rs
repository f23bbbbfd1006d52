use super::{sort_by_score, LeaderboardEntry, LeaderboardError, LeaderboardResult};
use std::sync::{Arc, Mutex};

/// Shared remote leaderboard table
pub trait RemoteBackend: Send + Sync {
    /// Top rows ordered by score, highest first
    fn fetch_top(&self, limit: usize) -> LeaderboardResult<Vec<LeaderboardEntry>>;

    /// Append one row
    fn insert(&self, entry: &LeaderboardEntry) -> LeaderboardResult<()>;

    /// Whether this backend can ever succeed
    fn is_configured(&self) -> bool {
        true
    }

    /// Backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Configuration for the remote table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: "leaderboard".to_string(),
            timeout_secs: 10,
        }
    }

    /// Read `MATHDASH_REMOTE_*` variables. `None` unless both URL and key are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = non_empty("MATHDASH_REMOTE_URL")?;
        let key = non_empty("MATHDASH_REMOTE_KEY")?;
        let mut config = Self::new(&url, &key);

        if let Some(table) = non_empty("MATHDASH_REMOTE_TABLE") {
            config.table = table;
        }
        if let Some(timeout) = non_empty("MATHDASH_REMOTE_TIMEOUT").and_then(|t| t.parse().ok()) {
            config.timeout_secs = timeout;
        }
        Some(config)
    }
}

/// Pick the remote backend for a configuration
pub fn create_remote(config: Option<RemoteConfig>) -> Arc<dyn RemoteBackend> {
    match config {
        #[cfg(feature = "remote")]
        Some(config) => match super::RestRemote::new(config) {
            Ok(remote) => Arc::new(remote),
            Err(e) => {
                log::warn!("remote leaderboard unavailable: {}", e);
                Arc::new(DisabledRemote)
            }
        },
        #[cfg(not(feature = "remote"))]
        Some(_) => {
            log::warn!("remote leaderboard configured but built without the `remote` feature");
            Arc::new(DisabledRemote)
        }
        None => Arc::new(DisabledRemote),
    }
}

// ==================== Disabled Backend ====================

/// Stand-in when no remote table is configured. Fails fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRemote;

impl RemoteBackend for DisabledRemote {
    fn fetch_top(&self, _limit: usize) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        Err(LeaderboardError::NotConfigured)
    }

    fn insert(&self, _entry: &LeaderboardEntry) -> LeaderboardResult<()> {
        Err(LeaderboardError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "Disabled"
    }
}

// ==================== Mock Backend for Testing ====================

/// In-memory remote table for testing
pub struct MockRemote {
    data: Mutex<Vec<LeaderboardEntry>>,
    available: Mutex<bool>,
    next_id: Mutex<u64>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
            available: Mutex::new(true),
            next_id: Mutex::new(1),
        }
    }

    /// Simulate the table going up or down
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap_or_else(|e| e.into_inner()) = available;
    }

    /// Number of stored rows
    pub fn count(&self) -> usize {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn check_available(&self) -> LeaderboardResult<()> {
        if *self.available.lock().unwrap_or_else(|e| e.into_inner()) {
            Ok(())
        } else {
            Err(LeaderboardError::Network("Mock unavailable".into()))
        }
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteBackend for MockRemote {
    fn fetch_top(&self, limit: usize) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        self.check_available()?;

        let mut rows = self.data.lock().unwrap_or_else(|e| e.into_inner()).clone();
        sort_by_score(&mut rows);
        rows.truncate(limit);
        Ok(rows)
    }

    fn insert(&self, entry: &LeaderboardEntry) -> LeaderboardResult<()> {
        self.check_available()?;

        let mut next_id = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        let mut row = entry.clone();
        row.id = Some(next_id.to_string());
        *next_id += 1;

        self.data.lock().unwrap_or_else(|e| e.into_inner()).push(row);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Mock"
    }
}
