use super::{LeaderboardError, LeaderboardResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Storage key of the local board
pub const LEADERBOARD_KEY: &str = "math_game_leaderboard";

/// Thread-safety required of slots. Native stores are shared across
/// threads; browser storage handles are not `Send`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

/// A single durable key/value slot holding the serialized board
pub trait LocalSlot: MaybeSendSync {
    /// Current contents, `None` if never written
    fn read(&self) -> Option<String>;

    /// Replace the contents
    fn write(&self, contents: &str) -> LeaderboardResult<()>;

    /// Slot name for display
    fn slot_name(&self) -> &'static str;
}

// ==================== File Slot ====================

/// JSON file in the user's local data directory
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdash")
            .join(format!("{LEADERBOARD_KEY}.json"));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Default for FileSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSlot for FileSlot {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&self, contents: &str) -> LeaderboardResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LeaderboardError::Storage(e.to_string()))?;
        }
        std::fs::write(&self.path, contents).map_err(|e| LeaderboardError::Storage(e.to_string()))
    }

    fn slot_name(&self) -> &'static str {
        "File"
    }
}

// ==================== Memory Slot ====================

/// In-memory slot. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }
}

impl LocalSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn write(&self, contents: &str) -> LeaderboardResult<()> {
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        Ok(())
    }

    fn slot_name(&self) -> &'static str {
        "Memory"
    }
}
