//! Core engine for the MathDash arithmetic practice game
//!
//! Two independent pieces live here:
//! - [`SessionEngine`]: round state machine, countdown timer and
//!   problem generation
//! - [`LeaderboardStore`]: high scores kept in a local cache with a
//!   best-effort remote table behind it
//!
//! Hosts (terminal, browser) own the event loop and call into both.

mod engine;
mod generator;
pub mod leaderboard;
mod notify;
mod types;

pub use engine::{points_for_streak, EngineError, SessionEngine, SessionState, Status, ROUND_SECONDS};
pub use generator::{operand_range, ProblemGenerator};
pub use leaderboard::{
    DisabledRemote, FileSlot, LeaderboardEntry, LeaderboardError, LeaderboardResult,
    LeaderboardStatus, LeaderboardStore, LocalSlot, MemorySlot, MockRemote, RemoteBackend,
    RemoteConfig, LEADERBOARD_KEY,
};
pub use notify::{GameEvent, LogNotifier, Notifier, SilentNotifier};
pub use types::{Difficulty, GameConfig, GameMode, MathProblem, Operator};
