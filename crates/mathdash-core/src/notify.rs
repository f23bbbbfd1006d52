//! Feedback events emitted by the engine
//!
//! Sound and visual feedback are the host's business; the engine only
//! announces what happened and never waits for the result.

use std::fmt;

/// Something the player should hear or see feedback for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Correct,
    Wrong,
    GameOver,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Correct => write!(f, "Correct!"),
            GameEvent::Wrong => write!(f, "Wrong!"),
            GameEvent::GameOver => write!(f, "Game Over!"),
        }
    }
}

/// Receiver for engine events. Implementations must not panic.
pub trait Notifier {
    fn notify(&self, event: GameEvent);
}

/// Writes events to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: GameEvent) {
        log::info!("Audio: {}", event);
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _event: GameEvent) {}
}
