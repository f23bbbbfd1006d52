use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use mathdash_core::{
    GameConfig, LeaderboardEntry, LeaderboardStore, LogNotifier, SessionEngine, Status,
};
use std::time::Duration;

/// Ticks a feedback message stays on screen (~1.5s at 100ms)
const MESSAGE_TICKS: u32 = 15;
/// Longest answer the input line accepts
const MAX_INPUT_LEN: usize = 6;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Waiting for the player to start
    Ready,
    /// Round in progress
    Playing,
    /// Round over, score and rankings shown
    Results,
    /// Leaderboard screen
    Leaderboard,
}

/// Tone of the feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Good,
    Bad,
}

/// The main application state
pub struct App {
    /// Round engine
    pub engine: SessionEngine,
    /// High scores
    pub store: LeaderboardStore,
    /// Color theme
    pub theme: Theme,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Digits typed for the current answer
    pub input: String,
    /// Message to display
    pub message: Option<(String, MessageKind)>,
    /// Message timer
    message_timer: u32,
    /// Last fetched rankings
    pub board: Vec<LeaderboardEntry>,
    /// Whether the finished round has been submitted (to avoid double submits)
    round_recorded: bool,
}

impl App {
    pub fn new(config: GameConfig, store: LeaderboardStore, theme: Theme) -> Self {
        let mut engine = SessionEngine::new(Box::new(LogNotifier));
        if let Err(e) = engine.configure(config) {
            log::warn!("invalid configuration, using defaults: {}", e);
        }

        Self {
            engine,
            store,
            theme,
            screen_state: ScreenState::Ready,
            input: String::new(),
            message: None,
            message_timer: 0,
            board: Vec::new(),
            round_recorded: false,
        }
    }

    /// Get the tick rate
    pub fn get_tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Feed elapsed time to the round and expire messages (called every tick)
    pub fn tick(&mut self, elapsed: Duration) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        self.engine.advance(elapsed);

        if self.screen_state == ScreenState::Playing
            && self.engine.state().status == Status::Finished
        {
            self.finish_round();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str, kind: MessageKind) {
        self.message = Some((msg.to_string(), kind));
        self.message_timer = MESSAGE_TICKS;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Playing => self.handle_playing_key(key),
            ScreenState::Ready | ScreenState::Results => self.handle_idle_key(key),
            ScreenState::Leaderboard => self.handle_leaderboard_key(key),
        }
    }

    fn handle_playing_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.input.len() < MAX_INPUT_LEN {
                    self.input.push(c);
                }
            }
            KeyCode::Char('-') if self.input.is_empty() => self.input.push('-'),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit_answer(),
            KeyCode::Tab => {
                if self.engine.skip() {
                    self.input.clear();
                    self.show_message("Skipped", MessageKind::Info);
                }
            }
            KeyCode::Esc => {
                self.engine.end();
                self.finish_round();
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_idle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => self.start_round(),
            KeyCode::Char('b') => self.open_leaderboard(),
            KeyCode::Char('r') => {
                self.engine.reset();
                self.screen_state = ScreenState::Ready;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => self.start_round(),
            _ => {
                self.screen_state = if self.engine.state().status == Status::Finished {
                    ScreenState::Results
                } else {
                    ScreenState::Ready
                };
            }
        }
        AppAction::Continue
    }

    fn start_round(&mut self) {
        self.engine.start();
        self.input.clear();
        self.round_recorded = false;
        self.message = None;
        self.screen_state = ScreenState::Playing;
    }

    fn submit_answer(&mut self) {
        let Ok(value) = self.input.parse::<i64>() else {
            return;
        };
        self.input.clear();

        if self.engine.check_answer(value) {
            self.show_message("Correct!", MessageKind::Good);
        } else {
            self.show_message("Try again", MessageKind::Bad);
        }
    }

    fn open_leaderboard(&mut self) {
        self.board = self.store.fetch();
        self.screen_state = ScreenState::Leaderboard;
    }

    /// Submit the finished round once and refresh the rankings
    fn finish_round(&mut self) {
        self.screen_state = ScreenState::Results;
        self.input.clear();
        if self.round_recorded {
            return;
        }
        self.round_recorded = true;

        if let Some(entry) = self.engine.leaderboard_entry() {
            if let Err(e) = self.store.submit(entry) {
                self.show_message(&format!("Score not saved: {}", e), MessageKind::Bad);
            }
        }
        self.board = self.store.fetch();
    }
}
