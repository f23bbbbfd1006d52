//! Round state machine
//!
//! ```text
//! idle ──start──▶ playing ──end / timer──▶ finished
//!   ▲               │  ▲                      │
//!   └────reset──────┴──┴────────start─────────┘
//! ```
//!
//! The engine owns its countdown. Hosts feed wall-clock time in through
//! [`SessionEngine::advance`] (or call [`SessionEngine::tick`] from their
//! own one-second interval); nothing runs in the background.

use crate::generator::ProblemGenerator;
use crate::leaderboard::LeaderboardEntry;
use crate::notify::{GameEvent, LogNotifier, Notifier};
use crate::types::{GameConfig, MathProblem};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Length of a ranked round in seconds
pub const ROUND_SECONDS: u32 = 60;

/// Base points for a correct answer
const BASE_POINTS: u32 = 10;
/// Extra points per completed block of streak answers
const STREAK_BONUS: u32 = 5;
/// Streak answers needed per bonus step
const STREAK_STEP: u32 = 3;

const TICK: Duration = Duration::from_secs(1);

/// Where the round is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Playing,
    Finished,
}

/// Snapshot of the round, read by hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: Status,
    pub score: u32,
    pub time_left: u32,
    pub current_problem: Option<MathProblem>,
    pub streak: u32,
    pub skips_used: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            score: 0,
            time_left: ROUND_SECONDS,
            current_problem: None,
            streak: 0,
            skips_used: 0,
        }
    }
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    /// Format the remaining time as MM:SS
    pub fn time_left_string(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }
}

/// Errors from engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("configuration cannot change while a round is playing")]
    ConfigLocked,
    #[error("at least one operator must be selected")]
    NoOperators,
}

/// Countdown that converts elapsed time into whole-second ticks
#[derive(Debug, Clone, Default)]
struct RoundTimer {
    carried: Duration,
}

impl RoundTimer {
    /// Add elapsed time, returning how many ticks are due
    fn advance(&mut self, elapsed: Duration) -> u32 {
        self.carried += elapsed;
        let mut due = 0;
        while self.carried >= TICK {
            self.carried -= TICK;
            due += 1;
        }
        due
    }
}

/// Points awarded for a correct answer given the streak before it
pub fn points_for_streak(streak: u32) -> u32 {
    BASE_POINTS + (streak / STREAK_STEP) * STREAK_BONUS
}

/// Owns configuration, round state, the round timer and the generator
pub struct SessionEngine {
    config: GameConfig,
    state: SessionState,
    timer: Option<RoundTimer>,
    generator: ProblemGenerator,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("timer_active", &self.timer.is_some())
            .finish()
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(Box::new(LogNotifier))
    }
}

impl SessionEngine {
    /// Create an idle engine with the default configuration
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self::with_generator(ProblemGenerator::new(), notifier)
    }

    /// Create an engine with a specific generator (seeded in tests)
    pub fn with_generator(generator: ProblemGenerator, notifier: Box<dyn Notifier>) -> Self {
        Self {
            config: GameConfig::default(),
            state: SessionState::default(),
            timer: None,
            generator,
            notifier,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a countdown is currently installed
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Replace the configuration between rounds
    pub fn configure(&mut self, config: GameConfig) -> Result<(), EngineError> {
        if self.state.is_playing() {
            return Err(EngineError::ConfigLocked);
        }
        if config.operators.is_empty() {
            return Err(EngineError::NoOperators);
        }
        log::debug!("configured: {:?}", config);
        self.config = config;
        Ok(())
    }

    /// Start (or restart) a round
    pub fn start(&mut self) {
        self.cancel_timer();

        self.state = SessionState {
            status: Status::Playing,
            current_problem: Some(self.generator.generate(&self.config)),
            ..SessionState::default()
        };

        if self.config.is_ranked() {
            self.timer = Some(RoundTimer::default());
        }

        log::info!(
            "round started: mode={:?} difficulty={} operators={:?}",
            self.config.mode,
            self.config.difficulty,
            self.config.operators
        );
    }

    /// Finish the round. Does nothing unless a round is playing.
    pub fn end(&mut self) {
        self.cancel_timer();
        if !self.state.is_playing() {
            return;
        }

        self.state.status = Status::Finished;
        log::info!("round finished: score={}", self.state.score);
        self.notifier.notify(GameEvent::GameOver);
    }

    /// Return to idle, clearing all round state
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.state = SessionState::default();
    }

    /// Check an answer against the current problem
    pub fn check_answer(&mut self, input: i64) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(problem) = self.state.current_problem.as_ref() else {
            return false;
        };

        let ranked = self.config.is_ranked();
        if input == problem.answer {
            if ranked {
                self.state.score += points_for_streak(self.state.streak);
                self.state.streak += 1;
            }
            self.notifier.notify(GameEvent::Correct);
            self.state.current_problem = Some(self.generator.generate(&self.config));
            true
        } else {
            if ranked {
                self.state.streak = 0;
            }
            self.notifier.notify(GameEvent::Wrong);
            false
        }
    }

    /// Swap the current problem for a new one
    pub fn skip(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        self.state.skips_used += 1;
        if self.config.is_ranked() {
            self.state.streak = 0;
        }
        self.state.current_problem = Some(self.generator.generate(&self.config));
        true
    }

    /// Fire one timer tick. Ignored when no countdown is running.
    pub fn tick(&mut self) {
        if self.timer.is_none() {
            return;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        log::debug!("tick: {}s left", self.state.time_left);
        if self.state.time_left == 0 {
            self.end();
        }
    }

    /// Feed elapsed wall-clock time; fires every whole second that passed
    pub fn advance(&mut self, elapsed: Duration) {
        let due = match self.timer.as_mut() {
            Some(timer) => timer.advance(elapsed),
            None => return,
        };
        for _ in 0..due {
            if self.timer.is_none() {
                break;
            }
            self.tick();
        }
    }

    /// Leaderboard entry for a finished ranked round
    pub fn leaderboard_entry(&self) -> Option<LeaderboardEntry> {
        if self.state.status != Status::Finished || !self.config.is_ranked() {
            return None;
        }
        Some(LeaderboardEntry::new(
            &self.config.player_name,
            self.state.score as u64,
            self.config.difficulty,
            self.config.primary_operator(),
        ))
    }

    fn cancel_timer(&mut self) {
        if self.timer.take().is_some() {
            log::debug!("round timer cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, GameMode, Operator};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

    impl Notifier for Recorder {
        fn notify(&self, event: GameEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    impl Recorder {
        fn events(&self) -> Vec<GameEvent> {
            self.0.borrow().clone()
        }
    }

    fn engine_with(config: GameConfig) -> (SessionEngine, Recorder) {
        let recorder = Recorder::default();
        let mut engine =
            SessionEngine::with_generator(ProblemGenerator::with_seed(42), Box::new(recorder.clone()));
        engine.configure(config).unwrap();
        (engine, recorder)
    }

    fn ranked() -> GameConfig {
        GameConfig::new([Operator::Add, Operator::Multiply], Difficulty::Medium)
    }

    fn practice() -> GameConfig {
        ranked().with_mode(GameMode::Practice)
    }

    fn answer(engine: &SessionEngine) -> i64 {
        engine.state().current_problem.as_ref().unwrap().answer
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = SessionEngine::default();
        let state = engine.state();
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.time_left, ROUND_SECONDS);
        assert!(state.current_problem.is_none());
        assert!(!engine.is_timer_running());
    }

    #[test]
    fn test_start_resets_round() {
        let (mut engine, _) = engine_with(ranked());
        engine.start();
        let expected = answer(&engine);
        assert!(engine.check_answer(expected));
        engine.skip();

        engine.start();
        let state = engine.state();
        assert_eq!(state.status, Status::Playing);
        assert!(state.current_problem.is_some());
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.skips_used, 0);
        assert_eq!(state.time_left, ROUND_SECONDS);
        assert!(engine.is_timer_running());
    }

    #[test]
    fn test_correct_answer_scores_with_streak_bonus() {
        let (mut engine, recorder) = engine_with(ranked());
        engine.start();

        let mut expected_score = 0;
        for old_streak in 0..7 {
            let score_before = engine.state().score;
            assert!(engine.check_answer(answer(&engine)));

            let gained = engine.state().score - score_before;
            assert_eq!(gained, 10 + (old_streak / 3) * 5);
            expected_score += gained;
            assert_eq!(engine.state().streak, old_streak + 1);
            assert!(engine.state().current_problem.is_some());
        }
        // 10+10+10+15+15+15+20
        assert_eq!(expected_score, 95);
        assert_eq!(engine.state().score, 95);
        assert_eq!(recorder.events(), vec![GameEvent::Correct; 7]);
    }

    /// Every correct answer installs the next problem from the generator
    fn assert_correct_answers_advance(config: GameConfig) {
        let (mut engine, _) = engine_with(config);
        let mut twin = ProblemGenerator::with_seed(42);
        let config = engine.config().clone();

        engine.start();
        assert_eq!(engine.state().current_problem, Some(twin.generate(&config)));

        for _ in 0..5 {
            assert!(engine.check_answer(answer(&engine)));
            assert_eq!(engine.state().current_problem, Some(twin.generate(&config)));
        }
    }

    #[test]
    fn test_correct_answer_replaces_problem_ranked() {
        assert_correct_answers_advance(ranked());
    }

    #[test]
    fn test_correct_answer_replaces_problem_practice() {
        assert_correct_answers_advance(practice());
    }

    #[test]
    fn test_wrong_answer_keeps_problem_and_breaks_streak() {
        let (mut engine, recorder) = engine_with(ranked());
        engine.start();
        assert!(engine.check_answer(answer(&engine)));
        assert!(engine.check_answer(answer(&engine)));
        assert_eq!(engine.state().streak, 2);

        let before = engine.state().current_problem.clone();
        let score = engine.state().score;
        assert!(!engine.check_answer(answer(&engine) + 1));

        assert_eq!(engine.state().streak, 0);
        assert_eq!(engine.state().score, score);
        assert_eq!(engine.state().current_problem, before);
        assert_eq!(recorder.events().last(), Some(&GameEvent::Wrong));
    }

    #[test]
    fn test_check_answer_without_problem() {
        let (mut engine, recorder) = engine_with(ranked());
        assert!(!engine.check_answer(0));
        assert_eq!(engine.state().status, Status::Idle);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_sixty_ticks_finish_ranked_round() {
        let (mut engine, recorder) = engine_with(ranked());
        engine.start();
        let last_problem = engine.state().current_problem.clone();

        for _ in 0..59 {
            engine.tick();
        }
        assert_eq!(engine.state().status, Status::Playing);
        assert_eq!(engine.state().time_left, 1);

        engine.tick();
        assert_eq!(engine.state().status, Status::Finished);
        assert_eq!(engine.state().time_left, 0);
        assert_eq!(engine.state().current_problem, last_problem);
        assert!(!engine.is_timer_running());
        assert_eq!(recorder.events(), vec![GameEvent::GameOver]);

        // further ticks are ignored
        engine.tick();
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn test_advance_converts_elapsed_time() {
        let (mut engine, _) = engine_with(ranked());
        engine.start();

        engine.advance(Duration::from_millis(400));
        assert_eq!(engine.state().time_left, 60);
        engine.advance(Duration::from_millis(700));
        assert_eq!(engine.state().time_left, 59);
        engine.advance(Duration::from_millis(2900));
        assert_eq!(engine.state().time_left, 56);

        engine.advance(Duration::from_secs(600));
        assert_eq!(engine.state().status, Status::Finished);
        assert_eq!(engine.state().time_left, 0);
    }

    #[test]
    fn test_restart_replaces_timer() {
        let (mut engine, _) = engine_with(ranked());
        engine.start();
        engine.advance(Duration::from_millis(900));
        engine.start();

        // carried time from the old timer must not leak into the new one
        engine.advance(Duration::from_millis(200));
        assert_eq!(engine.state().time_left, 60);
        engine.tick();
        assert_eq!(engine.state().time_left, 59);
    }

    #[test]
    fn test_practice_mode_has_no_bookkeeping() {
        let (mut engine, recorder) = engine_with(practice());
        engine.start();
        assert!(!engine.is_timer_running());

        let before = engine.state().current_problem.clone();
        assert!(!engine.check_answer(answer(&engine) + 1));
        assert_eq!(engine.state().current_problem, before);

        assert!(engine.check_answer(answer(&engine)));
        assert!(engine.check_answer(answer(&engine)));
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().streak, 0);

        engine.advance(Duration::from_secs(120));
        engine.tick();
        assert_eq!(engine.state().time_left, ROUND_SECONDS);
        assert_eq!(engine.state().status, Status::Playing);
        assert_eq!(
            recorder.events(),
            vec![GameEvent::Wrong, GameEvent::Correct, GameEvent::Correct]
        );
    }

    #[test]
    fn test_end_is_idempotent() {
        let (mut engine, recorder) = engine_with(ranked());
        engine.end();
        assert_eq!(engine.state().status, Status::Idle);

        engine.start();
        engine.end();
        engine.end();
        assert_eq!(engine.state().status, Status::Finished);
        assert!(engine.state().current_problem.is_some());
        assert!(!engine.is_timer_running());
        assert_eq!(recorder.events(), vec![GameEvent::GameOver]);
        assert!(!engine.check_answer(0));
    }

    #[test]
    fn test_reset_from_any_state() {
        let (mut engine, recorder) = engine_with(ranked());

        engine.reset();
        assert_eq!(*engine.state(), SessionState::default());

        engine.start();
        assert!(engine.check_answer(answer(&engine)));
        engine.tick();
        engine.reset();
        assert_eq!(*engine.state(), SessionState::default());
        assert!(!engine.is_timer_running());

        engine.start();
        engine.end();
        engine.reset();
        let state = engine.state();
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.time_left, 60);
        assert!(state.current_problem.is_none());
        // reset is silent
        assert_eq!(
            recorder.events(),
            vec![GameEvent::Correct, GameEvent::GameOver]
        );
    }

    #[test]
    fn test_skip_counts_and_resets_streak() {
        let (mut engine, recorder) = engine_with(ranked());
        assert!(!engine.skip());

        engine.start();
        assert!(engine.check_answer(answer(&engine)));
        assert!(engine.skip());
        assert!(engine.skip());
        assert_eq!(engine.state().skips_used, 2);
        assert_eq!(engine.state().streak, 0);
        assert_eq!(engine.state().score, 10);
        assert_eq!(recorder.events(), vec![GameEvent::Correct]);
    }

    #[test]
    fn test_configure_rules() {
        let (mut engine, _) = engine_with(ranked());
        let empty = GameConfig {
            operators: Vec::new(),
            ..Default::default()
        };
        assert_eq!(engine.configure(empty), Err(EngineError::NoOperators));

        engine.start();
        let hard = GameConfig::new([Operator::Divide], Difficulty::Hard);
        assert_eq!(engine.configure(hard.clone()), Err(EngineError::ConfigLocked));
        assert_eq!(engine.config().difficulty, Difficulty::Medium);

        engine.end();
        assert!(engine.configure(hard).is_ok());
        assert_eq!(engine.config().operators, vec![Operator::Divide]);
    }

    #[test]
    fn test_leaderboard_entry_only_for_finished_ranked() {
        let (mut engine, _) = engine_with(ranked().with_player("Ada"));
        engine.start();
        assert!(engine.leaderboard_entry().is_none());
        assert!(engine.check_answer(answer(&engine)));
        engine.end();

        let entry = engine.leaderboard_entry().unwrap();
        assert_eq!(entry.player_name, "Ada");
        assert_eq!(entry.score, 10);
        assert_eq!(entry.difficulty, Difficulty::Medium);
        assert_eq!(entry.operation, Operator::Add);
        assert!(entry.created_at.is_none());

        let (mut practice_engine, _) = engine_with(practice());
        practice_engine.start();
        practice_engine.end();
        assert!(practice_engine.leaderboard_entry().is_none());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = SessionState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "idle");
        assert_eq!(json["timeLeft"], 60);
        assert!(json["currentProblem"].is_null());
        assert_eq!(json["skipsUsed"], 0);
    }
}
