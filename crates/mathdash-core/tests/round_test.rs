use mathdash_core::{
    Difficulty, FileSlot, GameConfig, GameMode, LeaderboardEntry, LeaderboardStore, MockRemote,
    Operator, ProblemGenerator, SessionEngine, SilentNotifier, Status,
};
use std::sync::Arc;
use std::time::Duration;

fn engine(config: GameConfig) -> SessionEngine {
    let mut engine =
        SessionEngine::with_generator(ProblemGenerator::with_seed(2024), Box::new(SilentNotifier));
    engine.configure(config).unwrap();
    engine
}

#[test]
fn test_full_ranked_round_lands_on_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(MockRemote::new());
    remote.set_available(false);
    let store = LeaderboardStore::new(
        remote.clone(),
        Box::new(FileSlot::at(dir.path().join("board.json"))),
    );

    let config = GameConfig::new([Operator::Multiply, Operator::Divide], Difficulty::Hard)
        .with_player("Ada");
    let mut engine = engine(config);
    engine.start();

    // 20 correct answers: 3x10 + 3x15 + 3x20 + 3x25 + 3x30 + 3x35 + 2x40
    for _ in 0..20 {
        let answer = engine.state().current_problem.as_ref().unwrap().answer;
        assert!(engine.check_answer(answer));
        engine.advance(Duration::from_millis(1500));
    }
    assert_eq!(engine.state().score, 485);
    assert_eq!(engine.state().streak, 20);
    assert_eq!(engine.state().time_left, 30);

    engine.advance(Duration::from_secs(30));
    assert_eq!(engine.state().status, Status::Finished);

    let entry = engine.leaderboard_entry().unwrap();
    store.submit(entry).unwrap();

    let board = store.fetch();
    assert_eq!(board[0].player_name, "Ada");
    assert_eq!(board[0].score, 485);
    assert_eq!(board[0].operation, Operator::Multiply);
    assert_eq!(remote.count(), 0);
}

#[test]
fn test_cache_survives_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let first = LeaderboardStore::local_only(Box::new(FileSlot::at(&path)));
    let seeded = first.fetch();
    assert_eq!(seeded.len(), 3);
    assert_eq!(seeded[0].player_name, "Robot-Anna");

    first
        .submit(LeaderboardEntry::new("Bo", 200, Difficulty::Easy, Operator::Add))
        .unwrap();

    let second = LeaderboardStore::local_only(Box::new(FileSlot::at(&path)));
    let board = second.fetch();
    assert_eq!(board.len(), 4);
    assert_eq!(board[0].score, 200);
    assert_eq!(board[1].score, 150);
}

#[test]
fn test_practice_round_never_expires() {
    let config = GameConfig::new(Operator::ALL, Difficulty::Easy).with_mode(GameMode::Practice);
    let mut engine = engine(config);
    engine.start();

    engine.advance(Duration::from_secs(3600));
    assert_eq!(engine.state().status, Status::Playing);
    assert_eq!(engine.state().time_left, 60);

    engine.end();
    assert_eq!(engine.state().status, Status::Finished);
    assert!(engine.leaderboard_entry().is_none());
}
