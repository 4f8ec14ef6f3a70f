//! Integration tests for the write-through game session.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;
use trivia_leaderboard::logic::{RECENT_SPINS_CAPACITY, ROUND_LENGTH};
use trivia_leaderboard::{
    draw_question, storage, GameSession, Question, RegistryError, SessionError,
};

const CATEGORIES: [&str; 4] = ["Historia", "Ciencia", "Geografía", "Deporte"];

fn question(category: &str, prompt: &str, answer_index: usize) -> Question {
    Question::new(
        category,
        prompt,
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        answer_index,
    )
}

fn saved_names(session: &GameSession) -> Vec<String> {
    storage::try_load(session.path(), &CATEGORIES)
        .unwrap()
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

#[test]
fn open_missing_file_starts_empty_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scoreboard.json");
    let session = GameSession::open(&path, &CATEGORIES);
    assert!(session.registry().is_empty());
    assert_eq!(session.categories(), CATEGORIES);
    assert!(!path.exists());
}

#[test]
fn every_mutation_is_written_through() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scoreboard.json");
    let mut session = GameSession::open(&path, &CATEGORIES);

    let ana = session.create_player("Ana").unwrap();
    assert_eq!(saved_names(&session), ["Ana"]);

    session.create_player("Beto").unwrap();
    session.record_answer("Ana", "Historia", true).unwrap();
    let on_disk = storage::try_load(&path, &CATEGORIES).unwrap();
    assert_eq!(on_disk.read("Ana").unwrap().score(), 1);

    session.rename_player("Ana", "Zara").unwrap();
    assert_eq!(saved_names(&session), ["Beto", "Zara"]);
    let on_disk = storage::try_load(&path, &CATEGORIES).unwrap();
    assert_eq!(on_disk.read("Zara").unwrap().id(), ana.id());

    assert!(session.delete_player("Beto").unwrap());
    assert_eq!(saved_names(&session), ["Zara"]);
}

#[test]
fn failed_operations_do_not_touch_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scoreboard.json");
    let mut session = GameSession::open(&path, &CATEGORIES);
    session.create_player("Ana").unwrap();
    session.create_player("Beto").unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(
        session.create_player("Ana"),
        Err(SessionError::Registry(RegistryError::DuplicateKey(_)))
    ));
    assert!(matches!(
        session.create_player("x"),
        Err(SessionError::Registry(RegistryError::InvalidName(_)))
    ));
    assert!(matches!(
        session.rename_player("Ana", "Beto"),
        Err(SessionError::Registry(RegistryError::NameConflict(_)))
    ));
    assert!(matches!(
        session.record_answer("Zoe", "Historia", true),
        Err(SessionError::Registry(RegistryError::NotFound(_)))
    ));
    assert!(!session.delete_player("Zoe").unwrap());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn reopen_restores_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scoreboard.json");
    let mut session = GameSession::open(&path, &CATEGORIES);
    session.create_player("Ana").unwrap();
    for correct in [true, true, true, false, false] {
        session.record_answer("Ana", "Historia", correct).unwrap();
    }
    let ranking = session.ranking();
    drop(session);

    let reopened = GameSession::open(&path, &CATEGORIES);
    assert_eq!(reopened.ranking(), ranking);
    assert_eq!(reopened.ranking()[0].score, 3);
    assert_eq!(reopened.ranking()[0].answered, 5);
}

#[test]
fn corrupt_file_opens_empty_and_next_save_replaces_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scoreboard.json");
    fs::write(&path, "[{]").unwrap();

    let mut session = GameSession::open(&path, &CATEGORIES);
    assert!(session.registry().is_empty());
    session.create_player("Ana").unwrap();
    assert_eq!(saved_names(&session), ["Ana"]);
}

#[test]
fn write_failure_is_reported_but_memory_keeps_the_change() {
    let dir = TempDir::new().unwrap();
    // The leaderboard path is a directory, so the final rename cannot succeed.
    let path = dir.path().join("board");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep.txt"), "x").unwrap();

    let mut session = GameSession::open(&path, &CATEGORIES);
    let err = session.create_player("Ana").unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
    assert!(session.read_player("Ana").is_some());
}

#[test]
fn answer_question_grades_and_records() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    session.create_player("Ana").unwrap();
    let q = question("Ciencia", "H2O?", 1);

    assert!(session.answer_question("Ana", &q, 1).unwrap());
    assert!(!session.answer_question("Ana", &q, 2).unwrap());
    assert!(!session.answer_question("Ana", &q, 99).unwrap());

    let ana = session.read_player("Ana").unwrap();
    assert_eq!(ana.score(), 1);
    assert_eq!(ana.total_answered(), 3);
    assert_eq!(ana.category_stats()["Ciencia"], 1);
}

#[test]
fn round_takes_ten_answers_then_refuses_more() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.json");
    let mut session = GameSession::open(&path, &CATEGORIES);
    session.create_player("Ana").unwrap();

    assert!(matches!(
        session.record_round_answer("Ana", "Historia", true),
        Err(SessionError::NoActiveRound(_))
    ));
    assert_eq!(session.read_player("Ana").unwrap().total_answered(), 0);

    let round = session.start_round("Ana").unwrap();
    assert_eq!(round.remaining(), ROUND_LENGTH);
    for i in 0..ROUND_LENGTH {
        let round = session.record_round_answer("Ana", "Historia", i % 2 == 0).unwrap();
        assert_eq!(round.remaining(), ROUND_LENGTH - i - 1);
    }
    let round = session.round("Ana").unwrap();
    assert!(round.is_finished());
    assert_eq!(round.correct(), 5);

    let before = fs::read_to_string(&path).unwrap();
    assert!(matches!(
        session.record_round_answer("Ana", "Historia", true),
        Err(SessionError::RoundFinished(_))
    ));
    let ana = session.read_player("Ana").unwrap();
    assert_eq!(ana.total_answered(), ROUND_LENGTH as u64);
    assert_eq!(ana.score(), 5);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn restarting_a_round_resets_progress() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    session.create_player("Ana").unwrap();

    session.start_round("Ana").unwrap();
    for _ in 0..ROUND_LENGTH {
        session.record_round_answer("Ana", "Ciencia", true).unwrap();
    }
    let round = session.start_round("Ana").unwrap();
    assert_eq!(round.remaining(), ROUND_LENGTH);
    assert_eq!(round.correct(), 0);
    assert_eq!(
        session.record_round_answer("Ana", "Ciencia", false).unwrap().remaining(),
        ROUND_LENGTH - 1
    );
    // Totals keep accumulating across rounds.
    assert_eq!(session.read_player("Ana").unwrap().total_answered(), 11);
}

#[test]
fn round_errors_leave_round_untouched() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    session.create_player("Ana").unwrap();

    assert!(matches!(
        session.start_round("Zoe"),
        Err(SessionError::Registry(RegistryError::NotFound(_)))
    ));
    session.start_round("Ana").unwrap();
    assert!(matches!(
        session.record_round_answer("Ana", "Música", true),
        Err(SessionError::Registry(RegistryError::UnknownCategory(_)))
    ));
    assert_eq!(session.round("Ana").unwrap().remaining(), ROUND_LENGTH);
}

#[test]
fn round_follows_rename_and_ends_on_delete() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    session.create_player("Ana").unwrap();
    session.start_round("Ana").unwrap();
    session.record_round_answer("Ana", "Deporte", true).unwrap();

    session.rename_player("Ana", " Zara ").unwrap();
    assert!(session.round("Ana").is_none());
    assert_eq!(session.round("Zara").unwrap().remaining(), ROUND_LENGTH - 1);

    assert!(session.delete_player("Zara").unwrap());
    assert!(session.round("Zara").is_none());
    session.create_player("Zara").unwrap();
    assert!(matches!(
        session.record_round_answer("Zara", "Deporte", true),
        Err(SessionError::NoActiveRound(_))
    ));
}

#[test]
fn answer_in_round_grades_the_question() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    session.create_player("Ana").unwrap();
    session.start_round("Ana").unwrap();
    let q = question("Geografía", "Capital?", 2);

    assert!(session.answer_in_round("Ana", &q, 2).unwrap());
    assert!(!session.answer_in_round("Ana", &q, 0).unwrap());

    let round = session.round("Ana").unwrap();
    assert_eq!(round.remaining(), ROUND_LENGTH - 2);
    assert_eq!(round.correct(), 1);
    assert_eq!(session.read_player("Ana").unwrap().category_stats()["Geografía"], 1);
}

#[test]
fn spins_pick_configured_categories_and_keep_recent_window() {
    let dir = TempDir::new().unwrap();
    let mut session = GameSession::open(dir.path().join("s.json"), &CATEGORIES);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..(RECENT_SPINS_CAPACITY + 5) {
        let category = session.spin_category(&mut rng).unwrap();
        assert!(CATEGORIES.contains(&category.as_str()));
    }
    assert_eq!(session.recent_spins().count(), RECENT_SPINS_CAPACITY);
}

#[test]
fn spin_without_categories_returns_none() {
    let dir = TempDir::new().unwrap();
    let no_categories: [&str; 0] = [];
    let mut session = GameSession::open(dir.path().join("s.json"), &no_categories);
    assert!(session.spin_category(&mut StdRng::seed_from_u64(1)).is_none());
}

#[test]
fn draw_question_only_returns_requested_category() {
    let bank = vec![
        question("Historia", "h1", 0),
        question("Ciencia", "c1", 0),
        question("Historia", "h2", 1),
    ];
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..10 {
        let q = draw_question(&bank, "Historia", &mut rng).unwrap();
        assert_eq!(q.category, "Historia");
    }
    assert!(draw_question(&bank, "Deporte", &mut rng).is_none());
}
