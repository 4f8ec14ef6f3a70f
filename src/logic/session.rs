//! Game session: drives category spins and answer recording, saving after every change.

use crate::logic::ranking::RankingEntry;
use crate::models::{PlayerRecord, PlayerRegistry, Question, RegistryError};
use crate::storage::{self, PersistenceError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of recent wheel spins remembered by a session.
pub const RECENT_SPINS_CAPACITY: usize = 20;

/// Questions in one round of play.
pub const ROUND_LENGTH: usize = 10;

/// Errors surfaced to the player-facing layer.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The change was applied in memory but could not be written to disk.
    #[error("Could not save leaderboard: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Player '{0}' has no round in progress")]
    NoActiveRound(String),

    #[error("Round for '{0}' is over; start a new one")]
    RoundFinished(String),
}

/// Progress through one round of [`ROUND_LENGTH`] questions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Round {
    remaining: usize,
    correct: usize,
}

impl Round {
    fn new() -> Self {
        Self {
            remaining: ROUND_LENGTH,
            correct: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Correct answers so far in this round.
    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    fn record(&mut self, correct: bool) {
        self.remaining -= 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// Owns the registry for the lifetime of the game and writes it through to `path`.
///
/// Rounds live in memory only; reopening a session starts with none in progress.
#[derive(Debug)]
pub struct GameSession {
    registry: PlayerRegistry,
    path: PathBuf,
    recent_spins: VecDeque<String>,
    rounds: HashMap<String, Round>,
}

impl GameSession {
    /// Load the leaderboard at `path` (or start empty) for the given categories.
    pub fn open<S: AsRef<str>>(path: impl Into<PathBuf>, categories: &[S]) -> Self {
        let path = path.into();
        let registry = storage::load(&path, categories);
        Self::with_registry(registry, path)
    }

    /// Wrap an existing registry. Nothing is written until the first change.
    pub fn with_registry(registry: PlayerRegistry, path: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            path: path.into(),
            recent_spins: VecDeque::with_capacity(RECENT_SPINS_CAPACITY),
            rounds: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn categories(&self) -> &[String] {
        self.registry.categories()
    }

    /// Register a new player and save.
    pub fn create_player(&mut self, name: &str) -> Result<PlayerRecord, SessionError> {
        let record = self.registry.create_player(name)?.clone();
        self.persist()?;
        log::info!("Created player '{}'", record.name());
        Ok(record)
    }

    pub fn read_player(&self, name: &str) -> Option<&PlayerRecord> {
        self.registry.read(name)
    }

    /// Rename a player and save. A conflict leaves both the registry and the file untouched.
    /// A round in progress follows the player to the new name.
    pub fn rename_player(&mut self, old_name: &str, new_name: &str) -> Result<(), SessionError> {
        self.registry.rename(old_name, new_name)?;
        if let Some(round) = self.rounds.remove(old_name.trim()) {
            self.rounds.insert(new_name.trim().to_string(), round);
        }
        self.persist()?;
        Ok(())
    }

    /// Delete a player, dropping any round in progress. Saves only when something was removed.
    pub fn delete_player(&mut self, name: &str) -> Result<bool, SessionError> {
        if !self.registry.delete(name) {
            return Ok(false);
        }
        self.rounds.remove(name);
        self.persist()?;
        log::info!("Deleted player '{}'", name);
        Ok(true)
    }

    /// Record one answer and save.
    pub fn record_answer(
        &mut self,
        name: &str,
        category: &str,
        correct: bool,
    ) -> Result<(), SessionError> {
        self.registry.record_answer(name, category, correct)?;
        self.persist()?;
        Ok(())
    }

    /// Grade `choice` against `question`, record it, and return whether it was right.
    pub fn answer_question(
        &mut self,
        name: &str,
        question: &Question,
        choice: usize,
    ) -> Result<bool, SessionError> {
        let correct = question.is_correct(choice);
        self.record_answer(name, &question.category, correct)?;
        Ok(correct)
    }

    /// Start a fresh round of [`ROUND_LENGTH`] questions, replacing any round in progress.
    pub fn start_round(&mut self, name: &str) -> Result<Round, SessionError> {
        if !self.registry.contains(name) {
            return Err(RegistryError::NotFound(name.to_string()).into());
        }
        let round = Round::new();
        self.rounds.insert(name.to_string(), round);
        log::info!("Started a round of {} questions for '{}'", ROUND_LENGTH, name);
        Ok(round)
    }

    pub fn round(&self, name: &str) -> Option<Round> {
        self.rounds.get(name).copied()
    }

    /// Record one answer against the player's current round and save.
    ///
    /// Fails before touching the registry when no round was started or all of its questions
    /// have been answered.
    pub fn record_round_answer(
        &mut self,
        name: &str,
        category: &str,
        correct: bool,
    ) -> Result<Round, SessionError> {
        let round = match self.rounds.get_mut(name) {
            None => return Err(SessionError::NoActiveRound(name.to_string())),
            Some(round) if round.is_finished() => {
                return Err(SessionError::RoundFinished(name.to_string()))
            }
            Some(round) => round,
        };
        self.registry.record_answer(name, category, correct)?;
        round.record(correct);
        let round = *round;
        if round.is_finished() {
            log::info!(
                "Round finished for '{}': {}/{} correct",
                name,
                round.correct(),
                ROUND_LENGTH
            );
        }
        self.persist()?;
        Ok(round)
    }

    /// Grade `choice` against `question` and record it in the player's current round.
    pub fn answer_in_round(
        &mut self,
        name: &str,
        question: &Question,
        choice: usize,
    ) -> Result<bool, SessionError> {
        let correct = question.is_correct(choice);
        self.record_round_answer(name, &question.category, correct)?;
        Ok(correct)
    }

    pub fn ranking(&self) -> Vec<RankingEntry> {
        self.registry.ranking()
    }

    /// Spin the category wheel: uniform pick among the configured categories.
    /// Returns None when no categories are configured.
    pub fn spin_category<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        let category = self.registry.categories().choose(rng)?.clone();
        if self.recent_spins.len() == RECENT_SPINS_CAPACITY {
            self.recent_spins.pop_front();
        }
        self.recent_spins.push_back(category.clone());
        Some(category)
    }

    /// Categories from the latest spins, oldest first.
    pub fn recent_spins(&self) -> impl Iterator<Item = &str> + '_ {
        self.recent_spins.iter().map(String::as_str)
    }

    /// Write the current registry to disk.
    pub fn save(&self) -> Result<(), SessionError> {
        self.persist()?;
        Ok(())
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        storage::save(&self.registry, &self.path).map_err(|e| {
            log::error!("Failed to save leaderboard to {}: {}", self.path.display(), e);
            e
        })
    }
}

/// Pick a random question of `category` from the bank.
pub fn draw_question<'q, R: Rng + ?Sized>(
    questions: &'q [Question],
    category: &str,
    rng: &mut R,
) -> Option<&'q Question> {
    let candidates: Vec<&Question> = questions
        .iter()
        .filter(|q| q.category == category)
        .collect();
    candidates.choose(rng).copied()
}
