//! Trivia leaderboard: player registry, JSON persistence and game session.

pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::AppConfig;
pub use logic::{draw_question, is_valid_name, GameSession, RankingEntry, Round, SessionError};
pub use models::{
    PlayerEntity, PlayerId, PlayerRecord, PlayerRegistry, PlayerSnapshot, Question, RegistryError,
};
pub use storage::PersistenceError;
