//! Data structures for the trivia game: players, the player registry, questions.

mod player;
mod question;
mod registry;

pub use player::{PlayerEntity, PlayerId, PlayerRecord, PlayerSnapshot, HISTORY_CAPACITY};
pub use question::Question;
pub use registry::{Iter, PlayerRegistry, RegistryError};
