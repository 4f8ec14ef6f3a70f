//! Game logic: name validation, ranking, and the write-through game session.

mod ranking;
mod session;
pub(crate) mod validation;

pub use ranking::RankingEntry;
pub use session::{
    draw_question, GameSession, Round, SessionError, RECENT_SPINS_CAPACITY, ROUND_LENGTH,
};
pub use validation::{is_valid_name, MAX_NAME_LEN, MIN_NAME_LEN};
