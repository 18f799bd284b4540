//! Computer opponent: UCI engine plumbing and the fallback move picker.

pub mod opponent;
pub mod uci;

pub use opponent::{Opponent, Strength};
pub use uci::{EngineError, MoveSearch, UciEngine};
