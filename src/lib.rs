//! A chess rules engine with a UCI-backed computer opponent.
//!
//! The [`engine`] module owns the rules: board state, move validation,
//! legal move generation and game orchestration. The [`ai`] module talks
//! to an external UCI engine and degrades to random legal moves when the
//! engine misbehaves. [`view`] provides serializable snapshots for
//! display.

pub mod ai;
pub mod config;
pub mod engine;
pub mod view;

pub use engine::{Board, ChessError, Color, Game, GameStatus, Move, Square};
