//! The computer opponent.
//!
//! [`Opponent`] wraps a [`MoveSearch`] backend and turns its replies into
//! applied game moves. The engine's output is never trusted: a reply that
//! is malformed, illegal in the current position, absent or preceded by an
//! engine error all degrade to a uniformly random legal move, so the game
//! keeps going whatever the engine does.

use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::{debug, warn};

use crate::ai::uci::{EngineError, MoveSearch, UciEngine};
use crate::engine::game::{Game, MoveOutcome};
use crate::engine::types::{ChessError, Move, MoveKind, PieceKind};

/// Difficulty presets mapping to search depth and engine skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strength {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Strength {
    pub const fn depth(self) -> u8 {
        match self {
            Strength::Easy => 4,
            Strength::Medium => 8,
            Strength::Hard => 15,
        }
    }

    pub const fn skill(self) -> u8 {
        match self {
            Strength::Easy => 5,
            Strength::Medium => 10,
            Strength::Hard => 20,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Strength::Easy => "easy",
            Strength::Medium => "medium",
            Strength::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Strength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Strength::Easy),
            "medium" => Ok(Strength::Medium),
            "hard" => Ok(Strength::Hard),
            other => Err(format!("unknown strength {other:?} (easy, medium, hard)")),
        }
    }
}

/// A move-picking opponent with a random-move safety net.
pub struct Opponent {
    search: Box<dyn MoveSearch>,
}

impl Opponent {
    pub fn new(search: Box<dyn MoveSearch>) -> Self {
        Opponent { search }
    }

    /// Spawn a UCI engine at `path` configured for `strength`.
    pub fn with_engine(path: &str, strength: Strength) -> Result<Self, EngineError> {
        let engine = UciEngine::new(path, strength.depth(), strength.skill())?;
        Ok(Opponent::new(Box::new(engine)))
    }

    /// Pick and play a move for the side to move in `game`.
    ///
    /// Fails only when the game is already over or suspended; every engine
    /// misbehavior falls back to a random legal move instead.
    pub fn choose_move(&mut self, game: &mut Game) -> Result<Move, ChessError> {
        let position = game.position_string();

        match self.search.best_move(&position) {
            Ok(Some(text)) => match game.play_coordinate_move(&text) {
                Ok(MoveOutcome::Played(mv)) => {
                    debug!(%mv, "engine move applied");
                    return Ok(mv);
                }
                Ok(MoveOutcome::PromotionPending { .. }) => {
                    // The engine omitted the promotion letter; a queen is
                    // the only sensible completion.
                    if let Ok(MoveOutcome::Played(mv)) = game.resolve_promotion(PieceKind::Queen) {
                        return Ok(mv);
                    }
                }
                Err(err) => {
                    warn!(reply = %text, %err, "engine reply rejected, playing a random move");
                }
            },
            Ok(None) => {
                warn!("engine offered no move, playing a random move");
            }
            Err(err) => {
                warn!(%err, "engine failed, playing a random move");
            }
        }

        self.random_move(game)
    }

    fn random_move(&mut self, game: &mut Game) -> Result<Move, ChessError> {
        let moves = game.legal_moves();
        let mv = moves
            .choose(&mut thread_rng())
            .copied()
            .ok_or_else(|| ChessError::GameOver(game.status().as_str().to_string()))?;

        match game.try_move(mv.from, mv.to)? {
            MoveOutcome::Played(played) => Ok(played),
            MoveOutcome::PromotionPending { .. } => {
                let kind = match mv.kind {
                    MoveKind::Promotion(kind) => kind,
                    _ => PieceKind::Queen,
                };
                match game.resolve_promotion(kind)? {
                    MoveOutcome::Played(played) => Ok(played),
                    MoveOutcome::PromotionPending { .. } => Err(ChessError::PromotionPending),
                }
            }
        }
    }
}
