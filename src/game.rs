//! Game state and the move executor.
//!
//! A [`GameState`] is everything a host has to persist between requests:
//! board, side to move, history, captures, the legality cache and the clocks.
//! It is restored in full before each operation and saved in full after.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::Board;
use crate::cache::LegalityCache;
use crate::clock::Clock;
use crate::error::SnapshotError;
use crate::moves::{self, Destination, MoveRecord};
use crate::piece::{Color, Piece};
use crate::validator::Validator;

/// Pieces taken by each side.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

impl Captured {
    pub fn by(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn push(&mut self, captor: Color, piece: Piece) {
        match captor {
            Color::White => self.white.push(piece),
            Color::Black => self.black.push(piece),
        }
    }
}

/// Result of [`GameState::execute_move`]. On success `message` is the move's
/// notation; otherwise it explains the refusal or the time forfeit.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub success: bool,
    pub message: String,
    pub captured: Option<Piece>,
}

impl MoveOutcome {
    fn failed(message: impl Into<String>) -> Self {
        MoveOutcome {
            success: false,
            message: message.into(),
            captured: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_turn: Color,
    #[serde(default)]
    pub move_history: Vec<MoveRecord>,
    #[serde(default)]
    pub captured: Captured,
    #[serde(default)]
    pub cache: LegalityCache,
    #[serde(flatten)]
    pub clock: Clock,
}

impl GameState {
    /// Standard starting position, white to move, both clocks at `budget_secs`.
    pub fn new(budget_secs: u64, now: u64) -> Self {
        GameState {
            board: Board::new(),
            current_turn: Color::White,
            move_history: Vec::new(),
            captured: Captured::default(),
            cache: LegalityCache::new(),
            clock: Clock::new(budget_secs, now),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Legal destinations for the piece on `(row, col)`, through the cache.
    pub fn legal_moves_from(
        &mut self,
        validator: &Validator,
        row: usize,
        col: usize,
    ) -> Vec<Destination> {
        self.cache.legal_moves_from(&self.board, self.current_turn, validator, row, col)
    }

    /// Validate and apply a move for the side to move.
    ///
    /// An illegal move leaves the state untouched. A legal move is always
    /// committed; if afterwards either clock reads zero the outcome is a time
    /// forfeit even though the board has changed.
    pub fn execute_move(
        &mut self,
        validator: &Validator,
        from: (usize, usize),
        to: (usize, usize),
        now: u64,
    ) -> MoveOutcome {
        let verdict = validator.validate(&self.board, self.current_turn, from, to);
        if !verdict.legal {
            return MoveOutcome::failed(verdict.reason);
        }
        let Some(piece) = self.board.remove(from.0, from.1) else {
            return MoveOutcome::failed(crate::rules::IllegalMove::NoPiece.to_string());
        };
        let mover = self.current_turn;
        let captured = self.board.set(to.0, to.1, Some(piece));
        if let Some(taken) = captured {
            self.captured.push(mover, taken);
        }

        let notation = moves::notation(piece, from, to, captured);
        self.move_history.push(MoveRecord {
            notation: notation.clone(),
            piece,
            from,
            to,
            captured,
            color: mover,
        });
        info!(%notation, color = mover.as_str(), "move executed");

        self.cache.invalidate();
        self.current_turn = mover.opposite();
        self.clock.tick(self.current_turn, now);

        if let Some(loser) = self.clock.expired() {
            warn!(color = loser.as_str(), "time forfeit");
            return MoveOutcome::failed(format!("{loser} ran out of time."));
        }
        MoveOutcome {
            success: true,
            message: notation,
            captured,
        }
    }

    /// Charge elapsed time to the side to move.
    pub fn tick(&mut self, now: u64) {
        self.clock.tick(self.current_turn, now);
    }

    pub fn set_paused(&mut self, paused: bool, now: u64) {
        self.clock.set_paused(self.current_turn, paused, now);
    }

    pub fn is_expired(&self, color: Color) -> bool {
        self.clock.is_expired(color)
    }
}
