//! Move validation behind one entry point.
//!
//! A [`MoveOracle`] answers "is this move legal" and "where can this piece
//! go". There are two: [`LocalRules`], which always answers, and
//! [`crate::delegate::DelegateOracle`], which may not. [`Validator`] asks the
//! delegate first when one is configured and falls back to the local rules
//! whenever it gets no usable answer.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Destination;
use crate::piece::Color;
use crate::rules::{self, IllegalMove, VALID_MOVE};

/// Outcome of validating one move.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub legal: bool,
    pub reason: String,
}

impl Verdict {
    pub fn legal() -> Self {
        Verdict {
            legal: true,
            reason: VALID_MOVE.to_string(),
        }
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        Verdict {
            legal: false,
            reason: reason.into(),
        }
    }
}

impl From<Result<(), IllegalMove>> for Verdict {
    fn from(result: Result<(), IllegalMove>) -> Self {
        match result {
            Ok(()) => Verdict::legal(),
            Err(why) => Verdict::illegal(why.to_string()),
        }
    }
}

/// Something that can judge moves. `None` means "no answer"; the caller then
/// asks someone else.
pub trait MoveOracle: Send + Sync {
    fn validate(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Option<Verdict>;

    fn legal_moves(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
    ) -> Option<Vec<Destination>>;
}

/// The in-process rule set. Always answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalRules;

impl MoveOracle for LocalRules {
    fn validate(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Option<Verdict> {
        Some(rules::check_move(board, turn, from, to).into())
    }

    fn legal_moves(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
    ) -> Option<Vec<Destination>> {
        Some(rules::legal_destinations(board, turn, from))
    }
}

#[derive(Default)]
pub struct Validator {
    delegate: Option<Box<dyn MoveOracle>>,
}

impl Validator {
    /// A validator that only uses the in-process rules.
    pub fn local() -> Self {
        Validator { delegate: None }
    }

    pub fn with_delegate(delegate: Box<dyn MoveOracle>) -> Self {
        Validator {
            delegate: Some(delegate),
        }
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    pub fn validate(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Verdict {
        if let Some(verdict) = self
            .delegate
            .as_ref()
            .and_then(|d| d.validate(board, turn, from, to))
        {
            return verdict;
        }
        rules::check_move(board, turn, from, to).into()
    }

    pub fn enumerate_legal_moves(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
    ) -> Vec<Destination> {
        if let Some(moves) = self
            .delegate
            .as_ref()
            .and_then(|d| d.legal_moves(board, turn, from))
        {
            return moves;
        }
        rules::legal_destinations(board, turn, from)
    }
}
