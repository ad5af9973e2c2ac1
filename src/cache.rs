//! Per-origin legal move cache.
//!
//! Entries are computed lazily, one origin square at a time, and are only
//! valid for the board they were computed against. Any mutation of the board
//! or the side to move must be followed by [`LegalityCache::invalidate`]; the
//! cache is never patched entry by entry, since one move can open or close
//! lines for any number of other pieces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::error::SnapshotError;
use crate::moves::Destination;
use crate::piece::Color;
use crate::validator::Validator;

type Entries = BTreeMap<(usize, usize), Vec<Destination>>;

/// Persisted form: keys are `"row,col"` strings.
type Persisted = BTreeMap<String, Vec<Destination>>;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(into = "Persisted", try_from = "Persisted")]
pub struct LegalityCache {
    entries: Entries,
}

impl LegalityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legal destinations for the piece on `(row, col)`. Squares that are empty
    /// or hold a piece of the side not to move give an empty list and leave
    /// the cache untouched.
    pub fn legal_moves_from(
        &mut self,
        board: &Board,
        turn: Color,
        validator: &Validator,
        row: usize,
        col: usize,
    ) -> Vec<Destination> {
        match board.get(row, col) {
            Some(piece) if piece.color == turn => {}
            _ => return Vec::new(),
        }
        if let Some(moves) = self.entries.get(&(row, col)) {
            debug!(row, col, "legality cache hit");
            return moves.clone();
        }
        debug!(row, col, "legality cache miss");
        let moves = validator.enumerate_legal_moves(board, turn, (row, col));
        self.entries.insert((row, col), moves.clone());
        moves
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "legality cache invalidated");
        }
        self.entries.clear();
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries.contains_key(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.keys().copied()
    }
}

fn parse_key(key: &str) -> Option<(usize, usize)> {
    let (row, col) = key.split_once(',')?;
    let row = row.trim().parse().ok()?;
    let col = col.trim().parse().ok()?;
    Board::in_bounds(row, col).then_some((row, col))
}

impl From<LegalityCache> for Persisted {
    fn from(cache: LegalityCache) -> Self {
        cache
            .entries
            .into_iter()
            .map(|((row, col), moves)| (format!("{row},{col}"), moves))
            .collect()
    }
}

impl TryFrom<Persisted> for LegalityCache {
    type Error = SnapshotError;

    fn try_from(persisted: Persisted) -> Result<Self, Self::Error> {
        let entries = persisted
            .into_iter()
            .map(|(key, moves)| {
                parse_key(&key)
                    .map(|sq| (sq, moves))
                    .ok_or(SnapshotError::CacheKey(key))
            })
            .collect::<Result<Entries, _>>()?;
        Ok(LegalityCache { entries })
    }
}
