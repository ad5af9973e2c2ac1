use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::piece::{Color, Piece, PieceType};

/// Character used for an empty square in the linear encoding.
pub const EMPTY_SQUARE: char = '.';

/// File letters, indexed by column.
pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Standard starting position in linear form. Row 0 is black's back rank.
pub const INITIAL_POSITION: &str = concat!(
    "rnbqkbnr",
    "pppppppp",
    "........",
    "........",
    "........",
    "........",
    "PPPPPPPP",
    "RNBQKBNR",
);

/// The 8x8 grid. Squares are stored row-major in one flat array so a square
/// is addressed as `row * 8 + col`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(into = "Vec<Vec<Option<Piece>>>", try_from = "Vec<Vec<Option<Piece>>>")]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { squares: [None; 64] }
    }

    pub fn new() -> Self {
        let mut board = Board::empty();
        for (i, c) in INITIAL_POSITION.chars().enumerate() {
            board.squares[i] = Piece::from_char(c);
        }
        board
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < 8 && col < 8
    }

    /// Signed variant used when stepping along a direction.
    pub fn in_bounds_signed(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    /// Piece at a square. Squares off the board read as empty.
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        if !Self::in_bounds(row, col) {
            return None;
        }
        self.squares[row * 8 + col]
    }

    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    pub fn color_at(&self, row: usize, col: usize) -> Option<Color> {
        self.get(row, col).map(|p| p.color)
    }

    /// Put `piece` on a square, returning whatever was there. Writes off the
    /// board are ignored.
    pub fn set(&mut self, row: usize, col: usize, piece: Option<Piece>) -> Option<Piece> {
        if !Self::in_bounds(row, col) {
            return None;
        }
        std::mem::replace(&mut self.squares[row * 8 + col], piece)
    }

    pub fn place(&mut self, row: usize, col: usize, piece_type: PieceType, color: Color) {
        self.set(row, col, Some(Piece::new(piece_type, color)));
    }

    pub fn remove(&mut self, row: usize, col: usize) -> Option<Piece> {
        self.set(row, col, None)
    }

    /// Iterate over occupied squares as `(row, col, piece)`.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, sq)| sq.map(|p| (i / 8, i % 8, p)))
    }

    /// Flatten to the 64-character form used by the delegate protocol.
    pub fn to_linear(&self) -> String {
        self.squares
            .iter()
            .map(|sq| sq.map_or(EMPTY_SQUARE, Piece::to_char))
            .collect()
    }

    pub fn from_linear(s: &str) -> Result<Board, BoardError> {
        let len = s.chars().count();
        if len != 64 {
            return Err(BoardError::BadLength(len));
        }
        let mut board = Board::empty();
        for (i, c) in s.chars().enumerate() {
            board.squares[i] = match c {
                EMPTY_SQUARE => None,
                _ => Some(Piece::from_char(c).ok_or(BoardError::UnknownChar(c))?),
            };
        }
        Ok(board)
    }
}

impl From<Board> for Vec<Vec<Option<Piece>>> {
    fn from(board: Board) -> Self {
        board.squares.chunks(8).map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<Option<Piece>>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Option<Piece>>>) -> Result<Self, Self::Error> {
        let bad = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != 8)
            .map(|(i, row)| (i, row.len()));
        if rows.len() != 8 || bad.is_some() {
            let (bad_row, bad_len) = bad.unwrap_or((rows.len(), 0));
            return Err(BoardError::BadShape {
                rows: rows.len(),
                bad_row,
                bad_len,
            });
        }
        let mut board = Board::empty();
        for (r, row) in rows.into_iter().enumerate() {
            for (c, sq) in row.into_iter().enumerate() {
                board.squares[r * 8 + c] = sq;
            }
        }
        Ok(board)
    }
}
