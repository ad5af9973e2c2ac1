use serde::{Deserialize, Serialize};

use crate::board::FILES;
use crate::piece::{Color, Piece, PieceType};

/// A square a piece may move to, as listed for one origin.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Destination {
    pub row: usize,
    pub col: usize,
    pub is_capture: bool,
}

/// One executed move in the game history.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub notation: String,
    pub piece: Piece,
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub captured: Option<Piece>,
    pub color: Color,
}

/// Algebraic square name, e.g. `(6, 4)` is "e2".
pub fn square_name(row: usize, col: usize) -> String {
    format!("{}{}", FILES[col], 8 - row)
}

/// Short algebraic notation: "e4" and "dxe5" for pawns, "Nf3" and "Bxc6" for
/// everything else. Coordinates must be on the board.
pub fn notation(
    piece: Piece,
    from: (usize, usize),
    to: (usize, usize),
    captured: Option<Piece>,
) -> String {
    let to_sq = square_name(to.0, to.1);
    match piece.piece_type {
        PieceType::Pawn if captured.is_some() => format!("{}x{to_sq}", FILES[from.1]),
        PieceType::Pawn => to_sq,
        pt => {
            let sym = pt.letter().to_ascii_uppercase();
            let cap = if captured.is_some() { "x" } else { "" };
            format!("{sym}{cap}{to_sq}")
        }
    }
}
