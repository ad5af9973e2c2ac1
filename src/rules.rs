//! Piece movement rules.
//!
//! Pure functions over a [`Board`]: no side effects and no notion of check,
//! castling, en passant or promotion. Coordinates are `(row, col)` with row 0
//! at black's back rank, so white pawns move toward row 0.

use crate::board::Board;
use crate::moves::Destination;
use crate::piece::{Color, PieceType};

/// Why a move was refused. The `Display` text is the reason reported to callers
/// and sent over the delegate protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("Out of bounds.")]
    OutOfBounds,
    #[error("No piece on source square.")]
    NoPiece,
    #[error("Not your turn.")]
    NotYourTurn,
    #[error("Must move to a different square.")]
    SameSquare,
    #[error("Cannot capture your own piece.")]
    OwnPiece,
    #[error("Path is blocked.")]
    PathBlocked,
    #[error("Illegal move for this piece.")]
    BadPattern,
}

/// Reason text for a legal move.
pub const VALID_MOVE: &str = "Valid move.";

fn deltas(from: (usize, usize), to: (usize, usize)) -> (i32, i32) {
    (to.0 as i32 - from.0 as i32, to.1 as i32 - from.1 as i32)
}

/// Whether every square strictly between `from` and `to` is empty. The two
/// squares must share a row, column or diagonal; the destination itself is not
/// inspected.
pub fn clear_path(from: (usize, usize), to: (usize, usize), board: &Board) -> bool {
    let (dr, dc) = deltas(from, to);
    let (sr, sc) = (dr.signum(), dc.signum());
    let mut r = from.0 as i32 + sr;
    let mut c = from.1 as i32 + sc;
    while (r, c) != (to.0 as i32, to.1 as i32) {
        if !Board::in_bounds_signed(r, c) {
            return false;
        }
        if !board.is_empty(r as usize, c as usize) {
            return false;
        }
        r += sr;
        c += sc;
    }
    true
}

pub fn pawn_can_move(
    color: Color,
    from: (usize, usize),
    to: (usize, usize),
    board: &Board,
) -> bool {
    let (dir, start_row): (i32, usize) = match color {
        Color::White => (-1, 6),
        Color::Black => (1, 1),
    };
    let (dr, dc) = deltas(from, to);

    if dc == 0 && dr == dir {
        return board.is_empty(to.0, to.1);
    }
    if dc == 0 && dr == 2 * dir && from.0 == start_row {
        let mid = (from.0 as i32 + dir) as usize;
        return board.is_empty(mid, from.1) && board.is_empty(to.0, to.1);
    }
    if dc.abs() == 1 && dr == dir {
        return board.color_at(to.0, to.1).is_some_and(|c| c != color);
    }
    false
}

pub fn rook_can_move(from: (usize, usize), to: (usize, usize), board: &Board) -> bool {
    if from.0 != to.0 && from.1 != to.1 {
        return false;
    }
    clear_path(from, to, board)
}

pub fn knight_can_move(from: (usize, usize), to: (usize, usize)) -> bool {
    let (dr, dc) = deltas(from, to);
    let (dr, dc) = (dr.abs(), dc.abs());
    (dr == 2 && dc == 1) || (dr == 1 && dc == 2)
}

pub fn bishop_can_move(from: (usize, usize), to: (usize, usize), board: &Board) -> bool {
    let (dr, dc) = deltas(from, to);
    if dr.abs() != dc.abs() {
        return false;
    }
    clear_path(from, to, board)
}

pub fn queen_can_move(from: (usize, usize), to: (usize, usize), board: &Board) -> bool {
    rook_can_move(from, to, board) || bishop_can_move(from, to, board)
}

pub fn king_can_move(from: (usize, usize), to: (usize, usize)) -> bool {
    let (dr, dc) = deltas(from, to);
    dr.abs() <= 1 && dc.abs() <= 1
}

/// Dispatch to the predicate for `piece_type`.
pub fn can_move(
    piece_type: PieceType,
    color: Color,
    from: (usize, usize),
    to: (usize, usize),
    board: &Board,
) -> bool {
    match piece_type {
        PieceType::Pawn => pawn_can_move(color, from, to, board),
        PieceType::Rook => rook_can_move(from, to, board),
        PieceType::Knight => knight_can_move(from, to),
        PieceType::Bishop => bishop_can_move(from, to, board),
        PieceType::Queen => queen_can_move(from, to, board),
        PieceType::King => king_can_move(from, to),
    }
}

/// Whether the geometry of `from -> to` is a line this sliding piece travels.
fn on_line(piece_type: PieceType, from: (usize, usize), to: (usize, usize)) -> bool {
    let (dr, dc) = deltas(from, to);
    let straight = dr == 0 || dc == 0;
    let diagonal = dr.abs() == dc.abs();
    match piece_type {
        PieceType::Rook => straight,
        PieceType::Bishop => diagonal,
        PieceType::Queen => straight || diagonal,
        _ => false,
    }
}

/// Full legality check for the side to move: shared preconditions first, then
/// the piece predicate.
pub fn check_move(
    board: &Board,
    turn: Color,
    from: (usize, usize),
    to: (usize, usize),
) -> Result<(), IllegalMove> {
    if !Board::in_bounds(from.0, from.1) || !Board::in_bounds(to.0, to.1) {
        return Err(IllegalMove::OutOfBounds);
    }
    let piece = board.get(from.0, from.1).ok_or(IllegalMove::NoPiece)?;
    if piece.color != turn {
        return Err(IllegalMove::NotYourTurn);
    }
    if from == to {
        return Err(IllegalMove::SameSquare);
    }
    if board.color_at(to.0, to.1) == Some(piece.color) {
        return Err(IllegalMove::OwnPiece);
    }

    if can_move(piece.piece_type, piece.color, from, to, board) {
        return Ok(());
    }
    if piece.piece_type.slides() && on_line(piece.piece_type, from, to) {
        Err(IllegalMove::PathBlocked)
    } else {
        Err(IllegalMove::BadPattern)
    }
}

/// Every legal destination from `from`, found by testing all 64 squares.
pub fn legal_destinations(board: &Board, turn: Color, from: (usize, usize)) -> Vec<Destination> {
    match board.get(from.0, from.1) {
        Some(p) if p.color == turn => {}
        _ => return Vec::new(),
    }
    let mut moves = Vec::new();
    for row in 0..8 {
        for col in 0..8 {
            if check_move(board, turn, from, (row, col)).is_ok() {
                moves.push(Destination {
                    row,
                    col,
                    is_capture: !board.is_empty(row, col),
                });
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a board from `(type, color, (row, col))` triples.
    fn board_with(pieces: &[(PieceType, Color, (usize, usize))]) -> Board {
        let mut board = Board::empty();
        for &(pt, color, (r, c)) in pieces {
            board.place(r, c, pt, color);
        }
        board
    }

    fn dests(moves: &[Destination]) -> Vec<(usize, usize)> {
        moves.iter().map(|d| (d.row, d.col)).collect()
    }

    #[test]
    fn pawn_single_and_double_step_from_start() {
        let board = Board::new();
        assert!(check_move(&board, Color::White, (6, 4), (5, 4)).is_ok());
        assert!(check_move(&board, Color::White, (6, 4), (4, 4)).is_ok());
        assert_eq!(
            check_move(&board, Color::White, (6, 4), (3, 4)),
            Err(IllegalMove::BadPattern)
        );
        // Black moves the other way.
        assert!(check_move(&board, Color::Black, (1, 3), (3, 3)).is_ok());
        assert_eq!(
            check_move(&board, Color::Black, (1, 3), (2, 4)),
            Err(IllegalMove::BadPattern)
        );
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let blocked_mid = board_with(&[
            (PieceType::Pawn, Color::White, (6, 2)),
            (PieceType::Knight, Color::Black, (5, 2)),
        ]);
        assert!(!pawn_can_move(Color::White, (6, 2), (4, 2), &blocked_mid));

        let blocked_dest = board_with(&[
            (PieceType::Pawn, Color::White, (6, 2)),
            (PieceType::Knight, Color::Black, (4, 2)),
        ]);
        assert!(!pawn_can_move(Color::White, (6, 2), (4, 2), &blocked_dest));
        assert!(pawn_can_move(Color::White, (6, 2), (5, 2), &blocked_dest));
    }

    #[test]
    fn pawn_double_step_only_from_starting_rank() {
        let board = board_with(&[(PieceType::Pawn, Color::White, (5, 2))]);
        assert!(!pawn_can_move(Color::White, (5, 2), (3, 2), &board));
        assert!(pawn_can_move(Color::White, (5, 2), (4, 2), &board));
    }

    #[test]
    fn pawn_captures_only_diagonally_onto_opponents() {
        let board = board_with(&[
            (PieceType::Pawn, Color::White, (4, 4)),
            (PieceType::Pawn, Color::Black, (3, 5)),
            (PieceType::Pawn, Color::Black, (3, 4)),
        ]);
        assert!(pawn_can_move(Color::White, (4, 4), (3, 5), &board));
        // Empty diagonal: no en passant, no quiet diagonal step.
        assert!(!pawn_can_move(Color::White, (4, 4), (3, 3), &board));
        // Straight ahead is occupied: a pawn never captures forward.
        assert!(!pawn_can_move(Color::White, (4, 4), (3, 4), &board));
        // Backward diagonal capture is not allowed.
        let behind = board_with(&[
            (PieceType::Pawn, Color::White, (4, 4)),
            (PieceType::Rook, Color::Black, (5, 5)),
        ]);
        assert!(!pawn_can_move(Color::White, (4, 4), (5, 5), &behind));
    }

    #[test]
    fn pawn_diagonal_onto_own_piece_fails_predicate() {
        let board = board_with(&[
            (PieceType::Pawn, Color::Black, (1, 1)),
            (PieceType::Knight, Color::Black, (2, 2)),
        ]);
        assert!(!pawn_can_move(Color::Black, (1, 1), (2, 2), &board));
        assert_eq!(
            check_move(&board, Color::Black, (1, 1), (2, 2)),
            Err(IllegalMove::OwnPiece)
        );
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = Board::new();
        assert!(check_move(&board, Color::White, (7, 6), (5, 5)).is_ok());
        assert!(check_move(&board, Color::White, (7, 6), (5, 7)).is_ok());
        assert_eq!(
            check_move(&board, Color::White, (7, 6), (6, 4)),
            Err(IllegalMove::OwnPiece)
        );
        assert!(!knight_can_move((4, 4), (6, 6)));
        assert!(knight_can_move((4, 4), (3, 2)));
    }

    #[test]
    fn rook_blocked_by_either_color() {
        let board = board_with(&[
            (PieceType::Rook, Color::White, (7, 0)),
            (PieceType::Pawn, Color::White, (6, 0)),
            (PieceType::Pawn, Color::Black, (7, 3)),
        ]);
        assert_eq!(
            check_move(&board, Color::White, (7, 0), (0, 0)),
            Err(IllegalMove::PathBlocked)
        );
        // Capture lands on the first blocker along the rank...
        assert!(check_move(&board, Color::White, (7, 0), (7, 3)).is_ok());
        // ...but not through it.
        assert_eq!(
            check_move(&board, Color::White, (7, 0), (7, 5)),
            Err(IllegalMove::PathBlocked)
        );
        assert_eq!(
            check_move(&board, Color::White, (7, 0), (5, 2)),
            Err(IllegalMove::BadPattern)
        );
    }

    #[test]
    fn bishop_needs_diagonal_and_clear_path() {
        let board = board_with(&[
            (PieceType::Bishop, Color::Black, (0, 2)),
            (PieceType::Pawn, Color::White, (2, 4)),
        ]);
        assert!(check_move(&board, Color::Black, (0, 2), (1, 3)).is_ok());
        assert!(check_move(&board, Color::Black, (0, 2), (2, 4)).is_ok());
        assert_eq!(
            check_move(&board, Color::Black, (0, 2), (3, 5)),
            Err(IllegalMove::PathBlocked)
        );
        assert_eq!(
            check_move(&board, Color::Black, (0, 2), (0, 5)),
            Err(IllegalMove::BadPattern)
        );
    }

    #[test]
    fn queen_moves_like_rook_or_bishop() {
        let board = board_with(&[(PieceType::Queen, Color::White, (4, 3))]);
        let moves = legal_destinations(&board, Color::White, (4, 3));
        // 14 on the lines plus 13 on the diagonals from d4.
        assert_eq!(moves.len(), 27);
        assert!(!queen_can_move((4, 3), (2, 4), &board));
    }

    #[test]
    fn king_steps_one_square() {
        let board = board_with(&[(PieceType::King, Color::Black, (0, 4))]);
        let mut got = dests(&legal_destinations(&board, Color::Black, (0, 4)));
        got.sort();
        assert_eq!(got, vec![(0, 3), (0, 5), (1, 3), (1, 4), (1, 5)]);
        assert!(!king_can_move((0, 4), (0, 6)));
    }

    #[test]
    fn shared_preconditions_in_order() {
        let board = Board::new();
        assert_eq!(
            check_move(&board, Color::White, (8, 0), (0, 0)),
            Err(IllegalMove::OutOfBounds)
        );
        assert_eq!(
            check_move(&board, Color::White, (6, 0), (6, 9)),
            Err(IllegalMove::OutOfBounds)
        );
        assert_eq!(
            check_move(&board, Color::White, (4, 4), (3, 4)),
            Err(IllegalMove::NoPiece)
        );
        assert_eq!(
            check_move(&board, Color::White, (1, 4), (2, 4)),
            Err(IllegalMove::NotYourTurn)
        );
        assert_eq!(
            check_move(&board, Color::White, (6, 4), (6, 4)),
            Err(IllegalMove::SameSquare)
        );
        assert_eq!(
            check_move(&board, Color::White, (7, 0), (6, 0)),
            Err(IllegalMove::OwnPiece)
        );
    }

    #[test]
    fn reasons_render_as_sentences() {
        assert_eq!(IllegalMove::PathBlocked.to_string(), "Path is blocked.");
        assert_eq!(IllegalMove::NotYourTurn.to_string(), "Not your turn.");
    }

    #[test]
    fn initial_position_move_counts() {
        let board = Board::new();
        let knight = legal_destinations(&board, Color::White, (7, 1));
        assert_eq!(dests(&knight), vec![(5, 0), (5, 2)]);
        assert!(knight.iter().all(|d| !d.is_capture));
        assert!(legal_destinations(&board, Color::White, (7, 0)).is_empty());
        assert!(legal_destinations(&board, Color::White, (1, 0)).is_empty());
        assert!(legal_destinations(&board, Color::White, (4, 4)).is_empty());
    }

    #[test]
    fn captures_are_tagged() {
        let board = board_with(&[
            (PieceType::Rook, Color::White, (4, 0)),
            (PieceType::Knight, Color::Black, (4, 2)),
        ]);
        let moves = legal_destinations(&board, Color::White, (4, 0));
        let capture = moves.iter().find(|d| (d.row, d.col) == (4, 2)).unwrap();
        assert!(capture.is_capture);
        assert!(!moves.iter().any(|d| (d.row, d.col) == (4, 3)));
        assert_eq!(moves.iter().filter(|d| d.is_capture).count(), 1);
    }
}
