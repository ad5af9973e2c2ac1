use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Lowercase name, as used by the delegate protocol and the snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    pub fn parse(s: &str) -> Option<Color> {
        match s {
            "white" => Some(Color::White),
            "black" => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    /// Lowercase letter used in the linear board encoding.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Rook => 'r',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Rooks, bishops and queens travel along lines and can be obstructed.
    pub fn slides(self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }
}

/// A piece token. Serialized as its single-character encoding
/// (`P` for a white pawn, `n` for a black knight, ...).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(into = "char", try_from = "char")]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    pub fn to_char(self) -> char {
        let c = self.piece_type.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_letter(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(piece_type, color))
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        piece.to_char()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown piece character {0:?}")]
pub struct UnknownPiece(pub char);

impl TryFrom<char> for Piece {
    type Error = UnknownPiece;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Piece::from_char(c).ok_or(UnknownPiece(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_chars_follow_case_convention() {
        assert_eq!(Piece::new(PieceType::Knight, Color::White).to_char(), 'N');
        assert_eq!(Piece::new(PieceType::Knight, Color::Black).to_char(), 'n');
        assert_eq!(
            Piece::from_char('Q'),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
        assert_eq!(Piece::from_char('.'), None);
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn piece_serializes_as_a_single_character() {
        let json = serde_json::to_string(&Piece::new(PieceType::King, Color::Black)).unwrap();
        assert_eq!(json, "\"k\"");
        let back: Piece = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(back, Piece::new(PieceType::Rook, Color::White));
        assert!(serde_json::from_str::<Piece>("\"z\"").is_err());
    }
}
