//! Line protocol spoken with the external validation process.
//!
//! ```text
//! VALIDATE <board64> <color> <fromRow> <fromCol> <toRow> <toCol>
//!     -> VALID | INVALID <reason>
//! MOVES <board64> <color> <row> <col>
//!     -> MOVES <row> <col> <0|1> <row> <col> <0|1> ...
//! ```
//!
//! A request the delegate cannot parse is answered with `ERROR <message>`,
//! which a client treats the same as no answer at all.

use crate::board::Board;
use crate::error::ProtocolError;
use crate::moves::Destination;
use crate::piece::Color;
use crate::rules;

/// Reason used when an `INVALID` answer carries no text.
pub const DEFAULT_INVALID_REASON: &str = "Invalid move.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Validate {
        board: Board,
        turn: Color,
        from: (usize, usize),
        to: (usize, usize),
    },
    Moves {
        board: Board,
        turn: Color,
        from: (usize, usize),
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Valid,
    Invalid(String),
    Moves(Vec<Destination>),
}

fn coordinate(token: &str) -> Result<usize, ProtocolError> {
    token
        .parse::<usize>()
        .map_err(|_| ProtocolError::Coordinate(token.to_string()))
}

fn color(token: &str) -> Result<Color, ProtocolError> {
    Color::parse(token).ok_or_else(|| ProtocolError::Color(token.to_string()))
}

impl Request {
    pub fn encode(&self) -> String {
        match self {
            Request::Validate { board, turn, from, to } => format!(
                "VALIDATE {} {} {} {} {} {}",
                board.to_linear(),
                turn.as_str(),
                from.0,
                from.1,
                to.0,
                to.1
            ),
            Request::Moves { board, turn, from } => format!(
                "MOVES {} {} {} {}",
                board.to_linear(),
                turn.as_str(),
                from.0,
                from.1
            ),
        }
    }

    pub fn parse(line: &str) -> Result<Request, ProtocolError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ProtocolError::Empty)?;
        let fields: Vec<&str> = tokens.collect();
        match verb {
            "VALIDATE" => {
                if fields.len() != 6 {
                    return Err(ProtocolError::FieldCount {
                        verb: "VALIDATE",
                        expected: 6,
                        got: fields.len(),
                    });
                }
                Ok(Request::Validate {
                    board: Board::from_linear(fields[0])?,
                    turn: color(fields[1])?,
                    from: (coordinate(fields[2])?, coordinate(fields[3])?),
                    to: (coordinate(fields[4])?, coordinate(fields[5])?),
                })
            }
            "MOVES" => {
                if fields.len() != 4 {
                    return Err(ProtocolError::FieldCount {
                        verb: "MOVES",
                        expected: 4,
                        got: fields.len(),
                    });
                }
                Ok(Request::Moves {
                    board: Board::from_linear(fields[0])?,
                    turn: color(fields[1])?,
                    from: (coordinate(fields[2])?, coordinate(fields[3])?),
                })
            }
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }
}

impl Response {
    pub fn encode(&self) -> String {
        match self {
            Response::Valid => "VALID".to_string(),
            Response::Invalid(reason) => format!("INVALID {reason}"),
            Response::Moves(moves) => {
                let mut line = String::from("MOVES");
                for d in moves {
                    line.push_str(&format!(" {} {} {}", d.row, d.col, u8::from(d.is_capture)));
                }
                line
            }
        }
    }

    pub fn parse(line: &str) -> Result<Response, ProtocolError> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "" => Err(ProtocolError::Empty),
            "VALID" => Ok(Response::Valid),
            "INVALID" => {
                let reason = rest.trim();
                if reason.is_empty() {
                    Ok(Response::Invalid(DEFAULT_INVALID_REASON.to_string()))
                } else {
                    Ok(Response::Invalid(reason.to_string()))
                }
            }
            "MOVES" => {
                let values: Vec<&str> = rest.split_whitespace().collect();
                if values.len() % 3 != 0 {
                    return Err(ProtocolError::Triples(values.len()));
                }
                values
                    .chunks(3)
                    .map(|triple| {
                        let row = coordinate(triple[0])?;
                        let col = coordinate(triple[1])?;
                        if !Board::in_bounds(row, col) {
                            return Err(ProtocolError::Coordinate(format!("{row},{col}")));
                        }
                        let is_capture = match triple[2] {
                            "0" => false,
                            "1" => true,
                            flag => return Err(ProtocolError::CaptureFlag(flag.to_string())),
                        };
                        Ok(Destination { row, col, is_capture })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Response::Moves)
            }
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }
}

/// Answer a request with the local rule set.
pub fn respond(request: &Request) -> Response {
    match request {
        Request::Validate { board, turn, from, to } => {
            match rules::check_move(board, *turn, *from, *to) {
                Ok(()) => Response::Valid,
                Err(why) => Response::Invalid(why.to_string()),
            }
        }
        Request::Moves { board, turn, from } => {
            Response::Moves(rules::legal_destinations(board, *turn, *from))
        }
    }
}

/// Server side of one exchange: parse a request line and produce the reply line.
pub fn answer(line: &str) -> String {
    match Request::parse(line) {
        Ok(request) => respond(&request).encode(),
        Err(e) => format!("ERROR {e}"),
    }
}
