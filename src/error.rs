//! Error types for the structural failure paths of the engine.
//!
//! Rule rejections are not errors in this sense; they are reported as
//! [`crate::rules::IllegalMove`] values inside a verdict. The types here cover
//! decoding persisted state, parsing delegate traffic, and talking to the
//! delegate process.

use std::path::PathBuf;
use std::time::Duration;

/// Failure to decode a board from its linear or grid form.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("linear board must be 64 characters, got {0}")]
    BadLength(usize),

    #[error("board grid must be 8x8, got {rows} rows (row {bad_row} has {bad_len} squares)")]
    BadShape {
        rows: usize,
        bad_row: usize,
        bad_len: usize,
    },

    #[error("unknown board character {0:?}")]
    UnknownChar(char),
}

/// Failure to parse a delegate protocol line.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,

    #[error("unknown verb {0:?}")]
    UnknownVerb(String),

    #[error("expected {expected} fields after {verb}, got {got}")]
    FieldCount {
        verb: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("bad board: {0}")]
    Board(#[from] BoardError),

    #[error("bad color {0:?}")]
    Color(String),

    #[error("bad coordinate {0:?}")]
    Coordinate(String),

    #[error("bad capture flag {0:?}")]
    CaptureFlag(String),

    #[error("move list is not a sequence of triples ({0} values)")]
    Triples(usize),
}

/// Failure of a round trip to the delegate process.
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error("delegate program {0} does not exist")]
    Missing(PathBuf),

    #[error("delegate i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("delegate did not answer within {0:?}")]
    Timeout(Duration),

    #[error("delegate closed its output without answering")]
    Empty,

    #[error("delegate answer unparseable: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("delegate answered {0:?} to a different request")]
    Mismatch(String),
}

/// Failure to restore a persisted game snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache key {0:?} is not of the form \"row,col\"")]
    CacheKey(String),
}

pub type DelegateResult<T> = Result<T, DelegateError>;
