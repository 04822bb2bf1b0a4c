//! Error types shared by the server and the client

use std::path::PathBuf;
use thiserror::Error;

/// Failure to interpret a serialized board
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board string must hold {expected} cells, got {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("board cell {0:?} is not a letter")]
    InvalidCell(char),
}

/// Startup resources (cube pool, dictionary) that could not be loaded
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("expected {expected} cubes, found {found}")]
    CubeCount { expected: usize, found: usize },
    #[error("cube on line {line} must have {expected} letter faces, got {found:?}")]
    CubeFaces {
        line: usize,
        expected: usize,
        found: String,
    },
    #[error("word list is not sorted ascending at line {line} ({word:?})")]
    Unsorted { line: usize, word: String },
}

/// Failures while talking to a peer. Any of these ends the owning match.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed by peer")]
    Closed,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected a count, got {0:?}")]
    BadCount(String),
    #[error("expected {expected}, got {found:?}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
    #[error("invalid board from peer: {0}")]
    Board(#[from] BoardError),
}
