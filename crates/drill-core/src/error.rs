//! Core error types

use thiserror::Error;

use crate::types::Square;

/// A game block that cannot be turned into lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No piece can play '{0}' in this position")]
    NoMatchingOrigin(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Wrong move from the trainee. The board is untouched and the ply may be retried.
    #[error("Incorrect move: played {attempted}, expected {expected}")]
    AttemptMismatch { attempted: String, expected: String },

    /// A recorded ply could not be resolved; the recorded line is inconsistent.
    #[error("Recorded ply {ply} cannot be played: {source}")]
    ScriptedPly {
        ply: usize,
        #[source]
        source: ResolveError,
    },

    #[error("It is not the trainee's turn")]
    NotPlayerTurn,

    #[error("The line is already finished")]
    LineFinished,

    #[error("No piece on {0}")]
    EmptySquare(Square),

    #[error("The piece on {0} belongs to the opponent")]
    ForeignPiece(Square),

    #[error("Line {0} does not exist")]
    LineOutOfRange(usize),

    #[error("The repertoire has no lines")]
    EmptyRepertoire,
}
