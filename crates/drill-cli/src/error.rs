//! CLI error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No PGN file given (pass a path or set DRILL_PGN)")]
    MissingPgn,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {0} does not exist (lines are numbered from 1)")]
    NoSuchLine(usize),

    #[error("Unrecognized input '{0}'")]
    BadInput(String),
}
