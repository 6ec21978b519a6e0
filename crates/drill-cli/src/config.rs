//! Drill configuration from environment variables

use std::env;
use std::path::PathBuf;

use drill_core::Color;

use crate::error::CliError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrillConfig {
    /// Default PGN file when none is passed on the command line
    pub pgn_path: Option<PathBuf>,

    /// Side the trainee plays
    pub color: Color,

    /// Print the board after every step
    pub show_board: bool,

    /// Seed for random line selection
    pub seed: Option<u64>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            pgn_path: None,
            color: Color::White,
            show_board: true,
            seed: None,
        }
    }
}

impl DrillConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pgn_path = lookup("DRILL_PGN")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let color = match lookup("DRILL_COLOR") {
            Some(v) => v
                .parse()
                .map_err(|e| CliError::Config(format!("DRILL_COLOR: {e}")))?,
            None => defaults.color,
        };

        let show_board = match lookup("DRILL_SHOW_BOARD") {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| CliError::Config(format!("DRILL_SHOW_BOARD: '{v}' is not a boolean")))?,
            None => defaults.show_board,
        };

        let seed = match lookup("DRILL_SEED") {
            Some(v) => Some(
                v.trim()
                    .parse()
                    .map_err(|_| CliError::Config(format!("DRILL_SEED: '{v}' is not a number")))?,
            ),
            None => None,
        };

        Ok(Self {
            pgn_path,
            color,
            show_board,
            seed,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
