//! Flat, selectable list of every line across every parsed game.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SessionError;
use crate::game_data::ParsedGame;
use crate::pgn::{parse_pgn, BlockFailure};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepertoireLine {
    pub title: String,
    /// Index of the source game among the successfully parsed games.
    pub game: usize,
    pub headers: BTreeMap<String, String>,
    pub moves: Vec<String>,
    pub deviation_point: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Repertoire {
    lines: Vec<RepertoireLine>,
    failures: Vec<BlockFailure>,
}

impl Repertoire {
    pub fn from_pgn(text: &str) -> Self {
        let collection = parse_pgn(text);
        let mut repertoire = Self::from_games(&collection.games);
        repertoire.failures = collection.failures;
        repertoire
    }

    pub fn from_games(games: &[ParsedGame]) -> Self {
        let lines = games
            .iter()
            .enumerate()
            .flat_map(|(game_index, game)| {
                game.variations.iter().enumerate().map(move |(i, variation)| RepertoireLine {
                    title: game.line_title(i).unwrap_or_else(|| variation.name.clone()),
                    game: game_index,
                    headers: game.headers.clone(),
                    moves: variation.moves.clone(),
                    deviation_point: variation.deviation_point,
                })
            })
            .collect();

        Self {
            lines,
            failures: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[RepertoireLine] {
        &self.lines
    }

    /// Blocks of the source text that were rejected as malformed.
    pub fn failures(&self) -> &[BlockFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RepertoireLine> {
        self.lines.get(index)
    }

    pub fn line(&self, index: usize) -> Result<&RepertoireLine, SessionError> {
        if self.lines.is_empty() {
            return Err(SessionError::EmptyRepertoire);
        }
        self.lines.get(index).ok_or(SessionError::LineOutOfRange(index))
    }

    /// Uniformly random line index, for random drill mode.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SessionError> {
        if self.lines.is_empty() {
            return Err(SessionError::EmptyRepertoire);
        }
        Ok(rng.gen_range(0..self.lines.len()))
    }
}
