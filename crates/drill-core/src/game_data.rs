use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAIN_LINE_NAME: &str = "Main line";

/// One replayable line: the main line or a flattened variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub name: String,
    pub moves: Vec<String>, // raw SAN, from the start position
    /// Move number where this line leaves its parent. None for the main line.
    pub deviation_point: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGame {
    /// Display name derived from the headers.
    pub name: String,
    pub headers: BTreeMap<String, String>,
    /// Main line first, then every variation in source order.
    pub variations: Vec<Variation>,
}

impl ParsedGame {
    pub fn main_line(&self) -> Option<&Variation> {
        self.variations.first()
    }

    /// Title shown when picking a line. Games with a single line use the game
    /// name alone.
    pub fn line_title(&self, index: usize) -> Option<String> {
        let variation = self.variations.get(index)?;
        if self.variations.len() == 1 {
            return Some(self.name.clone());
        }
        Some(format!("{} - {}", self.name, variation.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(lines: &[&str]) -> ParsedGame {
        ParsedGame {
            name: "Italian".to_string(),
            headers: BTreeMap::new(),
            variations: lines
                .iter()
                .map(|name| Variation {
                    name: name.to_string(),
                    moves: vec!["e4".to_string()],
                    deviation_point: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_line_titles() {
        let single = game(&[MAIN_LINE_NAME]);
        assert_eq!(single.line_title(0).as_deref(), Some("Italian"));

        let multi = game(&[MAIN_LINE_NAME, "3.Bc4"]);
        assert_eq!(multi.line_title(0).as_deref(), Some("Italian - Main line"));
        assert_eq!(multi.line_title(1).as_deref(), Some("Italian - 3.Bc4"));
        assert_eq!(multi.line_title(2), None);
    }

    #[test]
    fn test_serializes_to_json() {
        let value = serde_json::to_value(game(&[MAIN_LINE_NAME])).unwrap();
        assert_eq!(value["variations"][0]["moves"][0], "e4");
        assert!(value["variations"][0]["deviation_point"].is_null());
    }
}
