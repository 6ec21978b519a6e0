//! PGN parsing with recursive variation support.
//!
//! Every `( ... )` group becomes its own flat line replayable from the start
//! position. Nested groups are flattened into the same list, named after the
//! path of groups that contain them.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::PgnError;
use crate::game_data::{ParsedGame, Variation, MAIN_LINE_NAME};

pub const UNNAMED_GAME: &str = "Untitled game";
pub const UNNAMED_VARIATION: &str = "Variation";
pub const PATH_SEPARATOR: &str = " > ";
/// Deepest `(` nesting accepted; deeper text is rejected as malformed.
pub const MAX_VARIATION_DEPTH: usize = 256;

const RESULT_TOKENS: &[&str] = &["1-0", "0-1", "1/2-1/2", "*"];

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());
static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";[^\n]*").unwrap());
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\.+").unwrap());
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.+").unwrap());
static FIRST_MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\d+\.+\s*)?([KQRBNP]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|[O0]-[O0](?:-[O0])?)",
    )
    .unwrap()
});

/// Outcome of parsing a whole PGN text. Blocks are independent: a malformed
/// block is reported here and its siblings still parse.
#[derive(Debug, Clone, Default)]
pub struct PgnCollection {
    pub games: Vec<ParsedGame>,
    pub failures: Vec<BlockFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    /// Zero-based index of the block in the input.
    pub block: usize,
    pub error: PgnError,
}

/// Main line and variations of one (possibly nested) move text.
#[derive(Debug, Default)]
struct LineSet {
    main_line: Vec<String>,
    variations: Vec<Variation>,
}

/// Parse every game in `text`.
pub fn parse_pgn(text: &str) -> PgnCollection {
    let mut collection = PgnCollection::default();

    for (index, block) in split_blocks(text).iter().enumerate() {
        match parse_game(block) {
            Ok(game) => {
                debug!(block = index, lines = game.variations.len(), name = %game.name, "Parsed game block");
                collection.games.push(game);
            }
            Err(error) => {
                warn!(block = index, %error, "Skipping malformed game block");
                collection.failures.push(BlockFailure { block: index, error });
            }
        }
    }

    collection
}

/// Split text into game blocks. A header line that follows move text opens a
/// new block; blank blocks are dropped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut seen_moves = false;

    for line in text.lines() {
        let trimmed = line.trim();
        let is_header = trimmed.starts_with('[');
        if is_header && seen_moves {
            blocks.push(std::mem::take(&mut current));
            seen_moves = false;
        }
        if !is_header && !trimmed.is_empty() {
            seen_moves = true;
        }
        current.push_str(line);
        current.push('\n');
    }
    blocks.push(current);

    blocks.retain(|b| !b.trim().is_empty());
    blocks
}

/// Parse a single game block into its headers and lines.
pub fn parse_game(block: &str) -> Result<ParsedGame, PgnError> {
    let mut headers = BTreeMap::new();
    let mut move_lines = Vec::new();

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if let Some(cap) = HEADER_RE.captures(trimmed) {
                headers.insert(cap[1].to_string(), cap[2].to_string());
            }
        } else if !trimmed.is_empty() && !trimmed.starts_with('%') {
            move_lines.push(trimmed);
        }
    }

    let move_text = move_lines.join("\n");
    let move_text = COMMENT_RE.replace_all(&move_text, " ");
    let move_text = LINE_COMMENT_RE.replace_all(&move_text, " ");

    check_balance(&move_text)?;

    let lines = parse_lines(&move_text, &[], "");
    if lines.main_line.is_empty() {
        return Err(PgnError::MalformedInput("block has no moves".to_string()));
    }

    let mut variations = Vec::with_capacity(lines.variations.len() + 1);
    variations.push(Variation {
        name: MAIN_LINE_NAME.to_string(),
        moves: lines.main_line,
        deviation_point: None,
    });
    variations.extend(lines.variations);

    Ok(ParsedGame {
        name: game_name(&headers),
        headers,
        variations,
    })
}

fn check_balance(move_text: &str) -> Result<(), PgnError> {
    let mut depth = 0usize;
    for (pos, c) in move_text.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_VARIATION_DEPTH {
                    return Err(PgnError::MalformedInput(format!(
                        "variations nested deeper than {MAX_VARIATION_DEPTH} at offset {pos}"
                    )));
                }
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    PgnError::MalformedInput(format!("unmatched ')' at offset {pos}"))
                })?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(PgnError::MalformedInput(format!("{depth} unclosed '('")));
    }
    Ok(())
}

/// Walk balanced move text. `prefix` holds the moves leading up to this text,
/// `path` the name of the enclosing variation (empty at top level).
fn parse_lines(text: &str, prefix: &[String], path: &str) -> LineSet {
    let mut result = LineSet::default();
    let mut current: Vec<String> = prefix.to_vec();
    let mut buffer = String::new();
    let mut depth = 0usize;
    let mut group_start = 0usize;
    let mut branch_prefix: Vec<String> = Vec::new();
    let mut branch_number = 1u32;

    for (i, c) in text.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    current.extend(clean_moves(&buffer));
                    // The group replaces the last move played before it.
                    let deviating_ply = current.len().saturating_sub(1);
                    branch_prefix = current[..deviating_ply].to_vec();
                    branch_number = last_move_number(&buffer)
                        .unwrap_or((deviating_ply / 2 + 1) as u32);
                    buffer.clear();
                    group_start = i + 1;
                }
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &text[group_start..i];
                    let name = match first_move(inner) {
                        Some(mv) => format!("{branch_number}.{mv}"),
                        None => UNNAMED_VARIATION.to_string(),
                    };
                    let full_path = if path.is_empty() {
                        name
                    } else {
                        format!("{path}{PATH_SEPARATOR}{name}")
                    };

                    let nested = parse_lines(inner, &branch_prefix, &full_path);
                    result.variations.push(Variation {
                        name: full_path,
                        moves: nested.main_line,
                        deviation_point: Some(branch_number),
                    });
                    result.variations.extend(nested.variations);
                }
            }
            _ if depth == 0 => buffer.push(c),
            _ => {}
        }
    }

    current.extend(clean_moves(&buffer));
    result.main_line = current;
    result
}

/// The last `N.` token in `text`.
fn last_move_number(text: &str) -> Option<u32> {
    MOVE_NUMBER_RE
        .captures_iter(text)
        .last()
        .and_then(|cap| cap[1].parse().ok())
}

fn first_move(text: &str) -> Option<String> {
    FIRST_MOVE_RE
        .captures(text.trim())
        .map(|cap| cap[1].to_string())
}

/// Split move text into plies, dropping move numbers, results, NAGs and
/// `e.p.` markers.
fn clean_moves(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| LEADING_NUMBER_RE.replace(token, "").into_owned())
        .filter(|token| {
            !token.is_empty()
                && !RESULT_TOKENS.contains(&token.as_str())
                && !token.starts_with('$')
                && token != "e.p."
                && !token.chars().all(|c| c == '.')
        })
        .collect()
}

/// Human-readable game name from the headers.
pub fn game_name(headers: &BTreeMap<String, String>) -> String {
    let get = |key: &str| headers.get(key).map(String::as_str).filter(|v| !v.is_empty());

    if let Some(chapter) = get("ChapterName") {
        return chapter.to_string();
    }
    if let Some(opening) = get("Opening") {
        return opening.to_string();
    }
    match (get("Event"), get("White"), get("Black")) {
        (Some(event), Some(white), Some(black)) => format!("{event}: {white} vs {black}"),
        (Some(event), _, _) => event.to_string(),
        (None, Some(white), Some(black)) => format!("{white} vs {black}"),
        _ => UNNAMED_GAME.to_string(),
    }
}
