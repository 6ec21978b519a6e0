//! Notation normalization and the canonical notation builder.

use regex::Regex;
use std::sync::LazyLock;

use crate::board::Board;
use crate::types::{PieceKind, Square};

static SQUARE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-h][1-8]").unwrap());

/// Drop check, mate and annotation glyphs (`+ # ! ?`).
pub fn strip_annotations(notation: &str) -> String {
    notation
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | '!' | '?'))
        .collect()
}

/// Rewrite zero-spelled castling (`0-0`, `0-0-0`) with letter O.
pub fn normalize_castling(notation: &str) -> String {
    notation.replace("0-0-0", "O-O-O").replace("0-0", "O-O")
}

/// Annotation stripping followed by castling normalization.
pub fn normalize(notation: &str) -> String {
    normalize_castling(&strip_annotations(notation.trim()))
}

/// The trailing file+rank token of a notation, if any.
pub fn destination_token(notation: &str) -> Option<&str> {
    SQUARE_RE.find_iter(notation).last().map(|m| m.as_str())
}

pub fn destination(notation: &str) -> Option<Square> {
    destination_token(notation).and_then(Square::from_algebraic)
}

/// Piece named by an `=X` promotion suffix.
pub fn promotion(notation: &str) -> Option<PieceKind> {
    let (_, suffix) = notation.split_once('=')?;
    suffix
        .chars()
        .next()
        .and_then(PieceKind::from_letter)
        .filter(|kind| !matches!(kind, PieceKind::Pawn | PieceKind::King))
}

/// Canonical notation for moving whatever stands on `from` to `to`.
///
/// Pawns carry their source file only when capturing or changing file, which
/// also covers en passant; a pawn changing file is written as a capture.
/// Other pieces carry their letter and never a disambiguator.
/// Returns None when `from` is empty.
pub fn build(from: Square, to: Square, board: &Board, promotion: Option<PieceKind>) -> Option<String> {
    let piece = board.piece_at(from)?;
    let occupied = board.piece_at(to).is_some();
    let mut notation = String::new();

    if piece.kind == PieceKind::Pawn {
        let changes_file = from.file != to.file;
        if occupied || changes_file {
            notation.push(from.file_char());
            notation.push('x');
        }
    } else {
        notation.push(piece.kind.letter());
        if occupied {
            notation.push('x');
        }
    }

    notation.push_str(&to.to_string());

    if piece.kind == PieceKind::Pawn {
        if let Some(kind) = promotion {
            notation.push('=');
            notation.push(kind.letter());
        }
    }

    Some(notation)
}
