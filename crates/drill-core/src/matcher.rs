//! Equivalence of two move notations.

use crate::notation::{destination_token, normalize};

fn piece_letter(notation: &str) -> Option<char> {
    notation
        .chars()
        .next()
        .filter(|c| matches!(c, 'K' | 'Q' | 'R' | 'B' | 'N'))
}

fn source_file(notation: &str) -> Option<char> {
    notation.chars().next().filter(|c| matches!(c, 'a'..='h'))
}

/// Whether `a` and `b` denote the same move.
///
/// After normalization, identical strings match. Otherwise the destination
/// squares must agree; piece moves then match on their letter alone, and
/// pawn moves must agree on capture-or-not, plus the source file when both
/// capture. A pawn move never matches a piece move.
pub fn matches(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return true;
    }

    match (destination_token(&a), destination_token(&b)) {
        (Some(da), Some(db)) if da == db => {}
        _ => return false,
    }

    match (piece_letter(&a), piece_letter(&b)) {
        (Some(pa), Some(pb)) => pa == pb,
        (None, None) => {
            let capture_a = a.contains('x');
            let capture_b = b.contains('x');
            if capture_a != capture_b {
                return false;
            }
            if capture_a {
                return source_file(&a) == source_file(&b);
            }
            true
        }
        _ => false,
    }
}
