//! Shared PGN fixtures and helpers for the integration tests.
#![allow(dead_code)]

use drill_core::{Color, Piece, PieceKind, Square};

/// Italian Game with a variation holding a nested variation.
pub const ITALIAN: &str = r#"[Event "Italian Game repertoire"]
[White "Repertoire"]
[Black "Sparring"]
[Opening "Italian Game"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 {Giuoco Piano} (3... Nf6 4. d3 (4. Ng5 d5 5. exd5 Na5) 4... Be7)
4. c3 Nf6 5. d4 exd4 6. cxd4 Bb4+ 7. Bd2 Bxd2+ 8. Nbxd2 d5 *
"#;

/// Queen's Gambit Declined: black castles with zero spelling, white castles long in a side line.
pub const QGD: &str = r#"[Event "QGD"]
[White "Alpha"]
[Black "Beta"]
[Result "*"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 0-0 6. Nf3 (6. Qc2 h6 7. Bh4 b6 8. O-O-O) 6... h6
7. Bh4 b6 8. cxd5 Nxd5 9. Bxe7 Qxe7 10. Nxd5 exd5 *
"#;

/// Alekhine-style line with an en passant capture.
pub const EN_PASSANT: &str = r#"[Event "En passant"]

1. e4 Nf6 2. e5 d5 3. exd6 cxd6 4. d4 g6 5. c4 Bg7 6. Nc3 O-O 7. Be2 Nc6 8. Nf3 Bg4 *
"#;

/// Pawn runs up the a-file and promotes on a8.
pub const PROMOTION: &str = r#"[Event "Promotion"]

1. a4 b5 2. axb5 a6 3. bxa6 Bb7 4. axb7 Nc6 5. bxa8=Q Qxa8 *
"#;

pub fn all_fixtures() -> Vec<(&'static str, &'static str)> {
    vec![
        ("italian", ITALIAN),
        ("qgd", QGD),
        ("en_passant", EN_PASSANT),
        ("promotion", PROMOTION),
    ]
}

/// Every fixture concatenated into one PGN text.
pub fn combined() -> String {
    all_fixtures()
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap_or_else(|| panic!("bad square {s}"))
}

pub fn strings(moves: &[&str]) -> Vec<String> {
    moves.iter().map(|s| s.to_string()).collect()
}

pub fn to_shakmaty_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        shakmaty::File::new(square.file as u32),
        shakmaty::Rank::new(7 - square.rank as u32),
    )
}

pub fn from_shakmaty_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        shakmaty::Role::Pawn => PieceKind::Pawn,
        shakmaty::Role::Knight => PieceKind::Knight,
        shakmaty::Role::Bishop => PieceKind::Bishop,
        shakmaty::Role::Rook => PieceKind::Rook,
        shakmaty::Role::Queen => PieceKind::Queen,
        shakmaty::Role::King => PieceKind::King,
    };
    let color = match piece.color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    };
    Piece::new(kind, color)
}
