//! Resolve algebraic notation against a board into concrete squares.
//!
//! Reachability is pure piece geometry: no check, pin or path-blocking
//! awareness. When several pieces qualify, the first one in row-major scan
//! order (rank 0 first) wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::board::Board;
use crate::error::ResolveError;
use crate::notation::normalize;
use crate::types::{Color, Piece, PieceKind, Square};

static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<piece>[KQRBNP])?(?P<file>[a-h])?(?P<rank>[1-8])?(?P<capture>x)?(?P<dest>[a-h][1-8])(?:=?(?P<promo>[QRBN]))?$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Recognizes `O-O` / `O-O-O` after normalization.
    pub fn from_notation(notation: &str) -> Option<Self> {
        match notation {
            "O-O" => Some(CastleSide::Kingside),
            "O-O-O" => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }

    pub fn king_to_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    pub fn rook_from_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    pub fn rook_to_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

/// A move with concrete squares, ready for [`Board::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub is_capture: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub is_en_passant: bool,
}

impl ResolvedMove {
    /// King and rook relocation for `color` on its back rank.
    pub fn castle(side: CastleSide, color: Color) -> Self {
        let rank = color.back_rank();
        Self {
            from: Square::new(rank, 4),
            to: Square::new(rank, side.king_to_file()),
            piece: Piece::new(PieceKind::King, color),
            is_capture: false,
            castle: Some(side),
            promotion: None,
            is_en_passant: false,
        }
    }

    /// Build a move from raw coordinates, as produced by a click or drag.
    ///
    /// A king moving two files castles; a pawn changing file onto an empty
    /// square captures en passant. Returns None when `from` is empty.
    pub fn from_squares(
        board: &Board,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Self> {
        let piece = board.piece_at(from)?;

        if piece.kind == PieceKind::King && from.rank == to.rank && from.file.abs_diff(to.file) == 2 {
            let side = if to.file > from.file {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            return Some(Self {
                from,
                to,
                piece,
                is_capture: false,
                castle: Some(side),
                promotion: None,
                is_en_passant: false,
            });
        }

        let occupied = board.piece_at(to).is_some();
        let is_pawn = piece.kind == PieceKind::Pawn;
        let is_en_passant = is_pawn && from.file != to.file && !occupied;

        Some(Self {
            from,
            to,
            piece,
            is_capture: occupied || is_en_passant,
            castle: None,
            promotion: promotion.filter(|_| is_pawn),
            is_en_passant,
        })
    }
}

/// Whether `piece` standing on `from` can geometrically reach `to`.
pub fn can_reach(piece: Piece, from: Square, to: Square, is_capture: bool) -> bool {
    let d_rank = to.rank as i8 - from.rank as i8;
    let d_file = to.file as i8 - from.file as i8;
    let (abs_rank, abs_file) = (d_rank.unsigned_abs(), d_file.unsigned_abs());

    match piece.kind {
        PieceKind::Pawn => {
            let forward = piece.color.forward();
            if is_capture {
                abs_file == 1 && d_rank == forward
            } else {
                d_file == 0
                    && (d_rank == forward
                        || (d_rank == 2 * forward && from.rank == piece.color.pawn_start_rank()))
            }
        }
        PieceKind::Knight => matches!((abs_rank, abs_file), (1, 2) | (2, 1)),
        PieceKind::Bishop => abs_rank == abs_file && abs_rank > 0,
        PieceKind::Rook => (abs_rank == 0) != (abs_file == 0),
        PieceKind::Queen => {
            (abs_rank == abs_file && abs_rank > 0) || ((abs_rank == 0) != (abs_file == 0))
        }
        PieceKind::King => abs_rank <= 1 && abs_file <= 1 && (abs_rank, abs_file) != (0, 0),
    }
}

/// Squares the piece on `from` could move to, judging capture by occupancy.
/// Squares held by the mover's own pieces are left out.
pub fn reachable_squares(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    Square::all()
        .filter(|to| {
            let target = board.piece_at(*to);
            if target.is_some_and(|t| t.color == piece.color) {
                return false;
            }
            can_reach(piece, from, *to, target.is_some())
        })
        .collect()
}

/// Resolve `notation` for the side `color` on `board`.
pub fn resolve(notation: &str, color: Color, board: &Board) -> Result<ResolvedMove, ResolveError> {
    let no_match = || ResolveError::NoMatchingOrigin(notation.to_string());
    let clean = normalize(notation);

    if let Some(side) = CastleSide::from_notation(&clean) {
        return Ok(ResolvedMove::castle(side, color));
    }

    let caps = SAN_RE.captures(&clean).ok_or_else(no_match)?;
    let to = Square::from_algebraic(&caps["dest"]).ok_or_else(no_match)?;

    let kind = caps
        .name("piece")
        .and_then(|m| m.as_str().chars().next())
        .and_then(PieceKind::from_letter)
        .unwrap_or(PieceKind::Pawn);
    let file_hint = caps.name("file").map(|m| m.as_str().as_bytes()[0] - b'a');
    let rank_hint = caps.name("rank").map(|m| b'8' - m.as_str().as_bytes()[0]);
    let promotion = caps
        .name("promo")
        .and_then(|m| m.as_str().chars().next())
        .and_then(PieceKind::from_letter);

    // A pawn naming another file is capturing even when the x is omitted.
    let is_capture = caps.name("capture").is_some()
        || (kind == PieceKind::Pawn && file_hint.is_some_and(|f| f != to.file));

    let piece = Piece::new(kind, color);
    let from = board
        .occupied_by(color)
        .filter(|(_, p)| p.kind == kind)
        .map(|(sq, _)| sq)
        .filter(|sq| file_hint.map_or(true, |f| sq.file == f))
        .filter(|sq| rank_hint.map_or(true, |r| sq.rank == r))
        .find(|sq| can_reach(piece, *sq, to, is_capture))
        .ok_or_else(no_match)?;

    let is_en_passant = kind == PieceKind::Pawn && is_capture && board.piece_at(to).is_none();

    Ok(ResolvedMove {
        from,
        to,
        piece,
        is_capture,
        castle: None,
        promotion: promotion.filter(|_| kind == PieceKind::Pawn),
        is_en_passant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_pawn_double_step_only_from_start_rank() {
        let mut board = Board::new();
        let mv = resolve("e4", Color::White, &board).unwrap();
        assert_eq!((mv.from, mv.to), (sq("e2"), sq("e4")));
        assert!(!mv.is_capture);

        board.set(sq("e2"), None);
        board.set(sq("e3"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_eq!(
            resolve("e4", Color::White, &board),
            Err(ResolveError::NoMatchingOrigin("e4".to_string()))
        );
    }

    #[test]
    fn test_black_pawn_moves_down() {
        let board = Board::new();
        let mv = resolve("c5", Color::Black, &board).unwrap();
        assert_eq!((mv.from, mv.to), (sq("c7"), sq("c5")));
    }

    #[test]
    fn test_file_hint_beats_scan_order() {
        // Knights on b1 and f1 both reach d2; f1 comes later in the scan but
        // an explicit hint must still select b1, and vice versa.
        let board = Board::from_placement("8/8/8/8/8/8/8/1N3N2").unwrap();
        assert_eq!(resolve("Nbd2", Color::White, &board).unwrap().from, sq("b1"));
        assert_eq!(resolve("Nfd2", Color::White, &board).unwrap().from, sq("f1"));
    }

    #[test]
    fn test_rank_hint() {
        let board = Board::from_placement("R7/8/8/8/8/8/8/R7").unwrap();
        assert_eq!(resolve("R1a3", Color::White, &board).unwrap().from, sq("a1"));
        assert_eq!(resolve("R8a3", Color::White, &board).unwrap().from, sq("a8"));
    }

    #[test]
    fn test_ambiguity_picks_first_in_scan_order() {
        // Without a hint both rooks qualify; a8 is scanned first.
        let board = Board::from_placement("R7/8/8/8/8/8/8/R7").unwrap();
        assert_eq!(resolve("Ra3", Color::White, &board).unwrap().from, sq("a8"));
    }

    #[test]
    fn test_sliders_ignore_blockers() {
        // The b2 pawn sits between c1 and a3; the bishop is still found.
        let board = Board::new();
        let mv = resolve("Ba3", Color::White, &board).unwrap();
        assert_eq!(mv.from, sq("c1"));
    }

    #[test]
    fn test_pawn_capture_uses_source_file() {
        let board = Board::from_placement("8/8/8/3p4/2P1P3/8/8/8").unwrap();
        let mv = resolve("exd5", Color::White, &board).unwrap();
        assert_eq!(mv.from, sq("e4"));
        assert!(mv.is_capture);
        assert!(!mv.is_en_passant);
        assert_eq!(resolve("cxd5", Color::White, &board).unwrap().from, sq("c4"));
    }

    #[test]
    fn test_en_passant_detected_on_empty_destination() {
        let board = Board::from_placement("8/8/8/3pP3/8/8/8/8").unwrap();
        let mv = resolve("exd6", Color::White, &board).unwrap();
        assert!(mv.is_en_passant);
        assert_eq!(mv.from, sq("e5"));
    }

    #[test]
    fn test_promotion_suffix() {
        let board = Board::from_placement("8/8/8/8/8/8/3p4/8").unwrap();
        let mv = resolve("d1=N+", Color::Black, &board).unwrap();
        assert_eq!(mv.from, sq("d2"));
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn test_castling_both_spellings() {
        let board = Board::new();
        let short = resolve("O-O", Color::White, &board).unwrap();
        assert_eq!((short.from, short.to), (sq("e1"), sq("g1")));
        assert_eq!(short.castle, Some(CastleSide::Kingside));

        let long = resolve("0-0-0", Color::Black, &board).unwrap();
        assert_eq!((long.from, long.to), (sq("e8"), sq("c8")));
        assert_eq!(long.castle, Some(CastleSide::Queenside));
    }

    #[test]
    fn test_unresolvable_notation() {
        let board = Board::new();
        assert!(resolve("Nf6", Color::White, &board).is_err());
        assert!(resolve("xyz", Color::White, &board).is_err());
        assert!(resolve("", Color::White, &board).is_err());
    }

    #[test]
    fn test_geometry() {
        let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
        assert!(can_reach(white_pawn, sq("e2"), sq("e3"), false));
        assert!(!can_reach(white_pawn, sq("e2"), sq("e1"), false));
        assert!(can_reach(white_pawn, sq("e4"), sq("f5"), true));
        assert!(!can_reach(white_pawn, sq("e4"), sq("f5"), false));

        let queen = Piece::new(PieceKind::Queen, Color::White);
        assert!(can_reach(queen, sq("d1"), sq("h5"), false));
        assert!(can_reach(queen, sq("d1"), sq("d8"), false));
        assert!(!can_reach(queen, sq("d1"), sq("e3"), false));
        assert!(!can_reach(queen, sq("d1"), sq("d1"), false));

        let king = Piece::new(PieceKind::King, Color::Black);
        assert!(can_reach(king, sq("e8"), sq("f7"), false));
        assert!(!can_reach(king, sq("e8"), sq("g8"), false));
    }

    #[test]
    fn test_reachable_squares_from_start() {
        let board = Board::new();
        let mut knight = reachable_squares(&board, sq("g1"));
        knight.sort_by_key(|s| (s.rank, s.file));
        assert_eq!(knight, vec![sq("f3"), sq("h3")]);
        assert_eq!(reachable_squares(&board, sq("e2")), vec![sq("e4"), sq("e3")]);
        assert!(reachable_squares(&board, sq("e4")).is_empty());
    }

    #[test]
    fn test_from_squares() {
        let board = Board::new();
        let castle = ResolvedMove::from_squares(&board, sq("e1"), sq("g1"), None).unwrap();
        assert_eq!(castle.castle, Some(CastleSide::Kingside));

        let push = ResolvedMove::from_squares(&board, sq("d2"), sq("d4"), Some(PieceKind::Queen)).unwrap();
        assert_eq!(push.promotion, Some(PieceKind::Queen));
        assert!(!push.is_capture);

        let knight = ResolvedMove::from_squares(&board, sq("b1"), sq("c3"), Some(PieceKind::Queen)).unwrap();
        assert_eq!(knight.promotion, None);
        assert!(ResolvedMove::from_squares(&board, sq("e4"), sq("e5"), None).is_none());
    }
}
