//! Mutable 8x8 board. No move history, no legality state.

use std::fmt;

use crate::resolver::ResolvedMove;
use crate::types::{Color, Piece, PieceKind, Square};

const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// Build a board from the piece-placement field of a FEN string.
    /// Returns None if the field does not describe exactly 8x8 cells.
    pub fn from_placement(placement: &str) -> Option<Self> {
        let mut board = Self::empty();
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return None;
        }
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_fen_char(c)?;
                    if file >= 8 {
                        return None;
                    }
                    board.cells[rank][file] = Some(piece);
                    file += 1;
                }
            }
            if file != 8 {
                return None;
            }
        }
        Some(board)
    }

    /// Restore the standard starting position.
    pub fn reset(&mut self) {
        if let Some(start) = Self::from_placement(START_PLACEMENT) {
            self.cells = start.cells;
        }
    }

    /// None for empty and off-board squares alike.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells
            .get(square.rank as usize)
            .and_then(|row| row.get(square.file as usize))
            .copied()
            .flatten()
    }

    /// Off-board squares are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(cell) = self
            .cells
            .get_mut(square.rank as usize)
            .and_then(|row| row.get_mut(square.file as usize))
        {
            *cell = piece;
        }
    }

    /// Apply a resolved move. Any two squares may be connected; the only
    /// side effects beyond from/to are the en passant victim, the castling
    /// rook and the promoted piece.
    pub fn apply(&mut self, mv: &ResolvedMove) {
        if let Some(side) = mv.castle {
            let rank = mv.from.rank;
            self.set(mv.from, None);
            self.set(Square::new(rank, side.rook_from_file()), None);
            self.set(mv.to, Some(mv.piece));
            self.set(
                Square::new(rank, side.rook_to_file()),
                Some(Piece::new(PieceKind::Rook, mv.piece.color)),
            );
            return;
        }

        if mv.is_en_passant {
            self.set(Square::new(mv.from.rank, mv.to.file), None);
        }

        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, mv.piece.color),
            None => mv.piece,
        };
        self.set(mv.from, None);
        self.set(mv.to, Some(placed));
    }

    /// Squares holding a piece of the given color, in scan order.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|p| p.color == color)
                .map(|p| (sq, p))
        })
    }

    /// FEN piece-placement field.
    pub fn placement(&self) -> String {
        let mut out = String::new();
        for (rank, row) in self.cells.iter().enumerate() {
            let mut empty = 0;
            for cell in row {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank < 7 {
                out.push('/');
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - rank)?;
            for cell in row {
                let c = cell.map(|p| p.fen_char()).unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CastleSide;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_start_position() {
        let board = Board::new();
        assert_eq!(board.placement(), START_PLACEMENT);
        assert_eq!(
            board.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(board.piece_at(sq("e4")), None);
        assert_eq!(board.occupied_by(Color::White).count(), 16);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut board = Board::new();
        board.set(sq("e2"), None);
        board.set(sq("e4"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_ne!(board, Board::new());
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_off_board_squares_are_empty() {
        let mut board = Board::new();
        let off = Square::new(8, 0);
        assert_eq!(board.piece_at(off), None);
        board.set(off, Some(Piece::new(PieceKind::Queen, Color::White)));
        board.set(Square::new(0, 200), None);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_from_placement_rejects_bad_rows() {
        assert!(Board::from_placement("8/8/8").is_none());
        assert!(Board::from_placement("9/8/8/8/8/8/8/8").is_none());
        assert!(Board::from_placement("7/8/8/8/8/8/8/8").is_none());
        assert_eq!(Board::from_placement("8/8/8/8/8/8/8/8"), Some(Board::empty()));
    }

    #[test]
    fn test_apply_en_passant_clears_victim() {
        let mut board = Board::from_placement("8/8/8/3pP3/8/8/8/8").unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        board.apply(&ResolvedMove {
            from: sq("e5"),
            to: sq("d6"),
            piece: pawn,
            is_capture: true,
            castle: None,
            promotion: None,
            is_en_passant: true,
        });
        assert_eq!(board.piece_at(sq("d6")), Some(pawn));
        assert_eq!(board.piece_at(sq("d5")), None);
        assert_eq!(board.piece_at(sq("e5")), None);
    }

    #[test]
    fn test_apply_promotion_and_castle() {
        let mut board = Board::from_placement("8/4P3/8/8/8/8/8/R3K3").unwrap();
        board.apply(&ResolvedMove {
            from: sq("e7"),
            to: sq("e8"),
            piece: Piece::new(PieceKind::Pawn, Color::White),
            is_capture: false,
            castle: None,
            promotion: Some(PieceKind::Queen),
            is_en_passant: false,
        });
        assert_eq!(
            board.piece_at(sq("e8")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );

        board.apply(&ResolvedMove {
            from: sq("e1"),
            to: sq("c1"),
            piece: Piece::new(PieceKind::King, Color::White),
            is_capture: false,
            castle: Some(CastleSide::Queenside),
            promotion: None,
            is_en_passant: false,
        });
        assert_eq!(board.placement(), "4Q3/8/8/8/8/8/8/2KR4");
    }

    #[test]
    fn test_display_diagram() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
