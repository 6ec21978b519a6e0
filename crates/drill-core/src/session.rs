//! Drill session: the trainee plays one side of a recorded line, the other
//! side is played back automatically.

use tracing::{debug, warn};

use crate::board::Board;
use crate::error::SessionError;
use crate::matcher::matches;
use crate::notation::{self, normalize};
use crate::repertoire::RepertoireLine;
use crate::resolver::{can_reach, reachable_squares, resolve, CastleSide, ResolvedMove};
use crate::types::{Color, PieceKind, Square};

/// What happened after a correct attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The recorded notation of the ply the trainee just played.
    pub played: String,
    /// Opponent plies played back afterwards.
    pub replies: Vec<String>,
    pub finished: bool,
}

/// Replay a whole line from the start position.
pub fn replay(moves: &[String]) -> Result<Board, SessionError> {
    let mut board = Board::new();
    for (ply, notation) in moves.iter().enumerate() {
        let mv = resolve(notation, Color::for_ply(ply), &board)
            .map_err(|source| SessionError::ScriptedPly { ply, source })?;
        board.apply(&mv);
    }
    Ok(board)
}

#[derive(Debug, Clone)]
pub struct TrainingSession {
    board: Board,
    title: String,
    moves: Vec<String>,
    player: Color,
    ply: usize,
}

impl TrainingSession {
    /// A session at the start position. Call [`TrainingSession::start`] to
    /// play the opponent's opening plies when the trainee has Black.
    pub fn new(line: &RepertoireLine, player: Color) -> Self {
        Self {
            board: Board::new(),
            title: line.title.clone(),
            moves: line.moves.clone(),
            player,
            ply: 0,
        }
    }

    /// Reset to the start position and play back opponent plies until it is
    /// the trainee's turn. Returns the plies played back. Also used to
    /// restart the same line from scratch.
    pub fn start(&mut self) -> Result<Vec<String>, SessionError> {
        self.board.reset();
        self.ply = 0;
        debug!(title = %self.title, player = %self.player, plies = self.moves.len(), "Starting drill");
        self.play_opponent()
    }


    /// Swap in another line (random mode) and start over.
    pub fn switch_line(&mut self, line: &RepertoireLine) -> Result<Vec<String>, SessionError> {
        self.title = line.title.clone();
        self.moves = line.moves.clone();
        self.start()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn player(&self) -> Color {
        self.player
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn ply_index(&self) -> usize {
        self.ply
    }

    /// Full-move number of the current ply.
    pub fn move_number(&self) -> usize {
        self.ply / 2 + 1
    }

    pub fn is_finished(&self) -> bool {
        self.ply >= self.moves.len()
    }

    pub fn is_player_turn(&self) -> bool {
        !self.is_finished() && Color::for_ply(self.ply) == self.player
    }

    /// The recorded notation expected next, used as a hint.
    pub fn expected(&self) -> Option<&str> {
        self.moves.get(self.ply).map(String::as_str)
    }

    /// Squares to highlight for the piece on `square`, including the castling
    /// destination of a king when the expected ply is a castle.
    pub fn valid_targets(&self, square: Square) -> Vec<Square> {
        let mut targets = reachable_squares(&self.board, square);

        let is_king = self
            .board
            .piece_at(square)
            .is_some_and(|p| p.kind == PieceKind::King);
        if is_king {
            if let Some(side) = self.expected().and_then(|e| CastleSide::from_notation(&normalize(e))) {
                let target = Square::new(square.rank, side.king_to_file());
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }

        targets
    }

    /// Try the trainee's move from `from` to `to`.
    ///
    /// On a match the move is committed and the opponent's reply (if any) is
    /// played back. On a mismatch the board is left untouched.
    pub fn attempt(&mut self, from: Square, to: Square) -> Result<StepReport, SessionError> {
        if self.is_finished() {
            return Err(SessionError::LineFinished);
        }
        if !self.is_player_turn() {
            return Err(SessionError::NotPlayerTurn);
        }

        let piece = self.board.piece_at(from).ok_or(SessionError::EmptySquare(from))?;
        if piece.color != self.player {
            return Err(SessionError::ForeignPiece(from));
        }

        let expected = self.moves[self.ply].clone();
        let promotion = notation::promotion(&expected);
        let mv = ResolvedMove::from_squares(&self.board, from, to, promotion)
            .ok_or(SessionError::EmptySquare(from))?;

        let attempted = match mv.castle {
            Some(side) => side.notation().to_string(),
            None => notation::build(from, to, &self.board, promotion)
                .ok_or(SessionError::EmptySquare(from))?,
        };

        if !self.is_reachable(&mv) || !matches(&attempted, &expected) {
            debug!(%attempted, %expected, ply = self.ply, "Attempt rejected");
            return Err(SessionError::AttemptMismatch { attempted, expected });
        }

        self.board.apply(&mv);
        self.ply += 1;
        let replies = self.play_opponent()?;

        Ok(StepReport {
            played: expected,
            replies,
            finished: self.is_finished(),
        })
    }

    /// Castling is judged by the matcher alone; every other move must obey
    /// piece geometry and may not land on an own piece.
    fn is_reachable(&self, mv: &ResolvedMove) -> bool {
        if mv.castle.is_some() {
            return true;
        }
        let own_target = self
            .board
            .piece_at(mv.to)
            .is_some_and(|p| p.color == mv.piece.color);
        !own_target && can_reach(mv.piece, mv.from, mv.to, mv.is_capture)
    }

    fn play_opponent(&mut self) -> Result<Vec<String>, SessionError> {
        let mut replies = Vec::new();

        while !self.is_finished() && Color::for_ply(self.ply) != self.player {
            let notation = &self.moves[self.ply];
            let mv = resolve(notation, Color::for_ply(self.ply), &self.board).map_err(|source| {
                warn!(ply = self.ply, %source, "Recorded ply does not resolve");
                SessionError::ScriptedPly { ply: self.ply, source }
            })?;
            debug!(ply = self.ply, %notation, from = %mv.from, to = %mv.to, "Opponent ply");
            self.board.apply(&mv);
            replies.push(notation.clone());
            self.ply += 1;
        }

        Ok(replies)
    }
}
