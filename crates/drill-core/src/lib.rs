//! Opening drill core: PGN variation parsing, notation resolution and
//! matching, and the drill session that ties them to a board.
//!
//! All operations are synchronous and own their state; a [`Board`] belongs
//! to exactly one [`TrainingSession`].

pub mod board;
pub mod error;
pub mod game_data;
pub mod matcher;
pub mod notation;
pub mod pgn;
pub mod repertoire;
pub mod resolver;
pub mod session;
pub mod types;

pub use board::Board;
pub use error::{PgnError, ResolveError, SessionError};
pub use game_data::{ParsedGame, Variation};
pub use matcher::matches;
pub use pgn::{parse_game, parse_pgn, PgnCollection};
pub use repertoire::{Repertoire, RepertoireLine};
pub use resolver::{resolve, CastleSide, ResolvedMove};
pub use session::{replay, StepReport, TrainingSession};
pub use types::{Color, Piece, PieceKind, Square};
