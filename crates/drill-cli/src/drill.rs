//! Interactive drill loop over a line-oriented reader.

use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use tracing::info;

use drill_core::{Repertoire, SessionError, Square, TrainingSession};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move { from: Square, to: Square },
    Hint,
    Board,
    Reset,
    Help,
    Quit,
}

/// Parse one line typed by the trainee. Moves are coordinates such as `e2e4`;
/// a trailing promotion letter (`e7e8q`) is accepted and the recorded
/// promotion piece is used.
pub fn parse_input(line: &str) -> Result<Input, CliError> {
    let text = line.trim().to_ascii_lowercase();
    match text.as_str() {
        "hint" | "h" => return Ok(Input::Hint),
        "board" | "b" => return Ok(Input::Board),
        "reset" | "r" => return Ok(Input::Reset),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "q" | "exit" => return Ok(Input::Quit),
        _ => {}
    }

    let bad = || CliError::BadInput(line.trim().to_string());
    if !(text.len() == 4 || (text.len() == 5 && text.ends_with(['q', 'r', 'b', 'n']))) {
        return Err(bad());
    }
    let from = text.get(0..2).and_then(Square::from_algebraic).ok_or_else(bad)?;
    let to = text.get(2..4).and_then(Square::from_algebraic).ok_or_else(bad)?;
    Ok(Input::Move { from, to })
}

const HELP: &str = "Enter moves as coordinates (e2e4, e7e8q). Commands: hint, board, reset, help, quit.";

pub struct Drill<'a> {
    repertoire: &'a Repertoire,
    session: TrainingSession,
    /// Present in random mode: every reset draws a new line.
    rng: Option<StdRng>,
    show_board: bool,
}

impl<'a> Drill<'a> {
    pub fn new(
        repertoire: &'a Repertoire,
        session: TrainingSession,
        rng: Option<StdRng>,
        show_board: bool,
    ) -> Self {
        Self {
            repertoire,
            session,
            rng,
            show_board,
        }
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    /// Drive the drill until the line ends, input runs out or the trainee quits.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "Line: {} (you play {})", self.session.title(), self.session.player())?;
        let opening = self.session.start()?;
        self.report_replies(&opening, out)?;
        self.prompt(out)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_input(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{e}. {HELP}")?;
                    continue;
                }
            };

            match command {
                Input::Quit => break,
                Input::Help => writeln!(out, "{HELP}")?,
                Input::Board => writeln!(out, "{}", self.session.board())?,
                Input::Hint => match self.session.expected() {
                    Some(expected) => writeln!(out, "Hint: {expected}")?,
                    None => writeln!(out, "The line is finished.")?,
                },
                Input::Reset => self.reset(out)?,
                Input::Move { from, to } => match self.session.attempt(from, to) {
                    Ok(step) => {
                        writeln!(out, "Correct: {}", step.played)?;
                        self.report_replies(&step.replies, out)?;
                    }
                    Err(SessionError::AttemptMismatch { attempted, .. }) => {
                        writeln!(out, "Wrong move ({attempted}). Try again.")?;
                    }
                    Err(e @ SessionError::ScriptedPly { .. }) => return Err(e.into()),
                    Err(e) => writeln!(out, "{e}")?,
                },
            }

            if self.session.is_finished() && !matches!(command, Input::Reset) {
                writeln!(out, "Line complete. Well played! Type 'reset' to go again or 'quit'.")?;
                continue;
            }
            self.prompt(out)?;
        }

        Ok(())
    }

    fn reset<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let replies = match self.rng.as_mut() {
            Some(rng) => {
                let index = self.repertoire.random_index(rng)?;
                let line = self.repertoire.line(index)?;
                info!(index, title = %line.title, "Random line selected");
                writeln!(out, "New line: {}", line.title)?;
                self.session.switch_line(line)?
            }
            None => self.session.start()?,
        };
        self.report_replies(&replies, out)
    }

    fn report_replies<W: Write>(&self, replies: &[String], out: &mut W) -> anyhow::Result<()> {
        if !replies.is_empty() {
            writeln!(out, "Opponent plays: {}", replies.join(" "))?;
        }
        if self.show_board {
            writeln!(out, "{}", self.session.board())?;
        }
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if self.session.is_player_turn() {
            write!(out, "Move {}> ", self.session.move_number())?;
            out.flush()?;
        }
        Ok(())
    }
}
