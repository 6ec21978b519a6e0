//! Opening drill CLI
//!
//! Loads a PGN file, lists or checks its lines, or drills one line
//! interactively on stdin.

mod config;
mod drill;
mod error;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use drill_core::{replay, Color, Repertoire, TrainingSession};

use crate::config::DrillConfig;
use crate::drill::Drill;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "drill")]
#[command(about = "Drill chess opening lines recorded in PGN files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every line (main lines and variations) in a PGN file
    List {
        /// PGN file (defaults to DRILL_PGN)
        #[arg(value_name = "PGN")]
        pgn: Option<PathBuf>,

        /// Print the lines as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay every line and report moves that cannot be resolved
    Check {
        #[arg(value_name = "PGN")]
        pgn: Option<PathBuf>,
    },

    /// Drill one line interactively
    Drill {
        #[arg(value_name = "PGN")]
        pgn: Option<PathBuf>,

        /// Side you play (defaults to DRILL_COLOR, then white)
        #[arg(short, long)]
        color: Option<Color>,

        /// Line number as shown by `list`
        #[arg(short, long, conflicts_with = "random")]
        line: Option<usize>,

        /// Pick a random line, and a new one on every reset
        #[arg(long)]
        random: bool,

        /// Seed for --random (defaults to DRILL_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Do not print the board after each step
        #[arg(long)]
        no_board: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Load .env file for local use
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DrillConfig::from_env()?;

    match cli.command {
        Command::List { pgn, json } => {
            let repertoire = load_repertoire(pgn, &config)?;
            list(&repertoire, json)
        }
        Command::Check { pgn } => {
            let repertoire = load_repertoire(pgn, &config)?;
            check(&repertoire)
        }
        Command::Drill {
            pgn,
            color,
            line,
            random,
            seed,
            no_board,
        } => {
            let repertoire = load_repertoire(pgn, &config)?;
            let color = color.unwrap_or(config.color);
            let show_board = config.show_board && !no_board;

            let mut rng = random.then(|| match seed.or(config.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            });

            let index = match (line, rng.as_mut()) {
                (Some(0), _) => return Err(CliError::NoSuchLine(0).into()),
                (Some(n), _) => n - 1,
                (None, Some(rng)) => repertoire.random_index(rng)?,
                (None, None) => 0,
            };
            let selected = repertoire
                .line(index)
                .map_err(|_| CliError::NoSuchLine(index + 1))?;
            info!(index = index + 1, title = %selected.title, %color, "Starting drill");

            let session = TrainingSession::new(selected, color);
            let mut drill = Drill::new(&repertoire, session, rng, show_board);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            drill.run(stdin.lock(), &mut stdout)?;
            info!(
                finished = drill.session().is_finished(),
                ply = drill.session().ply_index(),
                "Drill ended"
            );
            Ok(())
        }
    }
}

fn load_repertoire(pgn: Option<PathBuf>, config: &DrillConfig) -> anyhow::Result<Repertoire> {
    let path = pgn
        .or_else(|| config.pgn_path.clone())
        .ok_or(CliError::MissingPgn)?;
    let text = read_pgn(&path)?;
    let repertoire = Repertoire::from_pgn(&text);

    for failure in repertoire.failures() {
        warn!(block = failure.block + 1, error = %failure.error, "Skipped game");
    }
    info!(path = %path.display(), lines = repertoire.len(), "Loaded PGN");
    Ok(repertoire)
}

fn read_pgn(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn list(repertoire: &Repertoire, json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    if json {
        let value = serde_json::to_string_pretty(repertoire.lines())
            .context("Failed to serialize lines")?;
        writeln!(stdout, "{value}")?;
        return Ok(());
    }

    if repertoire.is_empty() {
        writeln!(stdout, "No lines found.")?;
    }
    for (i, line) in repertoire.lines().iter().enumerate() {
        let deviation = line
            .deviation_point
            .map(|n| format!(" (from move {n})"))
            .unwrap_or_default();
        writeln!(
            stdout,
            "{:>3}. {}{} - {} plies",
            i + 1,
            line.title,
            deviation,
            line.moves.len()
        )?;
    }
    for failure in repertoire.failures() {
        writeln!(stdout, "  game block {} skipped: {}", failure.block + 1, failure.error)?;
    }
    Ok(())
}

fn check(repertoire: &Repertoire) -> anyhow::Result<()> {
    let mut broken = 0usize;

    for (i, line) in repertoire.lines().iter().enumerate() {
        if let Err(e) = replay(&line.moves) {
            broken += 1;
            println!("{:>3}. {}: {}", i + 1, line.title, e);
        }
    }

    if broken > 0 || !repertoire.failures().is_empty() {
        anyhow::bail!(
            "{broken} of {} lines do not replay, {} game blocks malformed",
            repertoire.len(),
            repertoire.failures().len()
        );
    }
    println!("All {} lines replay cleanly.", repertoire.len());
    Ok(())
}
