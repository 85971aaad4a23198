//! Tactica terminal trainer.
//!
//! Reads moves such as `e2e4` or `e7e8q` from standard input and replays the
//! puzzle line against them. Type `help` for the other commands.

use std::{
    io::{self, BufRead as _},
    path::PathBuf,
    process::ExitCode,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Instant,
};

use clap::Parser;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use tactica_app::{
    board_view::{BoardView, TerminalBoard},
    settings::{LineStart, OnWrong, SIMULATED_USER_RATING, SelectionMode, Settings, SettingsError},
    trainer::Trainer,
};
use tactica_catalog::{Catalog, LoadError, SourceFormat, ValidationPolicy, source};
use tactica_core::codec;

const HELP: &str = "\
commands:
  <move>   play a move, e.g. e2e4 or e7e8q
  next     skip to the next puzzle
  flip     turn the board around
  board    show the board
  status   show the puzzle status
  quit     leave";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Puzzle data file (JSON). The bundled starter set is used if omitted.
    #[arg(long)]
    puzzles: Option<PathBuf>,
    /// Shape of the puzzle data file.
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,
    /// Skip invalid puzzle records instead of refusing the whole file.
    #[arg(long)]
    skip_invalid: bool,
    /// Settings file (JSON). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Target puzzle rating.
    #[arg(long, conflicts_with = "signed_in")]
    rating: Option<u32>,
    /// Use the signed-in player's rating as the target.
    #[arg(long)]
    signed_in: bool,
    /// Accepted distance from the target rating.
    #[arg(long)]
    tolerance: Option<u32>,
    /// How puzzles are chosen.
    #[arg(long, value_enum)]
    mode: Option<SelectionMode>,
    /// What happens after a wrong move.
    #[arg(long, value_enum)]
    on_wrong: Option<OnWrong>,
    /// Who plays the first move of each solution line.
    #[arg(long, value_enum)]
    line: Option<LineStart>,
    /// Delay before the opponent replies, in milliseconds.
    #[arg(long)]
    reply_delay_ms: Option<u64>,
    /// Delay before the next puzzle after a solve, in milliseconds.
    #[arg(long)]
    advance_delay_ms: Option<u64>,
    /// Seed for reproducible puzzle selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Auto,
    Embedded,
    Lichess,
}

impl From<Format> for SourceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => Self::Auto,
            Format::Embedded => Self::Embedded,
            Format::Lichess => Self::Lichess,
        }
    }
}

impl Args {
    fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_path(path)?,
            None => Settings::default(),
        };
        if self.signed_in {
            settings.selection.target_rating = SIMULATED_USER_RATING;
        }
        if let Some(rating) = self.rating {
            settings.selection.target_rating = rating;
        }
        if let Some(tolerance) = self.tolerance {
            settings.selection.tolerance = tolerance;
        }
        if let Some(mode) = self.mode {
            settings.selection.mode = mode;
        }
        if let Some(on_wrong) = self.on_wrong {
            settings.session.on_wrong = on_wrong;
        }
        if let Some(line) = self.line {
            settings.session.line = line;
        }
        if let Some(ms) = self.reply_delay_ms {
            settings.timing.reply_delay_ms = ms;
        }
        if let Some(ms) = self.advance_delay_ms {
            settings.timing.advance_delay_ms = ms;
        }
        Ok(settings)
    }

    fn catalog(&self) -> Result<Catalog, LoadError> {
        let policy = if self.skip_invalid {
            ValidationPolicy::SkipInvalid
        } else {
            ValidationPolicy::RejectAll
        };
        match &self.puzzles {
            Some(path) => source::load_path(path, self.format.into(), policy),
            None => source::starter_catalog(),
        }
    }
}

enum Input {
    Line(String),
    Closed,
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let catalog = match args.catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("catalog ready with {} puzzles", catalog.size());

    let rng = args
        .seed
        .map_or_else(Pcg64::from_os_rng, Pcg64::seed_from_u64);
    let mut trainer = Trainer::new(catalog, settings, TerminalBoard::new(), rng);

    if let Err(err) = trainer.next_puzzle() {
        log::warn!("first puzzle failed to start: {err}");
    }
    show(&mut trainer, true);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });

    loop {
        let input = match trainer.next_wakeup() {
            Some(due) => rx.recv_timeout(due.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match input {
            Ok(Input::Line(line)) => {
                if !handle_line(&mut trainer, line.trim()) {
                    break;
                }
            }
            Ok(Input::Closed) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let ran = trainer.poll(Instant::now());
                show(&mut trainer, ran > 0);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Returns `false` when the user asked to leave.
fn handle_line(trainer: &mut Trainer<TerminalBoard, Pcg64>, line: &str) -> bool {
    match line {
        "" => {}
        "quit" | "exit" => return false,
        "help" => println!("{HELP}"),
        "next" => {
            if let Err(err) = trainer.next_puzzle() {
                println!("{err}");
            }
            show(trainer, true);
        }
        "flip" => {
            trainer.flip();
            show(trainer, true);
        }
        "board" => show(trainer, true),
        "status" => println!("{}", trainer.status()),
        token => match codec::decode(token) {
            Ok(mv) => {
                let response =
                    trainer.on_drop(mv.origin(), mv.destination(), mv.promotion(), Instant::now());
                show(trainer, response.is_accept());
            }
            Err(err) => println!("cannot read move {token:?}: {err} (type `help`)"),
        },
    }
    true
}

fn show(trainer: &mut Trainer<TerminalBoard, Pcg64>, with_board: bool) {
    if with_board {
        let board = trainer.board();
        println!("\n{board}\n({} at the bottom)", board.orientation());
    }
    for message in trainer.take_messages() {
        println!("{message}");
    }
}
