//! # Minimax Arena - Terminal Play
//!
//! Plays one game of Connect Four in the terminal. Each seat is a human
//! typing column numbers or one of the computer players from
//! [`minimax::player`].
//!
//! ## Usage
//! ```text
//! play --cross human --nought minimax --depth 6
//! play --config arena.toml --cross greedy --nought minimax --seed 42
//! ```
//! Run with `--release` for reasonable search times at higher depths.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use minimax::board::{Board, Column, Seed};
use minimax::config::{AppConfig, PlayerKind};
use minimax::game_controller::{GameController, GameStatus, MoveResult};
use minimax::player::{self, Player};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Connect Four against a minimax engine", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "arena.toml")]
    config: PathBuf,

    /// Who plays X (moves first)
    #[arg(long, value_enum)]
    cross: Option<PlayerKind>,

    /// Who plays O
    #[arg(long, value_enum)]
    nought: Option<PlayerKind>,

    /// Search depth in plies
    #[arg(short, long)]
    depth: Option<u32>,

    /// Search threads; 0 uses every core
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seed for reproducible games
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    columns: Option<usize>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(kind) = self.cross {
            config.players.cross = kind;
        }
        if let Some(kind) = self.nought {
            config.players.nought = kind;
        }
        if let Some(depth) = self.depth {
            config.search.depth = depth;
        }
        if let Some(threads) = self.threads {
            config.search.threads = if threads == 0 { num_cpus::get() } else { threads };
        }
        if self.seed.is_some() {
            config.search.seed = self.seed;
        }
        if let Some(rows) = self.rows {
            config.board.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.board.columns = columns;
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Draws the board with colored seeds and a column index footer.
fn render(board: &Board) {
    println!();
    for row in 0..board.rows() {
        let mut line = String::from("  ");
        for column in 0..board.columns() {
            let cell = match board.get(row, column) {
                Ok(Some(Seed::Cross)) => "X".red().bold().to_string(),
                Ok(Some(Seed::Nought)) => "O".yellow().bold().to_string(),
                _ => ".".dimmed().to_string(),
            };
            line.push_str(&cell);
            line.push(' ');
        }
        println!("{}", line);
    }
    let footer: Vec<String> = (0..board.columns()).map(|c| (c % 10).to_string()).collect();
    println!("  {}", footer.join(" ").cyan());
    println!();
}

/// Reads a column from a human. `None` means the player quit.
fn read_human_move(controller: &GameController, input: &mut impl BufRead) -> io::Result<Option<usize>> {
    let seed = controller.to_move();
    loop {
        print!(
            "{} to move, column 0-{} (q quits): ",
            seed.to_string().bold(),
            controller.board().columns() - 1
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<Column>() {
            Ok(Column(column)) => match controller.validate_move(column) {
                Ok(()) => return Ok(Some(column)),
                Err(reason) => println!("{}", reason.to_string().red()),
            },
            Err(_) => println!("{}", format!("'{}' is not a column number", line).red()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = AppConfig::load_or_default(&args.config)?;
    args.apply(&mut config);
    config.validate()?;
    if config.search.threads > num_cpus::get() {
        warn!(
            threads = config.search.threads,
            cores = num_cpus::get(),
            "more search threads than cores"
        );
    }

    let board = config.board.build()?;
    let mut seats: [Option<Box<dyn Player>>; 2] = [
        player::from_config(config.players.cross, &config, 0),
        player::from_config(config.players.nought, &config, 1),
    ];
    info!(
        cross = ?config.players.cross,
        nought = ?config.players.nought,
        depth = config.search.depth,
        threads = config.search.threads,
        "starting game"
    );

    let mut controller = GameController::new(board, Seed::Cross);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while !controller.is_game_over() {
        render(controller.board());
        let seed = controller.to_move();
        let seat = match seed {
            Seed::Cross => &mut seats[0],
            Seed::Nought => &mut seats[1],
        };

        let column = match seat {
            Some(player) => {
                let snapshot = controller.get_state_for_search();
                let column = player.choose_move(&snapshot, seed)?;
                println!("{} ({}) plays column {}", seed.to_string().bold(), player.name(), column);
                column
            }
            None => match read_human_move(&controller, &mut input)? {
                Some(column) => column,
                None => {
                    println!("Game abandoned.");
                    return Ok(());
                }
            },
        };

        match controller.try_make_move(column) {
            MoveResult::Success { .. } => {}
            MoveResult::Invalid { reason } => println!("{}", reason.to_string().red()),
            MoveResult::GameOver => break,
        }
    }

    render(controller.board());
    match controller.status() {
        GameStatus::Win(seed) => println!("{}", format!("{} wins!", seed).green().bold()),
        GameStatus::Draw => println!("{}", "Draw.".bold()),
        GameStatus::InProgress => {}
    }
    println!("{}", controller.format_history());
    Ok(())
}
