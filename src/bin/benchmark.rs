use clap::Parser;
use minimax::board::{Board, Seed};
use minimax::eval::EvalWeights;
use minimax::search::{Minimax, SearchConfig, SearchOutcome, MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deepest search to time (default: 8)
    #[arg(long, default_value_t = 8)]
    max_depth: u32,

    /// Number of search threads (default: 1)
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Seed for the tie-breaking order (default: 1)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Always play the most central of equally scored columns
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    no_randomize: bool,

    /// Position to search, rows top to bottom separated by '/', e.g.
    /// "......./......./......./......./...O.../..XX..."
    #[arg(long)]
    position: Option<String>,

    /// Side to move in the position
    #[arg(long, default_value = "x", value_parser = ["x", "o"])]
    to_move: String,
}

fn main() {
    let args = Args::parse();

    let mut board = match &args.position {
        Some(text) => match Board::parse(&text.replace('/', "\n")) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("invalid position: {}", e);
                std::process::exit(2);
            }
        },
        None => Board::standard(),
    };
    let seed = if args.to_move == "o" { Seed::Nought } else { Seed::Cross };
    let max_depth = args.max_depth.clamp(1, MAX_DEPTH);

    println!("Minimax Arena - Benchmark Tool");
    println!("==============================");
    println!("Board: {}x{}", board.rows(), board.columns());
    println!("To move: {}", seed);
    println!("Threads: {}", args.threads);
    println!("Depths: 1..={}", max_depth);
    println!("------------------------------");
    print!("{}", board);

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    let config = SearchConfig {
        depth: 1,
        threads: args.threads,
        randomize: !args.no_randomize,
        seed: Some(args.seed),
    };
    let mut engine = Minimax::new(config, EvalWeights::default());
    for depth in 1..=max_depth {
        engine.set_depth(depth);
        match engine.search(&mut board, seed) {
            Ok(outcome) => print_stats(&outcome),
            Err(e) => {
                eprintln!("search failed at depth {}: {}", depth, e);
                std::process::exit(1);
            }
        }
    }
}

fn print_stats(outcome: &SearchOutcome) {
    let stats = &outcome.stats;
    println!("Depth {} Results:", outcome.depth);
    println!("  Column: {} (tied: {:?})", outcome.column, outcome.tied);
    println!("  Score: {}{}", outcome.score, if outcome.is_decisive() { " (decisive)" } else { "" });
    println!("  Total Nodes: {}", stats.total_nodes);
    println!("  Leaf Evaluations: {}", stats.leaf_evaluations);
    println!("  Cutoffs: {}", stats.cutoffs);
    println!("  Time: {:.3}s", stats.elapsed.as_secs_f64());
    println!("  NPS: {:.0} nodes/sec", stats.nodes_per_second());
}
