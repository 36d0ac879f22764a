mod config;
mod display;

use anyhow::{bail, Context, Result};
use chess_agents::{evaluate, SelectConfig, Session, Strategy};
use chess_core::{perft_divide, Color, Outcome, Position};
use clap::{Args, Parser, Subcommand};
use config::{load_config, EngineConfig};
use display::render_board;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chess-ai")]
#[command(about = "Chess move selection with minimax, alpha-beta and MCTS")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Choose a move for the side to move
    Select {
        /// Position in FEN (defaults to the starting position)
        #[arg(long)]
        fen: Option<String>,

        /// Search strategy (defaults to the configured one)
        #[arg(long)]
        strategy: Option<Strategy>,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the static evaluation from both sides
    Eval {
        #[arg(long)]
        fen: Option<String>,
    },
    /// Count leaf nodes per root move
    Perft {
        depth: u8,

        #[arg(long)]
        fen: Option<String>,
    },
    /// Let two strategies play each other
    Play {
        #[arg(long, default_value = "alphabeta")]
        white: Strategy,

        #[arg(long, default_value = "mcts")]
        black: Strategy,

        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: u32,

        #[arg(long)]
        fen: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

/// Flags overriding the config file.
#[derive(Args, Debug, Default)]
struct SearchArgs {
    /// Minimax and alpha-beta depth in plies
    #[arg(long)]
    depth: Option<u8>,

    /// MCTS time budget in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// MCTS exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_iterations: Option<u32>,

    /// Score MCTS playouts longer than this as draws
    #[arg(long)]
    rollout_plies: Option<u32>,
}

impl SearchArgs {
    fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(exploration) = self.exploration {
            config.exploration = exploration;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.max_iterations.is_some() {
            config.max_iterations = self.max_iterations;
        }
        if self.rollout_plies.is_some() {
            config.rollout_ply_limit = self.rollout_plies;
        }
        config
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_position(fen: Option<&str>) -> Result<Position> {
    match fen {
        Some(text) => Position::from_fen(text).with_context(|| format!("invalid FEN '{text}'")),
        None => Ok(Position::new()),
    }
}

fn new_session(config: &EngineConfig) -> Session<chess_agents::StandardChess> {
    let session = Session::standard(config.seed);
    match config.cache_capacity {
        Some(capacity) => session.with_cache_capacity(capacity),
        None => session,
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Checkmate { winner } => format!("{winner} wins by checkmate"),
        Outcome::Stalemate => "Draw by stalemate".to_string(),
        Outcome::FiftyMoveRule => "Draw by the fifty-move rule".to_string(),
        Outcome::InsufficientMaterial => "Draw by insufficient material".to_string(),
    }
}

fn run_select(position: &Position, config: &EngineConfig) -> Result<()> {
    let strategy = config.strategy()?;
    let select_config = config.select_config();
    let mut session = new_session(config);
    let color = position.side_to_move();

    let start = Instant::now();
    let selection = session.select_move(position, color, strategy, &select_config)?;
    let elapsed = start.elapsed();

    match selection {
        Some(selection) => {
            info!(
                %strategy,
                mv = %selection.mv,
                elapsed_ms = elapsed.as_millis() as u64,
                "move selected"
            );
            println!("bestmove {}", selection.mv);
            println!("{}", selection.diagnostics);
        }
        None => {
            let outcome = position
                .outcome()
                .map(describe)
                .unwrap_or_else(|| "Game over".to_string());
            println!("no move: {outcome}");
        }
    }
    Ok(())
}

fn run_eval(position: &Position) {
    let session = Session::standard(0);
    println!("{}", render_board(position));
    for color in [Color::White, Color::Black] {
        println!("{color}: {:+.1}", evaluate(session.oracle(), position, color));
    }
}

fn run_perft(position: &Position, depth: u8) {
    let start = Instant::now();
    let mut total = 0;

    let mut divide = perft_divide(position, depth);
    divide.sort_by_key(|(mv, _)| mv.to_string());
    for (mv, count) in divide {
        println!("{mv}: {count}");
        total += count;
    }

    let elapsed = start.elapsed();
    println!("\nNodes searched: {total}");
    println!("Time: {:.3}s", elapsed.as_secs_f64());
    if elapsed > Duration::ZERO {
        println!("NPS: {:.0}", total as f64 / elapsed.as_secs_f64());
    }
}

fn run_play(
    mut position: Position,
    white: Strategy,
    black: Strategy,
    max_plies: u32,
    config: &EngineConfig,
) -> Result<()> {
    let select_config: SelectConfig = config.select_config();
    let mut session = new_session(config);
    info!(%white, %black, max_plies, "starting self-play");
    println!("{}", render_board(&position));

    for ply in 0..max_plies {
        let color = position.side_to_move();
        let strategy = match color {
            Color::White => white,
            Color::Black => black,
        };

        let Some(selection) = session.select_move(&position, color, strategy, &select_config)?
        else {
            break;
        };

        println!(
            "\n{}. {color} ({strategy}) plays {}: {}",
            ply / 2 + 1,
            selection.mv,
            selection.diagnostics
        );
        position = position.play(selection.mv)?;
        println!("{}", render_board(&position));
    }

    match position.outcome() {
        Some(outcome) => println!("\n{}", describe(outcome)),
        None => {
            warn!(max_plies, "ply limit reached");
            println!("\nStopped after {max_plies} plies");
        }
    }
    println!("{}", position.to_fen());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, path) = load_config()?;
    init_tracing(&config.log_level);

    match &path {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file found, using defaults"),
    }

    match cli.command {
        Command::Select {
            fen,
            strategy,
            search,
        } => {
            let position = parse_position(fen.as_deref())?;
            let mut config = search.apply(config);
            if let Some(strategy) = strategy {
                config.strategy = strategy.to_string();
            }
            run_select(&position, &config)
        }
        Command::Eval { fen } => {
            run_eval(&parse_position(fen.as_deref())?);
            Ok(())
        }
        Command::Perft { depth, fen } => {
            if depth == 0 {
                bail!("perft depth must be at least 1");
            }
            run_perft(&parse_position(fen.as_deref())?, depth);
            Ok(())
        }
        Command::Play {
            white,
            black,
            max_plies,
            fen,
            search,
        } => {
            let position = parse_position(fen.as_deref())?;
            run_play(position, white, black, max_plies, &search.apply(config))
        }
    }
}
