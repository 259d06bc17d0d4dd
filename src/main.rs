use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connect_four::config::AppConfig;
use connect_four::game::{DropOutcome, GameState, IgnoreReason};

/// Play a sequence of Connect Four drops and print the resulting game.
#[derive(Parser)]
#[command(name = "connect-four", about = "Replay Connect Four moves headlessly")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Override number of board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override number of board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Print the final state as JSON instead of a text board
    #[arg(long)]
    json: bool,

    /// Columns to drop into, in order (0-based)
    moves: Vec<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(rows) = cli.rows {
        app_config.board.rows = rows;
    }
    if let Some(cols) = cli.cols {
        app_config.board.cols = cols;
    }
    let dims = app_config.dimensions().context("invalid board size")?;

    let mut game = GameState::with_dimensions(dims);
    for (index, &column) in cli.moves.iter().enumerate() {
        let outcome = game
            .drop(column)
            .with_context(|| format!("move {} (column {column})", index + 1))?;
        match outcome {
            DropOutcome::Placed { .. } => {}
            DropOutcome::Ignored(IgnoreReason::ColumnFull) => {
                eprintln!("move {}: column {column} is full, ignored", index + 1);
            }
            DropOutcome::Ignored(IgnoreReason::GameOver) => {
                eprintln!("move {}: game is over, ignored", index + 1);
            }
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&game.snapshot())
            .context("serializing game snapshot")?;
        println!("{json}");
    } else {
        print!("{}", game.board());
        println!("{}", game.status());
    }

    Ok(())
}
