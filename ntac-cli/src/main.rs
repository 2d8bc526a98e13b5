//! NTAC CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game against the computer or a second player
//! - selfplay: Run AI-vs-AI games and report results

mod play_cmd;
mod render;
mod selfplay_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ntac")]
#[command(about = "N x N tic-tac-toe with a minimax opponent")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game
    Play(play_cmd::PlayArgs),
    /// Let the AI play against itself
    Selfplay(selfplay_cmd::SelfPlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Selfplay(args) => selfplay_cmd::run(args, cli.seed),
    }
}
