//! Self-play command - the AI against itself
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_series(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use ntac_core::{check_board, check_board_size, Board, Difficulty, Mark, MinimaxAI, Position};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfPlayArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Board side length (3-10)
    #[arg(long, default_value = "3")]
    pub size: usize,

    /// Difficulty of the X player
    #[arg(long, default_value = "unbeatable")]
    pub x_difficulty: Difficulty,

    /// Difficulty of the O player
    #[arg(long, default_value = "unbeatable")]
    pub o_difficulty: Difficulty,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Mark>,
    moves: Vec<Position>,
}

/// Aggregated series results
#[derive(Clone, Debug)]
struct SeriesResults {
    games: Vec<GameRecord>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run self-play command
///
/// 1. Validate the board size
/// 2. Play the series (games run in parallel)
/// 3. Report results
pub fn run(args: SelfPlayArgs, seed: Option<u64>) -> Result<()> {
    check_board_size(args.size)?;

    tracing::info!(
        "Starting self-play: {} games on {}x{} (X={:?}, O={:?})",
        args.games,
        args.size,
        args.size,
        args.x_difficulty,
        args.o_difficulty
    );

    let results = play_series(&args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games, each with its own seeds
fn play_series(args: &SelfPlayArgs, seed: Option<u64>) -> Result<SeriesResults> {
    let mut rng = create_rng(seed);
    let seeds: Vec<(u64, u64)> = (0..args.games).map(|_| (rng.gen(), rng.gen())).collect();

    let games = seeds
        .par_iter()
        .enumerate()
        .map(|(i, &(x_seed, o_seed))| {
            play_single_game(
                i + 1,
                args.size,
                (args.x_difficulty, args.o_difficulty),
                (x_seed, o_seed),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    for record in &games {
        tracing::debug!(
            "Game {}: winner={:?} ({} moves)",
            record.game_number,
            record.winner,
            record.moves.len()
        );
    }

    Ok(compute_statistics(games))
}

/// Report series results
fn report_results(results: &SeriesResults, args: &SelfPlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion
fn play_single_game(
    game_number: usize,
    size: usize,
    difficulties: (Difficulty, Difficulty),
    seeds: (u64, u64),
) -> Result<GameRecord> {
    let board = Board::new(size)?;
    let mut x = MinimaxAI::with_seed(Mark::X, seeds.0);
    let mut o = MinimaxAI::with_seed(Mark::O, seeds.1);

    let (final_board, moves) = x.play_out(&mut o, &board, difficulties);

    Ok(GameRecord {
        game_number,
        winner: check_board(&final_board).winner,
        moves,
    })
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SeriesResults {
    let x_wins = games.iter().filter(|g| g.winner == Some(Mark::X)).count();
    let o_wins = games.iter().filter(|g| g.winner == Some(Mark::O)).count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SeriesResults {
        games,
        x_wins,
        o_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn winner_label(winner: Option<Mark>) -> String {
    match winner {
        Some(mark) => format!("{} wins", mark.symbol()),
        None => "Draw".to_string(),
    }
}

/// Print results as JSON
fn print_json_results(results: &SeriesResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Mark>,
        moves: Vec<Position>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        draws: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        x_wins: results.x_wins,
        o_wins: results.o_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                moves: g.moves.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SeriesResults) {
    let total = results.games.len();

    println!("\n=== Self-Play Results ===");
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} moves",
            game.game_number,
            winner_label(game.winner),
            game.moves.len()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
