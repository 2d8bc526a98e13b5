//! Interactive play command
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_engine(), session()
//! - Level 3: execute(), finish_machine_turns()
//! - Level 4: parse_command(), help text

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use ntac_core::{Difficulty, Position};
use ntac_engine::{Action, Engine, EngineConfig, GameMode, GameState};

use crate::render::{render_board, render_score, render_status};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// JSON engine config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Board side length (3-10)
    #[arg(long)]
    pub size: Option<usize>,

    /// single, local or remote
    #[arg(long)]
    pub mode: Option<GameMode>,

    /// easy, medium, hard or unbeatable
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Pause before the computer replies
    #[arg(long)]
    pub ai_delay_ms: Option<u64>,
}

/// A line of user input
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Move(Position),
    Undo,
    Reset,
    Size(usize),
    Difficulty(Difficulty),
    Mode(GameMode),
    Hint,
    Help,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run an interactive game on stdin/stdout
///
/// 1. Build engine from config file and flags
/// 2. Print the board after every change
/// 3. Read commands until quit or end of input
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let engine = Rc::new(build_engine(&args, seed)?);

    let _subscription = engine.subscribe({
        let engine = Rc::downgrade(&engine);
        move |state: &GameState| {
            println!("\n{}{}", render_board(state), render_status(state));
            if state.is_game_over {
                if let Some(engine) = engine.upgrade() {
                    println!("{}", render_score(&engine.score()));
                }
            }
        }
    });

    let state = engine.state();
    println!("{}{}", render_board(&state), render_status(&state));
    println!("Type 'help' for commands.");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(session(&engine))
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge the config file with command-line overrides
fn build_engine(args: &PlayArgs, seed: Option<u64>) -> Result<Engine> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(size) = args.size {
        config = config.with_board_size(size);
    }
    if let Some(mode) = args.mode {
        config = config.with_game_mode(mode);
    }
    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(delay) = args.ai_delay_ms {
        config = config.with_ai_delay_ms(delay);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    tracing::info!(
        "New game: {}x{} {:?} ({:?})",
        config.board_size,
        config.board_size,
        config.game_mode,
        config.difficulty
    );
    Ok(Engine::new(&config)?)
}

/// Read and execute commands until quit
async fn session(engine: &Engine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        execute(engine, command);
        finish_machine_turns(engine).await;
    }

    let score = engine.score();
    println!("{}", render_score(&score));
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn execute(engine: &Engine, command: Command) {
    let action = match command {
        Command::Move(position) => {
            if !engine.is_valid_move(position) {
                println!("Illegal move ({}, {})", position.row, position.col);
                return;
            }
            Action::MakeMove { position }
        }
        Command::Undo => Action::UndoMove,
        Command::Reset => Action::ResetGame,
        Command::Size(size) => Action::ChangeBoardSize { size },
        Command::Difficulty(difficulty) => Action::ChangeDifficulty { difficulty },
        Command::Mode(mode) => Action::ChangeGameMode { mode },
        Command::Hint => {
            match engine.best_move() {
                Some(p) => println!("Try ({}, {})", p.row, p.col),
                None => println!("No moves left"),
            }
            return;
        }
        Command::Help => {
            println!("{HELP}");
            return;
        }
        Command::Quit => return,
    };

    if let Err(e) = engine.dispatch(action) {
        println!("{e}");
    }
}

/// Let the computer reply, if a reply is pending
async fn finish_machine_turns(engine: &Engine) {
    while engine.pending_ai_turn().is_some() {
        if engine.await_ai_turn().await.is_none() {
            break;
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

const HELP: &str = "\
Commands:
  <row> <col>        place a mark (0-based)
  undo               take back the last move
  reset              start over on the same board
  size <n>           new game on an n x n board (3-10)
  difficulty <d>     easy, medium, hard, unbeatable
  mode <m>           single, local, remote
  hint               suggest a move
  quit               leave";

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["undo"] | ["u"] => Command::Undo,
        ["reset"] => Command::Reset,
        ["hint"] => Command::Hint,
        ["help"] | ["?"] => Command::Help,
        ["quit"] | ["q"] | ["exit"] => Command::Quit,
        ["size", n] => Command::Size(n.parse().with_context(|| format!("Bad size: {n}"))?),
        ["difficulty", d] => Command::Difficulty(d.parse().map_err(anyhow::Error::msg)?),
        ["mode", m] => Command::Mode(m.parse().map_err(anyhow::Error::msg)?),
        [row, col] => {
            let row = row.parse().with_context(|| format!("Bad row: {row}"))?;
            let col = col.parse().with_context(|| format!("Bad column: {col}"))?;
            Command::Move(Position::new(row, col))
        }
        _ => bail!("Unknown command: {line} (try 'help')"),
    };
    Ok(command)
}

// ============================================================================
// TESTS
// ============================================================================
