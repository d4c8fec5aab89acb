//! Play command - a single game between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), play_game_verbose(), report_results()
//! - Level 3: play_turn()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use pawns_core::{shuffled, Game, GameResult, Move, Player, Strategy, StrategyKind};

use crate::setup::{seat_seeds, start_game, GameArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Red's strategy
    #[arg(long)]
    pub red: StrategyKind,

    /// Blue's strategy
    #[arg(long)]
    pub blue: StrategyKind,

    /// Output the result as JSON instead of move-by-move boards
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a finished (or capped) game
#[derive(Debug)]
struct PlayReport {
    red: StrategyKind,
    blue: StrategyKind,
    result: GameResult,
    red_score: u64,
    blue_score: u64,
    history: Vec<(Player, Move)>,
    board: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut game = setup_game(&args, seed)?;

    tracing::info!(
        "Starting game: {} (red) vs {} (blue) on {}x{}",
        args.red.name(),
        args.blue.name(),
        game.rows(),
        game.cols()
    );

    let report = play_game_verbose(&mut game, &args)?;

    report_results(&report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_game(args: &PlayArgs, seed: Option<u64>) -> Result<Game> {
    let config = args.game.resolve_config()?;
    let (red, blue) = args.game.load_decks()?;
    let (red, blue) = match seed {
        Some(seed) => {
            let (red_seed, blue_seed) = seat_seeds(seed);
            (shuffled(red, red_seed), shuffled(blue, blue_seed))
        }
        None => (red, blue),
    };
    start_game(&config, red, blue)
}

fn play_game_verbose(game: &mut Game, args: &PlayArgs) -> Result<PlayReport> {
    let red = args.red.build();
    let blue = args.blue.build();

    if !args.json {
        println!("{}", game.grid());
    }

    while !game.is_over() && game.history().len() < args.game.max_moves {
        let player = game.current_turn();
        let strategy = match player {
            Player::Red => red.as_ref(),
            Player::Blue => blue.as_ref(),
        };
        let line = play_turn(game, player, strategy)?;
        if !args.json {
            println!("{line}");
            println!("{}", game.grid());
        }
    }

    if !game.is_over() {
        tracing::warn!("Game stopped after {} moves without finishing", game.history().len());
    }

    Ok(PlayReport {
        red: args.red,
        blue: args.blue,
        result: game.result(),
        red_score: game.total_score(Player::Red)?,
        blue_score: game.total_score(Player::Blue)?,
        history: game.history().to_vec(),
        board: game.grid().to_string(),
    })
}

fn report_results(report: &PlayReport, json: bool) -> Result<()> {
    if json {
        print_json_report(report)
    } else {
        print_text_report(report);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Choose and apply one move, returning a description of it
fn play_turn(game: &mut Game, player: Player, strategy: &dyn Strategy) -> Result<String> {
    let mv = strategy.choose_move(game, player);
    let line = describe_move(game, player, mv);
    game.apply_move(player, mv)
        .with_context(|| format!("{} chose a rejected move: {:?}", strategy.name(), mv))?;
    Ok(line)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn player_name(player: Player) -> &'static str {
    match player {
        Player::Red => "Red",
        Player::Blue => "Blue",
    }
}

fn describe_move(game: &Game, player: Player, mv: Move) -> String {
    match mv {
        Move::Pass => format!("{} passes", player_name(player)),
        Move::Place { hand_index, row, col } => {
            let card = game
                .hand(player)
                .ok()
                .and_then(|hand| hand.get(hand_index))
                .map_or("?", |card| card.name());
            format!("{} plays {} at ({}, {})", player_name(player), card, row, col)
        }
    }
}

fn describe_result(result: GameResult) -> String {
    match result {
        GameResult::Winner(player) => format!("{} wins", player_name(player)),
        GameResult::Tie => "Tie".to_string(),
        GameResult::Ongoing => "Unfinished".to_string(),
    }
}

fn print_json_report(report: &PlayReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        red: StrategyKind,
        blue: StrategyKind,
        result: GameResult,
        red_score: u64,
        blue_score: u64,
        moves: &'a [(Player, Move)],
        board: Vec<&'a str>,
    }

    let output = JsonOutput {
        red: report.red,
        blue: report.blue,
        result: report.result,
        red_score: report.red_score,
        blue_score: report.blue_score,
        moves: &report.history,
        board: report.board.lines().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_report(report: &PlayReport) {
    println!("\n=== Game Result ===");
    println!("Red  ({}): {}", report.red.name(), report.red_score);
    println!("Blue ({}): {}", report.blue.name(), report.blue_score);
    println!("Moves: {}", report.history.len());
    println!("{}", describe_result(report.result));
}

// ============================================================================
// TESTS
// ============================================================================
