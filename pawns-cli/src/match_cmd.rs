//! Match command - play games between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_match_setup(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use pawns_core::{play_game, shuffled, Card, GameConfig, GameResult, Player, StrategyKind};

use crate::setup::{seat_seeds, start_game, GameArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Strategy seated as red in odd-numbered games
    #[arg(long)]
    pub red: StrategyKind,

    /// Strategy seated as blue in odd-numbered games
    #[arg(long)]
    pub blue: StrategyKind,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Play games on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Decks and settings shared by every game of a match
struct MatchSetup {
    config: GameConfig,
    red_deck: Vec<Card>,
    blue_deck: Vec<Card>,
    first: StrategyKind,
    second: StrategyKind,
    max_moves: usize,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    red: StrategyKind,
    blue: StrategyKind,
    result: GameResult,
    red_score: u64,
    blue_score: u64,
    moves: usize,
}

impl GameRecord {
    /// True if the first-named strategy played red
    fn first_is_red(&self) -> bool {
        self.game_number % 2 == 1
    }

    /// First strategy's score minus second strategy's score
    fn margin(&self) -> i128 {
        let (first, second) = if self.first_is_red() {
            (self.red_score, self.blue_score)
        } else {
            (self.blue_score, self.red_score)
        };
        i128::from(first) - i128::from(second)
    }
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first: StrategyKind,
    second: StrategyKind,
    first_wins: usize,
    second_wins: usize,
    ties: usize,
    unfinished: usize,
    avg_margin: f32,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// This function reads like a table of contents:
/// 1. Load decks and config
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let setup = load_match_setup(&args)?;

    tracing::info!(
        "Starting match: {} vs {} ({} games, {}x{}, {:?} rules)",
        setup.first.name(),
        setup.second.name(),
        args.games,
        setup.config.rows,
        setup.config.cols,
        setup.config.variant
    );

    let results = play_match(&setup, args.games, args.parallel, seed)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_match_setup(args: &MatchArgs) -> Result<MatchSetup> {
    let config = args.game.resolve_config()?;
    let (red_deck, blue_deck) = args.game.load_decks()?;
    Ok(MatchSetup {
        config,
        red_deck,
        blue_deck,
        first: args.red,
        second: args.blue,
        max_moves: args.game.max_moves,
    })
}

/// Play all games in the match
fn play_match(setup: &MatchSetup, games: usize, parallel: bool, seed: Option<u64>) -> Result<MatchResults> {
    let base_seed = create_rng(seed).gen::<u64>();

    let records: Result<Vec<GameRecord>> = if parallel {
        (1..=games)
            .into_par_iter()
            .map(|game_number| play_single_game(setup, game_number, base_seed))
            .collect()
    } else {
        (1..=games)
            .map(|game_number| play_single_game(setup, game_number, base_seed))
            .collect()
    };

    let records = records?;
    for record in &records {
        tracing::info!(
            "Game {}: {} (red) vs {} (blue): {:?}, {}-{} in {} moves",
            record.game_number,
            record.red.name(),
            record.blue.name(),
            record.result,
            record.red_score,
            record.blue_score,
            record.moves
        );
    }

    Ok(compute_match_statistics(records, setup.first, setup.second))
}

/// Report match results
fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game. Odd-numbered games seat the first strategy as red.
fn play_single_game(setup: &MatchSetup, game_number: usize, base_seed: u64) -> Result<GameRecord> {
    let (red, blue) = if game_number % 2 == 1 {
        (setup.first, setup.second)
    } else {
        (setup.second, setup.first)
    };

    let (red_seed, blue_seed) = seat_seeds(base_seed.wrapping_add(game_number as u64));
    let mut game = start_game(
        &setup.config,
        shuffled(setup.red_deck.clone(), red_seed),
        shuffled(setup.blue_deck.clone(), blue_seed),
    )?;

    let moves = play_game(&mut game, red.build().as_ref(), blue.build().as_ref(), setup.max_moves);
    if !game.is_over() {
        tracing::warn!("Game {} hit the {} move cap", game_number, setup.max_moves);
    }

    Ok(GameRecord {
        game_number,
        red,
        blue,
        result: game.result(),
        red_score: game.total_score(Player::Red)?,
        blue_score: game.total_score(Player::Blue)?,
        moves,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>, first: StrategyKind, second: StrategyKind) -> MatchResults {
    let mut first_wins = 0;
    let mut second_wins = 0;
    let mut ties = 0;
    let mut unfinished = 0;

    for game in &games {
        match game.result {
            GameResult::Winner(player) => {
                if (player == Player::Red) == game.first_is_red() {
                    first_wins += 1;
                } else {
                    second_wins += 1;
                }
            }
            GameResult::Tie => ties += 1,
            GameResult::Ongoing => unfinished += 1,
        }
    }

    let (avg_margin, avg_moves) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let total_margin: i128 = games.iter().map(GameRecord::margin).sum();
        let total_moves: usize = games.iter().map(|g| g.moves).sum();
        (
            total_margin as f32 / games.len() as f32,
            total_moves as f32 / games.len() as f32,
        )
    };

    MatchResults {
        games,
        first,
        second,
        first_wins,
        second_wins,
        ties,
        unfinished,
        avg_margin,
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

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        red: StrategyKind,
        blue: StrategyKind,
        result: GameResult,
        red_score: u64,
        blue_score: u64,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first: StrategyKind,
        second: StrategyKind,
        first_wins: usize,
        second_wins: usize,
        ties: usize,
        unfinished: usize,
        avg_margin: f32,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first: results.first,
        second: results.second,
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        ties: results.ties,
        unfinished: results.unfinished,
        avg_margin: results.avg_margin,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                red: g.red,
                blue: g.blue,
                result: g.result,
                red_score: g.red_score,
                blue_score: g.blue_score,
                moves: g.moves,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "{} wins: {} ({:.1}%)",
        results.first.name(),
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{} wins: {} ({:.1}%)",
        results.second.name(),
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!("Ties:       {} ({:.1}%)", results.ties, percent(results.ties, total));
    if results.unfinished > 0 {
        println!("Unfinished: {}", results.unfinished);
    }
    println!("Avg margin: {:+.1} ({} minus {})", results.avg_margin, results.first.name(), results.second.name());
    println!("Avg moves:  {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} (red) {} - {} {} (blue), {:?}",
            game.game_number,
            game.red.name(),
            game.red_score,
            game.blue_score,
            game.blue.name(),
            game.result
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawns_core::{InfluenceGrid, InfluenceKind};

    fn record(game_number: usize, result: GameResult, red_score: u64, blue_score: u64) -> GameRecord {
        let (red, blue) = if game_number % 2 == 1 {
            (StrategyKind::BoardControl, StrategyKind::FillFirst)
        } else {
            (StrategyKind::FillFirst, StrategyKind::BoardControl)
        };
        GameRecord {
            game_number,
            red,
            blue,
            result,
            red_score,
            blue_score,
            moves: 10 * game_number,
        }
    }

    fn small_setup() -> MatchSetup {
        let cross = InfluenceGrid::with(&[
            (1, 2, InfluenceKind::Claim),
            (3, 2, InfluenceKind::Claim),
            (2, 1, InfluenceKind::Claim),
            (2, 3, InfluenceKind::Upgrade),
        ]).unwrap();
        let deck: Vec<Card> = (0..15)
            .map(|i| Card::new(format!("c{i}"), 1 + (i % 2) as u8, 1 + (i % 4) as u32, cross).unwrap())
            .collect();
        MatchSetup {
            config: GameConfig { rows: 3, cols: 5, hand_size: 3, ..Default::default() },
            blue_deck: pawns_core::deck::flipped(&deck),
            red_deck: deck,
            first: StrategyKind::BoardControl,
            second: StrategyKind::MaximizeRowScore,
            max_moves: 200,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![], StrategyKind::FillFirst, StrategyKind::BoardControl);
        assert_eq!(results.first_wins, 0);
        assert_eq!(results.second_wins, 0);
        assert_eq!(results.ties, 0);
        assert_eq!(results.avg_margin, 0.0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            // first (board-control) is red and wins
            record(1, GameResult::Winner(Player::Red), 9, 3),
            // first is blue and wins
            record(2, GameResult::Winner(Player::Blue), 2, 6),
            // first is red and loses
            record(3, GameResult::Winner(Player::Blue), 1, 4),
            record(4, GameResult::Tie, 5, 5),
        ];

        let results = compute_match_statistics(games, StrategyKind::BoardControl, StrategyKind::FillFirst);
        assert_eq!(results.first_wins, 2);
        assert_eq!(results.second_wins, 1);
        assert_eq!(results.ties, 1);
        assert_eq!(results.unfinished, 0);
        // margins: +6, +4, -3, 0
        assert_eq!(results.avg_margin, 1.75);
        assert_eq!(results.avg_moves, 25.0);
    }

    #[test]
    fn test_colors_alternate() {
        let setup = small_setup();
        let one = play_single_game(&setup, 1, 7).unwrap();
        let two = play_single_game(&setup, 2, 7).unwrap();
        assert_eq!((one.red, one.blue), (StrategyKind::BoardControl, StrategyKind::MaximizeRowScore));
        assert_eq!((two.red, two.blue), (StrategyKind::MaximizeRowScore, StrategyKind::BoardControl));
        assert_ne!(one.result, GameResult::Ongoing);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let setup = small_setup();
        let sequential = play_match(&setup, 4, false, Some(42)).unwrap();
        let parallel = play_match(&setup, 4, true, Some(42)).unwrap();
        let summary = |r: &MatchResults| -> Vec<(GameResult, u64, u64, usize)> {
            r.games.iter().map(|g| (g.result, g.red_score, g.blue_score, g.moves)).collect()
        };
        assert_eq!(summary(&sequential), summary(&parallel));
        assert_eq!(sequential.first_wins + sequential.second_wins + sequential.ties + sequential.unfinished, 4);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
