//! End-to-end tests: deck file -> game -> strategies -> CLI output

use std::path::PathBuf;
use std::process::Command;

use pawns_core::{
    deck, parse_deck, play_game, shuffled, Game, GameConfig, GameResult, Player, PlayerState, RuleSet, SharedGame,
    StrategyKind,
};

const STANDARD_DECK: &str = include_str!("../../decks/standard.deck");

fn deck_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../decks/standard.deck")
}

fn pawns() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pawns"))
}

fn standard_game(config: &GameConfig, seed: u64) -> Game {
    let red = parse_deck(STANDARD_DECK).unwrap();
    let blue = deck::flipped(&red);
    let mut game = Game::from_config(config).unwrap();
    game.start(
        PlayerState::with_deck(Player::Red, config.hand_size, shuffled(red, seed)).unwrap(),
        PlayerState::with_deck(Player::Blue, config.hand_size, shuffled(blue, seed + 1)).unwrap(),
    )
    .unwrap();
    game
}

#[test]
fn test_standard_deck_fills_default_board() {
    let cards = parse_deck(STANDARD_DECK).unwrap();
    assert!(cards.len() >= GameConfig::default().min_deck_size());
    assert!(cards.iter().all(|c| (1..=3).contains(&c.cost()) && c.value() > 0));
}

#[test]
fn test_every_pairing_finishes() {
    let config = GameConfig::default();
    for red in StrategyKind::ALL {
        for blue in StrategyKind::ALL {
            let mut game = standard_game(&config, 11);
            play_game(&mut game, red.build().as_ref(), blue.build().as_ref(), 1000);
            assert!(game.is_over(), "{} vs {} did not finish", red.name(), blue.name());

            let red_total = game.total_score(Player::Red).unwrap();
            let blue_total = game.total_score(Player::Blue).unwrap();
            let expected = match red_total.cmp(&blue_total) {
                std::cmp::Ordering::Greater => GameResult::Winner(Player::Red),
                std::cmp::Ordering::Less => GameResult::Winner(Player::Blue),
                std::cmp::Ordering::Equal => GameResult::Tie,
            };
            assert_eq!(game.result(), expected);

            // the final two moves are the ending passes
            let history = game.history();
            assert!(history[history.len() - 2..].iter().all(|(_, mv)| mv.is_pass()));
        }
    }
}

#[test]
fn test_legacy_rules_game() {
    let config = GameConfig {
        variant: pawns_core::RuleVariant::Legacy,
        ..Default::default()
    };
    let mut game = standard_game(&config, 3);
    assert_eq!(game.rules().name, RuleSet::legacy().name);
    play_game(&mut game, &pawns_core::BoardControl, &pawns_core::FillFirst, 1000);
    assert!(game.is_over());
    // legacy influence never changes modifiers
    assert!(game.grid().cells().all(|(_, cell)| cell.modifier() == 0));
}

#[test]
fn test_shared_game_across_threads() {
    let shared = SharedGame::new(standard_game(&GameConfig::default(), 5));
    std::thread::scope(|scope| {
        for (player, kind) in [(Player::Red, StrategyKind::BoardControl), (Player::Blue, StrategyKind::MaximizeRowScore)] {
            let shared = shared.clone();
            scope.spawn(move || {
                let strategy = kind.build();
                loop {
                    let (over, my_turn) = shared.read(|g| (g.is_over(), g.current_turn() == player)).unwrap();
                    if over {
                        break;
                    }
                    if my_turn {
                        shared.play_strategy(player, strategy.as_ref()).unwrap();
                    }
                    std::thread::yield_now();
                }
            });
        }
    });
    let game = shared.snapshot().unwrap();
    assert!(game.is_over());
    for pair in game.history().windows(2) {
        assert_ne!(pair[0].0, pair[1].0);
    }
}

#[test]
fn test_cli_check_deck() {
    let output = pawns().arg("check-deck").arg(deck_path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("36 cards"));
    assert!(stdout.contains("Security"));
}

#[test]
fn test_cli_check_deck_reports_malformation() {
    let path = std::env::temp_dir().join(format!("pawns-bad-{}.deck", std::process::id()));
    std::fs::write(&path, "Broken 9 1\nXXXXX\n").unwrap();
    let output = pawns().arg("check-deck").arg(&path).output().unwrap();
    std::fs::remove_file(&path).ok();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed deck"));
}

#[test]
fn test_cli_play_json() {
    let output = pawns()
        .args(["play", "--red", "board-control", "--blue", "fill-first", "--json", "--seed", "9"])
        .arg("--red-deck")
        .arg(deck_path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["red"], "board-control");
    assert_eq!(json["board"].as_array().unwrap().len(), 5);
    assert_ne!(json["result"], "Ongoing");
    assert!(!json["moves"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_match_json() {
    let output = pawns()
        .args(["match", "--red", "maximize-row-score", "--blue", "fill-first"])
        .args(["--games", "4", "--parallel", "--json", "--seed", "1", "--rows", "3", "--cols", "5"])
        .arg("--red-deck")
        .arg(deck_path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_games"], 4);
    let counted = ["first_wins", "second_wins", "ties", "unfinished"]
        .iter()
        .map(|k| json[*k].as_u64().unwrap())
        .sum::<u64>();
    assert_eq!(counted, 4);
    assert_eq!(json["games"][1]["red"], "fill-first");
}

#[test]
fn test_cli_rejects_unknown_strategy() {
    let output = pawns()
        .args(["play", "--red", "minimax", "--blue", "fill-first"])
        .arg("--red-deck")
        .arg(deck_path())
        .output()
        .unwrap();
    assert!(!output.status.success());
}
