//! Check-deck command - parse a deck file and list its cards

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pawns_core::{load_deck, Card, GameConfig, InfluenceKind, INFLUENCE_SIZE};

#[derive(Args)]
pub struct CheckDeckArgs {
    /// Deck file to validate
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Print each card's influence grid
    #[arg(long)]
    pub grids: bool,
}

pub fn run(args: CheckDeckArgs) -> Result<()> {
    let cards = load_deck(&args.path)?;

    println!("{}: {} cards", args.path.display(), cards.len());
    for card in &cards {
        println!("  {}", summarize(card));
        if args.grids {
            for line in render_grid(card) {
                println!("      {line}");
            }
        }
    }

    let needed = GameConfig::default().min_deck_size();
    if cards.len() < needed {
        tracing::warn!(
            "Deck holds {} cards; a default board needs at least {}",
            cards.len(),
            needed
        );
    }
    Ok(())
}

/// `name  cost N  value N  [claim N, upgrade N, devalue N]`
fn summarize(card: &Card) -> String {
    let count = |kind: InfluenceKind| card.influence().offsets().filter(|&(_, _, k)| k == kind).count();
    format!(
        "{:<16} cost {}  value {:<3} claim {:>2}  upgrade {:>2}  devalue {:>2}",
        card.name(),
        card.cost(),
        card.value(),
        count(InfluenceKind::Claim),
        count(InfluenceKind::Upgrade),
        count(InfluenceKind::Devalue)
    )
}

/// Grid rows in deck-file notation, center marked `C`
fn render_grid(card: &Card) -> Vec<String> {
    let grid = card.influence();
    let center = INFLUENCE_SIZE / 2;
    (0..INFLUENCE_SIZE)
        .map(|i| {
            (0..INFLUENCE_SIZE)
                .map(|j| if (i, j) == (center, center) { 'C' } else { grid.get(i, j).symbol() })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawns_core::parse_deck;

    #[test]
    fn test_summarize_counts_kinds() {
        let cards = parse_deck("Bishop 2 3\nUXXXD\nXXXXX\nXICXX\nXXXXX\nDXXXU\n").unwrap();
        let line = summarize(&cards[0]);
        assert!(line.starts_with("Bishop"));
        // the center claim counts too
        assert!(line.contains("claim  2"));
        assert!(line.contains("upgrade  2"));
        assert!(line.contains("devalue  2"));
    }

    #[test]
    fn test_render_grid() {
        let cards = parse_deck("A 1 1\nXXXXX\nXXIXX\nXICIX\nXXIXX\nXXXXX\n").unwrap();
        let lines = render_grid(&cards[0]);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "XXIXX");
        assert_eq!(lines[2], "XICIX");
    }
}
