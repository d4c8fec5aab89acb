//! RuleSet - influence effects and row scoring
//!
//! One engine serves both rule variants: a rule set injects the
//! `InfluenceKind -> effect` table and the per-card scoring function.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::card::{Card, InfluenceKind};
use crate::cell::Cell;
use crate::player::Player;

/// Per-card row score contribution: (card, cell modifier) -> points.
/// Scores are u64 so any accepted card value plus any modifier fits.
pub type CardScoreFn = fn(&Card, i32) -> u64;

/// Named rule variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVariant {
    /// Claim-only influence, cards score their face value
    Legacy,
    /// Claim, upgrade and devalue; cards score value + modifier
    #[default]
    Updated,
}

impl std::str::FromStr for RuleVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(RuleVariant::Legacy),
            "updated" => Ok(RuleVariant::Updated),
            other => Err(format!("unknown rule variant '{other}'")),
        }
    }
}

/// What an influence does to its target cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfluenceEffect {
    /// Add a pawn to an empty or own stack below the cap, or capture an
    /// opponent stack. Cells holding a card are untouched.
    Claim,
    /// +1 to the cell modifier
    Upgrade,
    /// -1 to the cell modifier; a card whose adjusted value drops to zero
    /// or below is destroyed and refunded as pawns to its owner
    Devalue,
}

/// Observable result of applying one influence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    Unchanged,
    PawnAdded,
    Captured,
    Modified(i32),
    Destroyed(Card),
}

impl InfluenceEffect {
    pub fn apply(self, cell: &mut Cell, owner: Player) -> EffectOutcome {
        match self {
            InfluenceEffect::Claim => {
                if cell.has_card() {
                    return EffectOutcome::Unchanged;
                }
                match cell.pawn_owner() {
                    Some(current) if current != owner => {
                        cell.capture(owner);
                        EffectOutcome::Captured
                    }
                    _ => {
                        if cell.add_pawn(owner) {
                            EffectOutcome::PawnAdded
                        } else {
                            EffectOutcome::Unchanged
                        }
                    }
                }
            }
            InfluenceEffect::Upgrade => {
                cell.change_modifier(1);
                EffectOutcome::Modified(cell.modifier())
            }
            InfluenceEffect::Devalue => {
                cell.change_modifier(-1);
                destroy_if_worthless(cell).unwrap_or(EffectOutcome::Modified(cell.modifier()))
            }
        }
    }
}

fn destroy_if_worthless(cell: &mut Cell) -> Option<EffectOutcome> {
    let card = cell.card()?;
    if i64::from(card.value()) + i64::from(cell.modifier()) > 0 {
        return None;
    }
    let (cost, owner) = (card.cost(), card.owner()?);
    let removed = cell.replace_card_with_pawns(cost, owner)?;
    cell.reset_modifier();
    Some(EffectOutcome::Destroyed(removed))
}

fn face_value(card: &Card, _modifier: i32) -> u64 {
    u64::from(card.value())
}

fn modified_value(card: &Card, modifier: i32) -> u64 {
    u64::try_from(i64::from(card.value()) + i64::from(modifier)).unwrap_or(0)
}

/// Influence table plus scoring function
#[derive(Clone, Debug)]
pub struct RuleSet {
    pub name: String,
    effects: FxHashMap<InfluenceKind, InfluenceEffect>,
    card_score: CardScoreFn,
}

impl RuleSet {
    /// Empty rule set: no influence has any effect until registered
    pub fn new(name: &str, card_score: CardScoreFn) -> Self {
        Self {
            name: name.to_string(),
            effects: FxHashMap::default(),
            card_score,
        }
    }

    pub fn with_effect(mut self, kind: InfluenceKind, effect: InfluenceEffect) -> Self {
        self.effects.insert(kind, effect);
        self
    }

    /// Boolean influence: every marked cell claims, cards score face value
    pub fn legacy() -> Self {
        Self::new("legacy", face_value)
            .with_effect(InfluenceKind::Claim, InfluenceEffect::Claim)
            .with_effect(InfluenceKind::Upgrade, InfluenceEffect::Claim)
            .with_effect(InfluenceKind::Devalue, InfluenceEffect::Claim)
    }

    /// Claim/upgrade/devalue with modifier-aware scoring
    pub fn updated() -> Self {
        Self::new("updated", modified_value)
            .with_effect(InfluenceKind::Claim, InfluenceEffect::Claim)
            .with_effect(InfluenceKind::Upgrade, InfluenceEffect::Upgrade)
            .with_effect(InfluenceKind::Devalue, InfluenceEffect::Devalue)
    }

    pub fn for_variant(variant: RuleVariant) -> Self {
        match variant {
            RuleVariant::Legacy => Self::legacy(),
            RuleVariant::Updated => Self::updated(),
        }
    }

    /// Effect registered for an influence kind (None = no effect)
    pub fn effect(&self, kind: InfluenceKind) -> Option<InfluenceEffect> {
        self.effects.get(&kind).copied()
    }

    /// Score a placed card sitting in a cell with the given modifier
    pub fn card_score(&self, card: &Card, modifier: i32) -> u64 {
        (self.card_score)(card, modifier)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::updated()
    }
}
