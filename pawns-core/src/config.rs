//! GameConfig - board dimensions, hand size and rule variant

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rules::RuleVariant;

/// Settings needed to construct and start a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub hand_size: usize,
    pub variant: RuleVariant,
}

impl GameConfig {
    /// Reject configurations the engine would refuse
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols <= 1 || self.cols % 2 == 0 {
            return Err(GameError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.hand_size == 0 {
            return Err(GameError::InvalidHandSize);
        }
        Ok(())
    }

    /// Cards each deck must hold for this board
    pub fn min_deck_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Load from JSON file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&content).with_context(|| format!("Malformed config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 7,
            hand_size: 5,
            variant: RuleVariant::Updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_deck_size(), 35);
    }

    #[test]
    fn test_validate() {
        let even = GameConfig { cols: 6, ..Default::default() };
        assert!(matches!(even.validate(), Err(GameError::InvalidDimensions { .. })));
        let no_hand = GameConfig { hand_size: 0, ..Default::default() };
        assert_eq!(no_hand.validate(), Err(GameError::InvalidHandSize));
    }

    #[test]
    fn test_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"rows": 3, "variant": "legacy"}"#).unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.cols, 7);
        assert_eq!(config.variant, RuleVariant::Legacy);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pawns-config-{}.json", std::process::id()));
        let config = GameConfig { rows: 3, cols: 5, hand_size: 4, variant: RuleVariant::Legacy };
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_names_the_file() {
        let path = std::env::temp_dir().join(format!("pawns-bad-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"rows\": 3, ").unwrap();
        let err = GameConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        let message = format!("{err:#}");
        assert!(message.contains("Malformed config"));
        assert!(message.contains(&path.display().to_string()));

        let missing = GameConfig::load(&path).unwrap_err();
        assert!(missing.to_string().contains("Failed to read config"));
    }
}
