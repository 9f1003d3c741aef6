//! Game system catalog
//!
//! The catalog is a JSON list of game systems, each with the armies that
//! can be built for it. It is bundled with the application rather than
//! fetched, so it is loaded once and looked up by id.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{BuilderError, Result};
use crate::core::types::DEFAULT_LANGUAGE;

/// One buildable army in a game system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyInfo {
    pub id: String,

    #[serde(default)]
    pub name_en: String,

    /// Armies whose units this army may take as allies
    #[serde(default)]
    pub allies: Vec<String>,

    /// Alternative compositions a list of this army may select
    #[serde(rename = "armyComposition", default)]
    pub compositions: Vec<String>,

    /// Localised names
    #[serde(flatten)]
    pub names: serde_json::Map<String, serde_json::Value>,
}

impl ArmyInfo {
    pub fn display_name(&self, language: &str) -> &str {
        if language != DEFAULT_LANGUAGE {
            if let Some(name) = self
                .names
                .get(&format!("name_{}", language))
                .and_then(|v| v.as_str())
                .filter(|name| !name.is_empty())
            {
                return name;
            }
        }
        &self.name_en
    }

    /// Whether `composition` is valid for a list of this army
    ///
    /// The army's own id is always a valid composition.
    pub fn allows_composition(&self, composition: &str) -> bool {
        composition == self.id || self.compositions.iter().any(|c| c == composition)
    }
}

/// A game system and its armies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSystem {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub armies: Vec<ArmyInfo>,
}

impl GameSystem {
    pub fn find_army(&self, army: &str) -> Option<&ArmyInfo> {
        self.armies.iter().find(|a| a.id == army)
    }
}

/// All known game systems
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameSystem>,
    by_id: AHashMap<String, usize>,
}

impl GameCatalog {
    pub fn new(games: Vec<GameSystem>) -> Self {
        let by_id = games
            .iter()
            .enumerate()
            .map(|(index, game)| (game.id.clone(), index))
            .collect();
        Self { games, by_id }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let games: Vec<GameSystem> = serde_json::from_str(content)?;
        Ok(Self::new(games))
    }

    /// Load the catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded {} game systems from {}",
            catalog.games.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn games(&self) -> &[GameSystem] {
        &self.games
    }

    pub fn find_game(&self, game: &str) -> Option<&GameSystem> {
        self.by_id.get(game).map(|&index| &self.games[index])
    }

    pub fn army(&self, game: &str, army: &str) -> Result<&ArmyInfo> {
        self.find_game(game)
            .ok_or_else(|| BuilderError::GameNotFound(game.to_string()))?
            .find_army(army)
            .ok_or_else(|| BuilderError::ArmyNotFound {
                game: game.to_string(),
                army: army.to_string(),
            })
    }

    /// Display name of an army, falling back to English
    pub fn army_name(&self, game: &str, army: &str, language: &str) -> Result<&str> {
        Ok(self.army(game, army)?.display_name(language))
    }

    /// Check that a list of `army` may select `composition`
    pub fn check_composition(&self, game: &str, army: &str, composition: &str) -> Result<()> {
        if self.army(game, army)?.allows_composition(composition) {
            Ok(())
        } else {
            Err(BuilderError::UnknownComposition {
                army: army.to_string(),
                composition: composition.to_string(),
            })
        }
    }

    /// Allied armies of `army`, empty if it has none
    pub fn allies_of(&self, game: &str, army: &str) -> Result<&[String]> {
        Ok(&self.army(game, army)?.allies)
    }
}
