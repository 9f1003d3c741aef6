use thiserror::Error;

use crate::core::types::ListId;
use crate::roster::Section;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Game system not found: {0}")]
    GameNotFound(String),

    #[error("Army {army} not found in game {game}")]
    ArmyNotFound { game: String, army: String },

    #[error("Composition {composition} is not available to army {army}")]
    UnknownComposition { army: String, composition: String },

    #[error("List not found: {0}")]
    ListNotFound(ListId),

    #[error("Unit {unit} is not offered in section {section}")]
    UnitNotOffered { section: Section, unit: String },

    #[error("Unknown list section: {0}")]
    UnknownSection(String),

    #[error("Roster fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BuilderError>;
