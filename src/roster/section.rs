//! List sections a unit can be added to

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::BuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Lords,
    Heroes,
    Characters,
    Core,
    Special,
    Rare,
    Mercenaries,
    Allies,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Lords,
        Section::Heroes,
        Section::Characters,
        Section::Core,
        Section::Special,
        Section::Rare,
        Section::Mercenaries,
        Section::Allies,
    ];

    /// Sections whose contents depend on the army composition
    pub const COMPOSED: [Section; 4] = [
        Section::Characters,
        Section::Core,
        Section::Special,
        Section::Rare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Lords => "lords",
            Section::Heroes => "heroes",
            Section::Characters => "characters",
            Section::Core => "core",
            Section::Special => "special",
            Section::Rare => "rare",
            Section::Mercenaries => "mercenaries",
            Section::Allies => "allies",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| BuilderError::UnknownSection(s.to_string()))
    }
}
