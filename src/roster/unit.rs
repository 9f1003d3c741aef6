//! Roster unit records as served by the data source

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::core::types::DEFAULT_LANGUAGE;

/// Roster category a composition can move a unit into
///
/// Characters never take part in composition overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Special,
    Rare,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Special => "special",
            Category::Rare => "rare",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Category::Core),
            "special" => Ok(Category::Special),
            "rare" => Ok(Category::Rare),
            _ => Err(()),
        }
    }
}

/// Per-composition classification of a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionOverride {
    /// `None` when the data names a category we don't know; such a unit
    /// matches no bucket and is dropped by the resolver.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
}

impl CompositionOverride {
    pub fn new(category: Category) -> Self {
        Self {
            category: Some(category),
        }
    }
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A single roster entry
///
/// Only the fields the builder reasons about are typed. Everything else the
/// data source sends (command groups, equipment, options, ...) is kept in
/// `extra` and travels with the unit when it is added to a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,

    #[serde(default)]
    pub name_en: String,

    /// Minimum squad size; when set, `points` is per model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,

    #[serde(default)]
    pub points: u32,

    #[serde(
        rename = "armyComposition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub army_composition: Option<AHashMap<String, CompositionOverride>>,

    /// Localised names (`name_de`, `name_fr`, ...) and untyped unit data
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Unit {
    pub fn new(id: impl Into<String>, name_en: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            name_en: name_en.into(),
            minimum: None,
            points,
            army_composition: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Builder method to set the minimum squad size.
    pub fn with_minimum(mut self, minimum: u32) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Builder method to add a composition override.
    pub fn with_override(mut self, composition: impl Into<String>, category: Category) -> Self {
        self.army_composition
            .get_or_insert_with(AHashMap::new)
            .insert(composition.into(), CompositionOverride::new(category));
        self
    }

    /// Builder method to add a localised name.
    pub fn with_name(mut self, language: &str, name: impl Into<String>) -> Self {
        if language == DEFAULT_LANGUAGE {
            self.name_en = name.into();
        } else {
            self.extra.insert(
                format!("name_{}", language),
                serde_json::Value::String(name.into()),
            );
        }
        self
    }

    pub fn override_for(&self, composition: &str) -> Option<&CompositionOverride> {
        self.army_composition.as_ref()?.get(composition)
    }

    /// Category this composition moves the unit into, if any
    pub fn override_category(&self, composition: &str) -> Option<Category> {
        self.override_for(composition)?.category
    }

    /// A unit without composition data belongs to every army; one with
    /// composition data only to the compositions it lists.
    pub fn is_eligible(&self, composition: &str) -> bool {
        match &self.army_composition {
            None => true,
            Some(map) => map.contains_key(composition),
        }
    }

    /// Whether the unit ends up in `target` under `composition`
    pub fn placed_in(&self, composition: &str, target: Category) -> bool {
        match &self.army_composition {
            None => true,
            Some(_) => self.override_category(composition) == Some(target),
        }
    }

    /// Name in `language`, falling back to English
    pub fn display_name(&self, language: &str) -> &str {
        if language != DEFAULT_LANGUAGE {
            let key = format!("name_{}", language);
            if let Some(name) = self.extra.get(&key).and_then(|v| v.as_str()) {
                if !name.is_empty() {
                    return name;
                }
            }
        }
        &self.name_en
    }

    /// Cost of the unit at its minimum size
    pub fn points_cost(&self) -> u32 {
        match self.minimum {
            Some(minimum) => self.points * minimum,
            None => self.points,
        }
    }

    /// List label, e.g. `"10 State Troops"`
    pub fn label(&self, language: &str) -> String {
        match self.minimum {
            Some(minimum) => format!("{} {}", minimum, self.display_name(language)),
            None => self.display_name(language).to_string(),
        }
    }
}
