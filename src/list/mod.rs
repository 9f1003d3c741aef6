//! User army lists
//!
//! A list is the user's in-progress army: which game and army it is for, an
//! optional composition override, and the units added to each section.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{BuilderError, Result};
use crate::core::types::{random_id, ListId};
use crate::roster::{source_id, Section, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyList {
    pub id: ListId,
    pub name: String,
    pub game: String,
    pub army: String,

    /// Composition selected by the list owner; the army itself when absent
    #[serde(rename = "armyComposition", default, skip_serializing_if = "Option::is_none")]
    pub army_composition: Option<String>,

    #[serde(default)]
    pub sections: BTreeMap<Section, Vec<Unit>>,
}

impl ArmyList {
    pub fn new(name: impl Into<String>, game: impl Into<String>, army: impl Into<String>) -> Self {
        Self {
            id: ListId::generate(),
            name: name.into(),
            game: game.into(),
            army: army.into(),
            army_composition: None,
            sections: BTreeMap::new(),
        }
    }

    /// Builder method to select a composition.
    pub fn with_composition(mut self, composition: impl Into<String>) -> Self {
        self.army_composition = Some(composition.into());
        self
    }

    /// Composition rosters for this list are resolved with
    pub fn composition(&self) -> &str {
        self.army_composition.as_deref().unwrap_or(&self.army)
    }

    pub fn units(&self, section: Section) -> &[Unit] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_unit(&self, section: Section, unit_id: &str) -> Option<&Unit> {
        self.units(section).iter().find(|unit| unit.id == unit_id)
    }

    /// Add a copy of a roster unit under a new, globally unique id
    ///
    /// The new id is `<roster id>.<random>`, with any position suffix from
    /// resolution stripped first; returns it.
    pub fn add_unit(&mut self, section: Section, unit: &Unit) -> String {
        let mut added = unit.clone();
        added.id = format!("{}.{}", source_id(&unit.id), random_id());
        let id = added.id.clone();
        self.sections.entry(section).or_default().push(added);
        id
    }

    pub fn total_points(&self) -> u32 {
        self.sections
            .values()
            .flatten()
            .map(Unit::points_cost)
            .sum()
    }
}

/// Editor route for a unit in a list
pub fn editor_path(list: &ListId, section: Section, unit_id: &str) -> String {
    format!("/editor/{}/{}/{}", list, section, unit_id)
}

/// The user's lists
#[derive(Debug, Default)]
pub struct ListStore {
    lists: AHashMap<ListId, ArmyList>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, list: ArmyList) -> ListId {
        let id = list.id.clone();
        self.lists.insert(id.clone(), list);
        id
    }

    pub fn get(&self, id: &ListId) -> Result<&ArmyList> {
        self.lists
            .get(id)
            .ok_or_else(|| BuilderError::ListNotFound(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Commit a chosen unit to a list, returning the added unit's id
    pub fn add_unit(&mut self, id: &ListId, section: Section, unit: &Unit) -> Result<String> {
        let list = self
            .lists
            .get_mut(id)
            .ok_or_else(|| BuilderError::ListNotFound(id.clone()))?;
        let unit_id = list.add_unit(section, unit);
        tracing::info!(list = %id, %section, unit = %unit_id, "Added unit");
        Ok(unit_id)
    }
}
