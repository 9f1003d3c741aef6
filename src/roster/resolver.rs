//! Army composition resolution
//!
//! A roster as served by the data source lists every unit the faction can
//! ever take. An army composition (a named variant of the army, or the
//! allied contingent of another army) narrows that down and may move units
//! between core, special and rare. `resolve` applies one composition to a
//! roster:
//!
//! 1. drop units whose composition data doesn't mention the composition,
//! 2. collect the units each allowed migration moves, looking at the
//!    unfiltered native lists,
//! 3. rebuild core/special/rare from native list plus incoming migrations,
//!    keeping only units whose placement for the composition is that bucket,
//! 4. renumber every list.

use serde::{Deserialize, Serialize};

use super::section::Section;
use super::unit::{Category, Unit};

/// Category moves a composition is allowed to apply, as (from, to).
///
/// There is no core -> rare move: a core unit overridden to rare ends up in
/// no bucket at all.
pub const MIGRATIONS: [(Category, Category); 5] = [
    (Category::Special, Category::Core),
    (Category::Rare, Category::Core),
    (Category::Core, Category::Special),
    (Category::Rare, Category::Special),
    (Category::Special, Category::Rare),
];

/// Unresolved roster for one army, as fetched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub lords: Vec<Unit>,
    pub heroes: Vec<Unit>,
    pub characters: Vec<Unit>,
    pub core: Vec<Unit>,
    pub special: Vec<Unit>,
    pub rare: Vec<Unit>,
    pub mercenaries: Vec<Unit>,
    pub allies: Vec<Unit>,
}

impl Roster {
    fn native(&self, category: Category) -> &[Unit] {
        match category {
            Category::Core => &self.core,
            Category::Special => &self.special,
            Category::Rare => &self.rare,
        }
    }
}

/// Roster with one composition applied
///
/// Unit ids are renumbered on every resolution and only identify a unit
/// within this value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoster {
    pub lords: Vec<Unit>,
    pub heroes: Vec<Unit>,
    pub characters: Vec<Unit>,
    pub core: Vec<Unit>,
    pub special: Vec<Unit>,
    pub rare: Vec<Unit>,
    pub mercenaries: Vec<Unit>,
    pub allies: Vec<Unit>,
}

impl ResolvedRoster {
    pub fn section(&self, section: Section) -> &[Unit] {
        match section {
            Section::Lords => &self.lords,
            Section::Heroes => &self.heroes,
            Section::Characters => &self.characters,
            Section::Core => &self.core,
            Section::Special => &self.special,
            Section::Rare => &self.rare,
            Section::Mercenaries => &self.mercenaries,
            Section::Allies => &self.allies,
        }
    }

    /// Characters, core, special and rare, in that order
    pub fn composed_units(&self) -> impl Iterator<Item = &Unit> {
        Section::COMPOSED
            .into_iter()
            .flat_map(move |section| self.section(section).iter())
    }
}

/// Apply `composition` to `roster`
pub fn resolve(roster: &Roster, composition: &str) -> ResolvedRoster {
    let resolved = ResolvedRoster {
        lords: renumber(roster.lords.clone()),
        heroes: renumber(roster.heroes.clone()),
        characters: renumber(eligible(&roster.characters, composition)),
        core: renumber(bucket(roster, composition, Category::Core)),
        special: renumber(bucket(roster, composition, Category::Special)),
        rare: renumber(bucket(roster, composition, Category::Rare)),
        mercenaries: renumber(roster.mercenaries.clone()),
        allies: renumber(roster.allies.clone()),
    };

    tracing::debug!(
        composition,
        characters = resolved.characters.len(),
        core = resolved.core.len(),
        special = resolved.special.len(),
        rare = resolved.rare.len(),
        "Resolved roster"
    );

    resolved
}

fn eligible(units: &[Unit], composition: &str) -> Vec<Unit> {
    units
        .iter()
        .filter(|unit| unit.is_eligible(composition))
        .cloned()
        .collect()
}

/// Units a composition moves out of `from` into `to`
fn migrating(roster: &Roster, composition: &str, from: Category, to: Category) -> Vec<Unit> {
    roster
        .native(from)
        .iter()
        .filter(|unit| unit.override_category(composition) == Some(to))
        .cloned()
        .collect()
}

/// Eligible native units plus incoming migrations, kept only if placed in `target`
fn bucket(roster: &Roster, composition: &str, target: Category) -> Vec<Unit> {
    let mut units = eligible(roster.native(target), composition);
    for (from, to) in MIGRATIONS {
        if to == target {
            units.extend(migrating(roster, composition, from, to));
        }
    }
    units.retain(|unit| unit.placed_in(composition, target));
    units
}

/// Give each unit a fresh position-derived id, `<source id>.<index>`
fn renumber(units: Vec<Unit>) -> Vec<Unit> {
    units
        .into_iter()
        .enumerate()
        .map(|(index, mut unit)| {
            unit.id = format!("{}.{}", unit.id, index);
            unit
        })
        .collect()
}

/// Strip the position suffix `resolve` added to a unit id
pub fn source_id(resolved_id: &str) -> &str {
    match resolved_id.rsplit_once('.') {
        Some((source, index)) if index.chars().all(|c| c.is_ascii_digit()) => source,
        _ => resolved_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(units: &[Unit]) -> Vec<&str> {
        units.iter().map(|u| u.name_en.as_str()).collect()
    }

    fn empire_roster() -> Roster {
        Roster {
            lords: vec![Unit::new("general", "General", 85)],
            characters: vec![
                Unit::new("captain", "Captain", 45),
                Unit::new("elector", "Elector Count", 110).with_override("empire", Category::Core),
            ],
            core: vec![
                Unit::new("state-troops", "State Troops", 5).with_minimum(10),
                Unit::new("militia", "Militia", 4)
                    .with_override("empire", Category::Core)
                    .with_override("nuln", Category::Special),
            ],
            special: vec![
                Unit::new("greatswords", "Greatswords", 12),
                Unit::new("knights", "Knights", 20)
                    .with_override("empire", Category::Special)
                    .with_override("order", Category::Core),
                Unit::new("handgunners", "Handgunners", 8).with_override("nuln", Category::Rare),
            ],
            rare: vec![
                Unit::new("tank", "Steam Tank", 250),
                Unit::new("outriders", "Outriders", 18)
                    .with_override("nuln", Category::Core)
                    .with_override("order", Category::Special),
            ],
            mercenaries: vec![Unit::new("ogres", "Ogres", 35)],
            ..Roster::default()
        }
    }

    #[test]
    fn test_base_composition() {
        let resolved = resolve(&empire_roster(), "empire");

        assert_eq!(names(&resolved.characters), ["Captain", "Elector Count"]);
        assert_eq!(names(&resolved.core), ["State Troops", "Militia"]);
        assert_eq!(names(&resolved.special), ["Greatswords", "Knights"]);
        assert_eq!(names(&resolved.rare), ["Steam Tank"]);
    }

    #[test]
    fn test_migrations_into_core_and_rare() {
        let resolved = resolve(&empire_roster(), "nuln");

        assert_eq!(names(&resolved.characters), ["Captain"]);
        assert_eq!(names(&resolved.core), ["State Troops", "Outriders"]);
        assert_eq!(names(&resolved.special), ["Greatswords", "Militia"]);
        assert_eq!(names(&resolved.rare), ["Steam Tank", "Handgunners"]);
    }

    #[test]
    fn test_special_to_core_and_rare_to_special() {
        let resolved = resolve(&empire_roster(), "order");

        assert_eq!(names(&resolved.core), ["State Troops", "Knights"]);
        assert_eq!(names(&resolved.special), ["Greatswords", "Outriders"]);
        assert_eq!(names(&resolved.rare), ["Steam Tank"]);
    }

    #[test]
    fn test_core_to_rare_is_not_a_migration() {
        let roster = Roster {
            core: vec![Unit::new("a", "Flagellants", 10).with_override("x", Category::Rare)],
            ..Roster::default()
        };
        let resolved = resolve(&roster, "x");

        assert!(resolved.core.is_empty());
        assert!(resolved.special.is_empty());
        assert!(resolved.rare.is_empty());
    }

    #[test]
    fn test_ids_are_positional() {
        let resolved = resolve(&empire_roster(), "nuln");
        let ids: Vec<&str> = resolved.core.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["state-troops.0", "outriders.1"]);
        assert_eq!(resolved.lords[0].id, "general.0");
        assert_eq!(source_id(&resolved.core[1].id), "outriders");
    }

    #[test]
    fn test_source_id_without_suffix() {
        assert_eq!(source_id("general"), "general");
        assert_eq!(source_id("empire.general"), "empire.general");
    }

    #[test]
    fn test_section_lookup() {
        let resolved = resolve(&empire_roster(), "empire");
        assert_eq!(names(resolved.section(Section::Mercenaries)), ["Ogres"]);
        assert_eq!(names(resolved.section(Section::Lords)), ["General"]);
        assert_eq!(resolved.composed_units().count(), 7);
    }

    #[test]
    fn test_roster_deserializes_with_missing_lists() {
        let roster: Roster = serde_json::from_str(
            r#"{ "core": [{ "id": "a", "name_en": "A", "points": 5 }] }"#,
        )
        .unwrap();
        assert_eq!(roster.core.len(), 1);
        assert!(roster.lords.is_empty());
        assert!(roster.allies.is_empty());
    }
}
