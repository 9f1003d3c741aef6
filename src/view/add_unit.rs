use std::sync::Arc;
use tokio::task::JoinSet;

use crate::catalog::GameCatalog;
use crate::core::error::{BuilderError, Result};
use crate::core::types::ListId;
use crate::list::{editor_path, ArmyList, ListStore};
use crate::roster::{resolve, ResolvedRoster, Roster, Section, Unit};
use crate::session::{AllyAccumulator, AllyRoster, SessionId};
use crate::source::RosterSource;

/// What a resolved army roster was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArmyKey {
    game: String,
    army: String,
    composition: String,
}

impl ArmyKey {
    fn for_list(list: &ArmyList) -> Self {
        Self {
            game: list.game.clone(),
            army: list.army.clone(),
            composition: list.composition().to_string(),
        }
    }
}

#[derive(Debug)]
struct LoadedArmy {
    key: ArmyKey,
    roster: ResolvedRoster,
}

/// Ally fetches issued for one session and not yet collected
pub struct PendingAllies {
    session: SessionId,
    tasks: JoinSet<(String, Result<Roster>)>,
}

/// One allied army's units as shown in the allies section
#[derive(Debug)]
pub struct AllyGroup<'a> {
    pub ally: &'a str,
    pub name: &'a str,
    pub units: Vec<&'a Unit>,
}

pub struct AddUnitView {
    source: Arc<dyn RosterSource>,
    catalog: Arc<GameCatalog>,
    language: String,
    location: Option<String>,
    army: Option<LoadedArmy>,
    allies: AllyAccumulator,
    expected_allies: Vec<String>,
    failed_allies: Vec<String>,
}

impl AddUnitView {
    pub fn new(source: Arc<dyn RosterSource>, catalog: Arc<GameCatalog>, language: &str) -> Self {
        Self {
            source,
            catalog,
            language: language.to_string(),
            location: None,
            army: None,
            allies: AllyAccumulator::new(),
            expected_allies: Vec::new(),
            failed_allies: Vec::new(),
        }
    }

    /// Enter a view location (route). Changing location ends the ally
    /// session, so fetches still in flight for the old location are dropped.
    ///
    /// Returns true if the location changed.
    pub fn navigate(&mut self, location: &str) -> bool {
        if self.location.as_deref() == Some(location) {
            return false;
        }
        tracing::debug!(from = ?self.location, to = location, "Navigating");
        self.location = Some(location.to_string());
        self.allies.begin();
        self.expected_allies.clear();
        self.failed_allies.clear();
        true
    }

    /// Fetch and resolve the list's army with the list's composition
    ///
    /// A roster already resolved for the same game, army and composition is
    /// reused. Compositions the catalog doesn't list for the army are rejected.
    pub async fn load_army(&mut self, list: &ArmyList) -> Result<&ResolvedRoster> {
        let key = ArmyKey::for_list(list);
        self.catalog
            .check_composition(&key.game, &key.army, &key.composition)?;
        let loaded = match self.army.take() {
            Some(loaded) if loaded.key == key => loaded,
            _ => {
                let roster = self.source.fetch(&key.game, &key.army).await?;
                let resolved = resolve(&roster, &key.composition);
                LoadedArmy {
                    key,
                    roster: resolved,
                }
            }
        };
        Ok(&self.army.insert(loaded).roster)
    }

    pub fn army(&self) -> Option<&ResolvedRoster> {
        self.army.as_ref().map(|loaded| &loaded.roster)
    }

    /// Start one fetch per allied army of the list's army
    ///
    /// Starts a new ally session; nothing is recorded until the returned
    /// fetches are collected.
    pub fn request_allies(&mut self, list: &ArmyList) -> Result<PendingAllies> {
        let expected = self.catalog.allies_of(&list.game, &list.army)?.to_vec();
        let session = self.allies.begin();
        self.expected_allies = expected.clone();
        self.failed_allies.clear();

        let mut tasks = JoinSet::new();
        for ally in &expected {
            let source = Arc::clone(&self.source);
            let game = list.game.clone();
            let ally = ally.clone();
            tasks.spawn(async move {
                let result = source.fetch(&game, &ally).await;
                (ally, result)
            });
        }

        tracing::info!(
            session = session.0,
            count = expected.len(),
            "Requested ally rosters"
        );

        Ok(PendingAllies { session, tasks })
    }

    /// Resolve and record ally rosters as their fetches complete
    ///
    /// Completions are recorded in arrival order. Returns how many were
    /// recorded; completions for an ended session are discarded.
    pub async fn collect_allies(&mut self, mut pending: PendingAllies) -> usize {
        let mut accepted = 0;
        while let Some(joined) = pending.tasks.join_next().await {
            match joined {
                Ok((ally, Ok(roster))) => {
                    let resolved = resolve(&roster, &ally);
                    if self.allies.accept(pending.session, &ally, resolved) {
                        accepted += 1;
                    }
                }
                Ok((ally, Err(e))) => {
                    tracing::warn!(ally = %ally, "Failed to load ally roster: {}", e);
                    if pending.session == self.allies.session() {
                        self.failed_allies.push(ally);
                    }
                }
                Err(e) => tracing::error!("Ally fetch task failed: {}", e),
            }
        }
        accepted
    }

    /// Request and collect every ally roster of the list's army
    pub async fn load_allies(&mut self, list: &ArmyList) -> Result<usize> {
        let pending = self.request_allies(list)?;
        Ok(self.collect_allies(pending).await)
    }

    pub fn ally_rosters(&self) -> &[AllyRoster] {
        self.allies.entries()
    }

    /// Whether the section still waits on data for `list`
    pub fn is_loading(&self, list: &ArmyList, section: Section) -> bool {
        match section {
            Section::Allies => {
                let waiting: Vec<String> = self
                    .expected_allies
                    .iter()
                    .filter(|ally| !self.failed_allies.contains(*ally))
                    .cloned()
                    .collect();
                !self.allies.is_complete(&waiting)
            }
            _ => !matches!(&self.army, Some(loaded) if loaded.key == ArmyKey::for_list(list)),
        }
    }

    /// Units offered in a section of the list's own army
    pub fn units(&self, section: Section) -> &[Unit] {
        self.army().map(|roster| roster.section(section)).unwrap_or(&[])
    }

    /// Allied units grouped by ally, in arrival order
    pub fn ally_groups(&self, game: &str) -> Vec<AllyGroup<'_>> {
        self.allies
            .entries()
            .iter()
            .map(|entry| AllyGroup {
                ally: &entry.ally,
                name: self
                    .catalog
                    .army_name(game, &entry.ally, &self.language)
                    .unwrap_or(entry.ally.as_str()),
                units: entry.roster.composed_units().collect(),
            })
            .collect()
    }

    /// Resolved ids are only unique within one roster, so allied units are
    /// looked up in the named ally's roster.
    fn find_ally_unit(&self, ally: &str, unit_id: &str) -> Option<&Unit> {
        self.allies
            .entries()
            .iter()
            .find(|entry| entry.ally == ally)
            .and_then(|entry| entry.roster.composed_units().find(|unit| unit.id == unit_id))
    }

    /// Commit an offered unit of the list's own army
    ///
    /// Returns the editor route of the newly added unit. Allied units are
    /// committed with [`AddUnitView::add_ally_unit`].
    pub fn add_unit(
        &self,
        store: &mut ListStore,
        list: &ListId,
        section: Section,
        unit_id: &str,
    ) -> Result<String> {
        let not_offered = || BuilderError::UnitNotOffered {
            section,
            unit: unit_id.to_string(),
        };
        if section == Section::Allies {
            return Err(not_offered());
        }
        let unit = self
            .units(section)
            .iter()
            .find(|unit| unit.id == unit_id)
            .ok_or_else(not_offered)?;
        let added = store.add_unit(list, section, unit)?;
        Ok(editor_path(list, section, &added))
    }

    /// Commit a unit of an allied army to the list's allies section
    pub fn add_ally_unit(
        &self,
        store: &mut ListStore,
        list: &ListId,
        ally: &str,
        unit_id: &str,
    ) -> Result<String> {
        let unit = self
            .find_ally_unit(ally, unit_id)
            .ok_or_else(|| BuilderError::UnitNotOffered {
                section: Section::Allies,
                unit: format!("{}/{}", ally, unit_id),
            })?;
        let added = store.add_unit(list, Section::Allies, unit)?;
        Ok(editor_path(list, Section::Allies, &added))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Category;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        rosters: HashMap<String, Roster>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl RosterSource for CountingSource {
        async fn fetch(&self, _game: &str, army: &str) -> Result<Roster> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.rosters
                .get(army)
                .cloned()
                .ok_or_else(|| BuilderError::Fetch(format!("no roster for {}", army)))
        }
    }

    fn catalog() -> Arc<GameCatalog> {
        Arc::new(
            GameCatalog::from_json_str(
                r#"[{ "id": "tow", "armies": [
                    { "id": "empire", "name_en": "Empire",
                      "allies": ["dwarfs", "missing"], "armyComposition": ["nuln"] },
                    { "id": "dwarfs", "name_en": "Dwarfs" }
                ] }]"#,
            )
            .unwrap(),
        )
    }

    fn source() -> Arc<CountingSource> {
        let mut rosters = HashMap::new();
        rosters.insert(
            "empire".to_string(),
            Roster {
                core: vec![Unit::new("state-troops", "State Troops", 5).with_minimum(10)],
                special: vec![
                    Unit::new("knights", "Knights", 20).with_override("nuln", Category::Core)
                ],
                ..Roster::default()
            },
        );
        rosters.insert(
            "dwarfs".to_string(),
            Roster {
                core: vec![Unit::new("warriors", "Warriors", 9)
                    .with_override("dwarfs", Category::Core)
                    .with_override("karak", Category::Special)],
                ..Roster::default()
            },
        );
        Arc::new(CountingSource {
            rosters,
            fetches: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_load_army_uses_list_composition() {
        let source = source();
        let mut view = AddUnitView::new(source.clone(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire").with_composition("nuln");

        let roster = view.load_army(&list).await.unwrap();
        assert_eq!(roster.core.len(), 2);
        assert!(!view.is_loading(&list, Section::Core));

        view.load_army(&list).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_army_refetches_for_new_composition() {
        let source = source();
        let mut view = AddUnitView::new(source.clone(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire");

        assert_eq!(view.load_army(&list).await.unwrap().core.len(), 1);
        let list = list.with_composition("nuln");
        assert!(view.is_loading(&list, Section::Core));
        assert_eq!(view.load_army(&list).await.unwrap().core.len(), 2);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_ally_does_not_block_loading() {
        let mut view = AddUnitView::new(source(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire");

        let accepted = view.load_allies(&list).await.unwrap();
        assert_eq!(accepted, 1);
        assert!(!view.is_loading(&list, Section::Allies));

        let groups = view.ally_groups("tow");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Dwarfs");
        assert_eq!(groups[0].units.len(), 1);
    }

    #[tokio::test]
    async fn test_navigation_discards_pending_allies() {
        let mut view = AddUnitView::new(source(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire");
        view.navigate("/add/allies");

        let pending = view.request_allies(&list).unwrap();
        assert!(view.navigate("/editor"));
        assert_eq!(view.collect_allies(pending).await, 0);
        assert!(view.ally_rosters().is_empty());
    }

    #[tokio::test]
    async fn test_add_unit_commits_offered_unit() {
        let mut view = AddUnitView::new(source(), catalog(), "en");
        let mut store = ListStore::new();
        let list = ArmyList::new("List", "tow", "empire");
        let list_id = store.insert(list.clone());

        view.load_army(&list).await.unwrap();
        let offered = view.units(Section::Core)[0].id.clone();
        let path = view
            .add_unit(&mut store, &list_id, Section::Core, &offered)
            .unwrap();

        assert!(path.starts_with(&format!("/editor/{}/core/state-troops.", list_id)));
        assert_eq!(store.get(&list_id).unwrap().units(Section::Core).len(), 1);

        let missing = view.add_unit(&mut store, &list_id, Section::Core, "nothing.0");
        assert!(matches!(missing, Err(BuilderError::UnitNotOffered { .. })));
    }

    #[tokio::test]
    async fn test_load_army_rejects_unknown_composition() {
        let source = source();
        let mut view = AddUnitView::new(source.clone(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire").with_composition("karak");

        let result = view.load_army(&list).await;
        assert!(matches!(result, Err(BuilderError::UnknownComposition { .. })));
        assert!(view.army().is_none());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allies_loading_until_collected() {
        let mut view = AddUnitView::new(source(), catalog(), "en");
        let list = ArmyList::new("List", "tow", "empire");

        let pending = view.request_allies(&list).unwrap();
        assert!(view.is_loading(&list, Section::Allies));
        view.collect_allies(pending).await;
        assert!(!view.is_loading(&list, Section::Allies));
    }

    #[tokio::test]
    async fn test_add_ally_unit_picks_from_named_ally() {
        let wizard = |name: &str, points| Roster {
            characters: vec![Unit::new("wizard", name, points)],
            ..Roster::default()
        };
        let mut rosters = HashMap::new();
        rosters.insert("dwarfs".to_string(), wizard("Runesmith", 60));
        rosters.insert("missing".to_string(), wizard("Damsel", 45));
        let source = Arc::new(CountingSource {
            rosters,
            fetches: AtomicUsize::new(0),
        });

        let mut view = AddUnitView::new(source, catalog(), "en");
        let mut store = ListStore::new();
        let list = ArmyList::new("List", "tow", "empire");
        let list_id = store.insert(list.clone());
        assert_eq!(view.load_allies(&list).await.unwrap(), 2);

        // both allies resolve their wizard to the same positional id
        for entry in view.ally_rosters() {
            assert_eq!(entry.roster.characters[0].id, "wizard.0");
        }

        view.add_ally_unit(&mut store, &list_id, "missing", "wizard.0")
            .unwrap();
        view.add_ally_unit(&mut store, &list_id, "dwarfs", "wizard.0")
            .unwrap();
        let names: Vec<&str> = store
            .get(&list_id)
            .unwrap()
            .units(Section::Allies)
            .iter()
            .map(|unit| unit.name_en.as_str())
            .collect();
        assert_eq!(names, ["Damsel", "Runesmith"]);

        let unscoped = view.add_unit(&mut store, &list_id, Section::Allies, "wizard.0");
        assert!(matches!(unscoped, Err(BuilderError::UnitNotOffered { .. })));
        let unknown = view.add_ally_unit(&mut store, &list_id, "elves", "wizard.0");
        assert!(matches!(unknown, Err(BuilderError::UnitNotOffered { .. })));
    }
}
