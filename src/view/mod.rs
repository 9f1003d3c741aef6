//! "Add unit" view state
//!
//! Loads what the add-unit screen shows for a list: the list's own army,
//! resolved with the list's composition, or for the allies section every
//! allied army resolved with the ally as composition. Then commits a chosen
//! unit to the list.

mod add_unit;

pub use add_unit::{AddUnitView, AllyGroup, PendingAllies};
