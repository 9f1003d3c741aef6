//! Army rosters and composition resolution
//!
//! Roster JSON -> Roster -> resolve(composition) -> ResolvedRoster

pub mod resolver;
pub mod section;
pub mod unit;

pub use resolver::{resolve, source_id, ResolvedRoster, Roster, MIGRATIONS};
pub use section::Section;
pub use unit::{Category, CompositionOverride, Unit};
