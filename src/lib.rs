//! Old World Builder - army list building for tabletop wargames

pub mod catalog;
pub mod core;
pub mod list;
pub mod roster;
pub mod session;
pub mod source;
pub mod view;
