//! Roster data sources
//!
//! Rosters are keyed by (game, army) and laid out as
//! `games/<game>/<army>.json`, either on the data server or on disk.

pub mod client;
pub mod file;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{BuilderConfig, RosterLocation};
use crate::core::error::{BuilderError, Result};
use crate::roster::Roster;

pub use client::HttpRosterSource;
pub use file::FileRosterSource;

/// Somewhere rosters can be fetched from
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self, game: &str, army: &str) -> Result<Roster>;
}

/// Relative path of a roster, shared by all sources
pub fn roster_path(game: &str, army: &str) -> String {
    format!("games/{}/{}.json", game, army)
}

/// Build the source a config points at
pub fn source_from_config(config: &BuilderConfig) -> Result<Arc<dyn RosterSource>> {
    config.validate().map_err(BuilderError::InvalidConfig)?;

    match config.roster_location() {
        RosterLocation::Remote(url) => {
            let timeout = Duration::from_secs(config.request_timeout_secs);
            tracing::debug!("Using roster server {}", url);
            Ok(Arc::new(HttpRosterSource::new(url, timeout)?))
        }
        RosterLocation::Local(dir) => {
            tracing::debug!("Using roster directory {}", dir.display());
            Ok(Arc::new(FileRosterSource::new(dir)))
        }
    }
}
