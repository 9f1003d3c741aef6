//! Local directory roster source

use async_trait::async_trait;
use std::path::PathBuf;

use super::{roster_path, RosterSource};
use crate::core::error::Result;
use crate::roster::Roster;

/// Reads rosters from a directory mirroring the data server layout
pub struct FileRosterSource {
    root: PathBuf,
}

impl FileRosterSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path_for(&self, game: &str, army: &str) -> PathBuf {
        self.root.join(roster_path(game, army))
    }
}

#[async_trait]
impl RosterSource for FileRosterSource {
    async fn fetch(&self, game: &str, army: &str) -> Result<Roster> {
        let path = self.path_for(game, army);
        tracing::debug!("Reading roster {}", path.display());
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
