//! HTTP roster source

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{roster_path, RosterSource};
use crate::core::error::{BuilderError, Result};
use crate::roster::Roster;

/// Fetches rosters from the data server
pub struct HttpRosterSource {
    client: Client,
    base_url: String,
}

impl HttpRosterSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BuilderError::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL a roster is served from
    pub fn roster_url(&self, game: &str, army: &str) -> String {
        format!("{}/{}", self.base_url, roster_path(game, army))
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    async fn fetch(&self, game: &str, army: &str) -> Result<Roster> {
        let url = self.roster_url(game, army);
        tracing::info!("Fetching roster {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BuilderError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BuilderError::Fetch(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        response
            .json::<Roster>()
            .await
            .map_err(|e| BuilderError::Fetch(format!("{}: {}", url, e)))
    }
}
