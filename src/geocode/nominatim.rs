//! Forward geocoding against a Nominatim endpoint.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::GeocodeError;
use crate::config::Settings;
use crate::models::GeocodedAddress;

/// Queries shorter than this never reach the geocoder.
pub const MIN_QUERY_LEN: usize = 3;
/// Suggestions shown while typing.
pub const SUGGESTION_LIMIT: usize = 5;

const USER_AGENT: &str = "QuickAHJ/0.1 (permit jurisdiction lookup)";

/// Nominatim search client restricted to US results.
pub struct NominatimClient {
    client: Client,
    endpoint: Url,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl NominatimClient {
    pub fn new(endpoint: &str, timeout: Duration, retry_attempts: u32) -> Result<Self, GeocodeError> {
        let mut endpoint = Url::parse(endpoint)?;
        // `join` replaces the last path segment unless the base ends in '/'
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            retry_attempts: retry_attempts.max(1),
            retry_delay: Duration::from_millis(500),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GeocodeError> {
        Self::new(
            &settings.nominatim_url,
            Duration::from_secs(settings.request_timeout),
            settings.retry_attempts,
        )
    }

    /// Build the search URL for a query.
    pub fn search_url(&self, query: &str, limit: usize) -> Result<Url, GeocodeError> {
        let limit = limit.to_string();
        let base = self.endpoint.join("search")?;
        let url = Url::parse_with_params(
            base.as_str(),
            &[
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("q", query),
                ("countrycodes", "us"),
            ],
        )?;
        Ok(url)
    }

    /// Up to `limit` candidate addresses for a free-text query.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = self.search_url(query, limit)?;
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.fetch(&url).await {
                Ok(results) => {
                    debug!("Nominatim returned {} results for '{}'", results.len(), query);
                    return Ok(results);
                }
                Err(e) if attempts < self.retry_attempts => {
                    warn!(
                        "Nominatim request failed (attempt {}/{}): {}",
                        attempts, self.retry_attempts, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Address suggestions while typing. Short queries return nothing
    /// without touching the network.
    pub async fn suggest(&self, query: &str) -> Result<Vec<GeocodedAddress>, GeocodeError> {
        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        self.search(query, SUGGESTION_LIMIT).await
    }

    /// Best single match for a query.
    pub async fn geocode(&self, query: &str) -> Result<GeocodedAddress, GeocodeError> {
        let mut results = self.search(query, 1).await?;
        if results.is_empty() {
            info!("No geocoding match for '{}'", query);
            return Err(GeocodeError::NotFound(query.to_string()));
        }
        Ok(results.swap_remove(0))
    }
}
