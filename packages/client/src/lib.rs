#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Earthquake feed access.
//!
//! The dashboard reads earthquakes through the [`EarthquakeFeed`] trait.
//! [`EarthquakeClient`] implements it over HTTP against the backend's
//! `/get-earthquakes` endpoint; [`JsonFileFeed`] and [`StaticFeed`] serve
//! records from a local file or memory.

pub mod retry;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use quake_map_quake_models::{EarthquakeRecord, parse_records};

/// Path of the earthquake list endpoint.
pub const EARTHQUAKES_PATH: &str = "/get-earthquakes";

/// Errors that can occur while fetching earthquakes.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error! Status: {status}")]
    Status {
        /// Response status code.
        status: u16,
    },
}

/// A source of earthquake records.
#[async_trait]
pub trait EarthquakeFeed: Send + Sync {
    /// Human-readable description of where records come from.
    fn describe(&self) -> String;

    /// Fetches the current list of earthquakes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the records cannot be retrieved or
    /// decoded.
    async fn fetch_earthquakes(&self) -> Result<Vec<EarthquakeRecord>, ClientError>;
}

/// Connection settings for [`EarthquakeClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Backend origin, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries for transient failures.
    pub max_retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
        }
    }
}

/// Fetches earthquakes from the backend over HTTP.
pub struct EarthquakeClient {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
}

impl EarthquakeClient {
    /// Builds a client for `options.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            url: endpoint_url(&options.base_url),
            max_retries: options.max_retries,
        })
    }

    /// Full URL of the earthquake endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Joins `base_url` and [`EARTHQUAKES_PATH`] without doubling slashes.
#[must_use]
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{EARTHQUAKES_PATH}", base_url.trim_end_matches('/'))
}

#[async_trait]
impl EarthquakeFeed for EarthquakeClient {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_earthquakes(&self) -> Result<Vec<EarthquakeRecord>, ClientError> {
        log::info!("Fetching earthquakes from {}", self.url);
        let body = retry::send_json(|| self.client.get(&self.url), self.max_retries).await?;
        let records = parse_records(serde_json::from_value(body)?);
        log::info!("Fetched {} earthquakes", records.len());
        Ok(records)
    }
}

/// Reads earthquakes from a JSON file shaped like the endpoint response.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    /// Creates a feed reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EarthquakeFeed for JsonFileFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_earthquakes(&self) -> Result<Vec<EarthquakeRecord>, ClientError> {
        log::info!("Reading earthquakes from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_records(serde_json::from_str(&text)?))
    }
}

/// Serves a fixed list of earthquakes.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    records: Vec<EarthquakeRecord>,
}

impl StaticFeed {
    /// Creates a feed that always returns `records`.
    #[must_use]
    pub const fn new(records: Vec<EarthquakeRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl EarthquakeFeed for StaticFeed {
    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }

    async fn fetch_earthquakes(&self) -> Result<Vec<EarthquakeRecord>, ClientError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        assert_eq!(
            endpoint_url("http://localhost:5000/"),
            "http://localhost:5000/get-earthquakes"
        );
        assert_eq!(
            endpoint_url("http://localhost:5000"),
            "http://localhost:5000/get-earthquakes"
        );
    }

    #[test]
    fn client_uses_configured_endpoint() {
        let client = EarthquakeClient::new(&ClientOptions {
            base_url: "https://quakes.example.org".to_string(),
            ..ClientOptions::default()
        })
        .unwrap();
        assert_eq!(client.url(), "https://quakes.example.org/get-earthquakes");
    }

    #[tokio::test]
    async fn file_feed_skips_entries_that_are_not_records() {
        let path = std::env::temp_dir().join(format!(
            "quake_map_client_feed_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[null, {"latitude": 28.2, "longitude": 84.7, "epicenter": "Gorkha, Gandaki", "magnitude": 7.8, "date_ad": "2015-04-25"}]"#,
        )
        .unwrap();

        let records = JsonFileFeed::new(&path).fetch_earthquakes().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region(), Some("Gorkha"));
    }

    #[tokio::test]
    async fn file_feed_reports_missing_file() {
        let err = JsonFileFeed::new("/nonexistent/quakes.json")
            .fetch_earthquakes()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[tokio::test]
    async fn static_feed_returns_its_records() {
        let feed = StaticFeed::new(vec![EarthquakeRecord::new(
            27.7, 85.3, "Kathmandu", 4.0, "2025-01-01",
        )]);
        assert_eq!(feed.fetch_earthquakes().await.unwrap().len(), 1);
    }
}
