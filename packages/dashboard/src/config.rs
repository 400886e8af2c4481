//! Dashboard configuration.
//!
//! Defaults are embedded from `config/default.toml` at compile time. A
//! user file can override any subset of keys, and a few environment
//! variables override last:
//!
//! | Variable                | Key                |
//! |-------------------------|--------------------|
//! | `QUAKE_MAP_BACKEND_URL` | `backend.url`      |
//! | `BIND_ADDR`             | `server.bind_addr` |
//! | `PORT`                  | `server.port`      |

use std::path::{Path, PathBuf};
use std::time::Duration;

use quake_map_client::ClientOptions;
use quake_map_map::MapView;
use serde::{Deserialize, Serialize};

/// Built-in defaults.
const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Environment variable naming a user config file.
pub const CONFIG_PATH_ENV: &str = "QUAKE_MAP_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config is not valid TOML or has the wrong shape.
    #[error("Invalid config: {message}")]
    Toml {
        /// Parser message.
        message: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend origin serving `/get-earthquakes`.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures.
    pub max_retries: u32,
}

/// Initial map viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Latitude of the initial center.
    pub center_lat: f64,
    /// Longitude of the initial center.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

/// Alert popup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Whether the demo alert fires.
    pub demo: bool,
    /// Seconds before the demo alert fires.
    pub demo_delay_secs: u64,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Backend connection.
    pub backend: BackendConfig,
    /// Map viewport.
    pub map: MapConfig,
    /// Alert popup.
    pub alerts: AlertConfig,
    /// HTTP server.
    pub server: ServerConfig,
}

impl DashboardConfig {
    /// The built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the embedded defaults are malformed.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_tables(parse_table(DEFAULT_TOML)?, None)
    }

    /// Defaults overlaid with the TOML in `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if either document is malformed.
    pub fn from_toml_str(overrides: &str) -> Result<Self, ConfigError> {
        Self::from_tables(parse_table(DEFAULT_TOML)?, Some(parse_table(overrides)?))
    }

    /// Loads defaults, the optional user file, then environment overrides.
    ///
    /// When `path` is `None`, the file named by [`CONFIG_PATH_ENV`] is used
    /// if that variable is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(env_path);

        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_toml_str(&text)?
            }
            None => Self::defaults()?,
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `PORT` is not a port number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("QUAKE_MAP_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port,
            })?;
        }
        Ok(())
    }

    /// HTTP client settings for the backend.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.backend.url.clone(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
            max_retries: self.backend.max_retries,
        }
    }

    /// Initial map viewport.
    #[must_use]
    pub fn map_view(&self) -> MapView {
        MapView {
            center: (self.map.center_lat, self.map.center_lon),
            zoom: self.map.zoom,
            ..MapView::default()
        }
    }

    /// Delay before the demo alert, or `None` when the demo is disabled.
    #[must_use]
    pub const fn demo_alert_delay(&self) -> Option<Duration> {
        if self.alerts.demo {
            Some(Duration::from_secs(self.alerts.demo_delay_secs))
        } else {
            None
        }
    }

    fn from_tables(
        mut base: toml::Table,
        overrides: Option<toml::Table>,
    ) -> Result<Self, ConfigError> {
        if let Some(overrides) = overrides {
            merge(&mut base, overrides);
        }
        toml::Value::Table(base)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Toml {
                message: e.to_string(),
            })
    }
}

fn parse_table(text: &str) -> Result<toml::Table, ConfigError> {
    toml::from_str(text).map_err(|e: toml::de::Error| ConfigError::Toml {
        message: e.to_string(),
    })
}

/// Recursively overlays `overrides` onto `base`; nested tables merge,
/// everything else replaces.
fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = DashboardConfig::defaults().unwrap();
        assert_eq!(config.backend.url, "http://127.0.0.1:5000");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.demo_alert_delay(), Some(Duration::from_secs(5)));
        assert_eq!(config.map_view().center, (27.7172, 85.3240));
    }

    #[test]
    fn user_file_overrides_only_given_keys() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [backend]
            url = "https://quakes.example.org"

            [alerts]
            demo = false
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "https://quakes.example.org");
        assert_eq!(config.backend.max_retries, 2);
        assert_eq!(config.demo_alert_delay(), None);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = DashboardConfig::from_toml_str("[server]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn environment_overrides_apply_last() {
        let mut config = DashboardConfig::defaults().unwrap();
        config
            .apply_env(|key| match key {
                "QUAKE_MAP_BACKEND_URL" => Some("http://backend:5000".to_string()),
                "PORT" => Some("9090".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.backend.url, "http://backend:5000");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
    }

    #[test]
    fn invalid_port_is_reported() {
        let mut config = DashboardConfig::defaults().unwrap();
        let err = config
            .apply_env(|key| (key == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn client_options_follow_backend_section() {
        let config = DashboardConfig::defaults().unwrap();
        let options = config.client_options();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.max_retries, 2);
    }
}
