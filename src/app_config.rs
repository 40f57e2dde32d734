use crate::domain::{Coordinate, MapStyle};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    storage: Storage,
    auth: Auth,
    nearby: Nearby,
    map: Map,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn nearby(&self) -> &Nearby {
        &self.nearby
    }

    pub fn map(&self) -> &Map {
        &self.map
    }
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    reason: String,
}

impl Auth {
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Debug, Deserialize)]
pub struct Nearby {
    url: String,
    #[serde(with = "humantime_serde")]
    timeout: Duration,
    retry_ms: u64,
    max_retries: usize,
    radius_m: u32,
    limit: u32,
}

impl Nearby {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

#[derive(Debug, Deserialize)]
pub struct Map {
    #[serde(default)]
    style: MapStyle,
    start_position: Coordinate,
    span_degrees: f64,
}

impl Map {
    pub fn style(&self) -> MapStyle {
        self.style
    }

    pub fn start_position(&self) -> Coordinate {
        self.start_position
    }

    pub fn span_degrees(&self) -> f64 {
        self.span_degrees
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                storage: Storage {
                    path: PathBuf::from("SavedPlaces.json"),
                },
                auth: Auth {
                    reason: "Please authenticate yourself to unlock your places.".to_string(),
                },
                nearby: Nearby {
                    url: "https://en.wikipedia.org/w/api.php".to_string(),
                    timeout: Duration::from_secs(5),
                    retry_ms: 10,
                    max_retries: 0,
                    radius_m: 10_000,
                    limit: 50,
                },
                map: Map {
                    style: MapStyle::Standard,
                    start_position: Coordinate::new(56.0, -3.0),
                    span_degrees: 10.0,
                },
            },
        }
    }

    pub fn nearby_url(mut self, url: String) -> Self {
        self.config.nearby.url = url;
        self
    }

    pub fn nearby_max_retries(mut self, max_retries: usize) -> Self {
        self.config.nearby.max_retries = max_retries;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
