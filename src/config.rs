use std::time::Duration;

use rand::Rng;

/// Connection details for one remote resource service.
#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    pub host: String,
    pub version: String,
    pub token: String,
}

/// Inclusive bounds for the jittered pause between poll cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRange {
    min: u64,
    max: u64,
}

impl SleepRange {
    pub fn new(min: u64, max: u64) -> Result<Self, config::ConfigError> {
        if min > max {
            return Err(config::ConfigError::Message(format!(
                "SLEEP_SECONDS_MIN ({}) must not exceed SLEEP_SECONDS_MAX ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Draws a pause uniformly from the inclusive range.
    pub fn draw(&self) -> Duration {
        Duration::from_secs(rand::rng().random_range(self.min..=self.max))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub contracting: ApiEndpoint,
    pub lots: ApiEndpoint,
    pub sleep_range: SleepRange,
    pub batch_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            contracting: ApiEndpoint {
                host: required("CONTRACTING_API_HOST")?,
                version: std::env::var("CONTRACTING_API_VERSION")
                    .unwrap_or_else(|_| "2.5".to_string()),
                token: required("CONTRACTING_API_TOKEN")?,
            },
            lots: ApiEndpoint {
                host: required("LOTS_API_HOST")?,
                version: std::env::var("LOTS_API_VERSION").unwrap_or_else(|_| "2.5".to_string()),
                token: required("LOTS_API_TOKEN")?,
            },
            sleep_range: SleepRange::new(
                parsed("SLEEP_SECONDS_MIN", 1)?,
                parsed("SLEEP_SECONDS_MAX", 10)?,
            )?,
            batch_limit: parsed("WATCHER_BATCH_LIMIT", 100)?,
        })
    }
}

fn required(name: &str) -> Result<String, config::ConfigError> {
    std::env::var(name).map_err(|_| config::ConfigError::NotFound(name.to_string()))
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, config::ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            config::ConfigError::Message(format!("{} is not a valid number: {}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
