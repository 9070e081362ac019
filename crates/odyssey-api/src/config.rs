//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use odyssey_session::domain::config::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_ROUNDS, GameConfig};
use odyssey_session::domain::schedule::PhaseSchedule;

use crate::error::AppError;

/// Where scenarios and questions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Two CSV exports fetched on every round.
    HttpCsv {
        /// Scenario export URL.
        scenarios_url: String,
        /// Question export URL.
        questions_url: String,
        /// Per-request timeout.
        timeout: Duration,
    },
    /// A YAML content pack loaded once at startup.
    YamlFile(PathBuf),
}

/// Full server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Content source.
    pub content: ContentSource,
    /// Engine policy.
    pub game: GameConfig,
    /// How often idle sessions are swept.
    pub sweep_interval: Duration,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is malformed or no content
    /// source is configured.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's
    /// value if set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is malformed or no content
    /// source is configured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_or(&lookup, "PORT", 3000)?;

        let content = match (lookup("SCENARIOS_URL"), lookup("QUESTIONS_URL"), lookup("CONTENT_FILE")) {
            (Some(scenarios_url), Some(questions_url), _) => ContentSource::HttpCsv {
                scenarios_url,
                questions_url,
                timeout: Duration::from_secs(parse_or(&lookup, "CONTENT_FETCH_TIMEOUT_SECS", 10)?),
            },
            (None, None, Some(path)) => ContentSource::YamlFile(PathBuf::from(path)),
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(AppError::Config(
                    "SCENARIOS_URL and QUESTIONS_URL must be set together".to_owned(),
                ));
            }
            (None, None, None) => {
                return Err(AppError::Config(
                    "set SCENARIOS_URL and QUESTIONS_URL, or CONTENT_FILE".to_owned(),
                ));
            }
        };

        let max_rounds = parse_or(&lookup, "MAX_ROUNDS", DEFAULT_MAX_ROUNDS)?;
        if max_rounds == 0 {
            return Err(AppError::Config("MAX_ROUNDS must be at least 1".to_owned()));
        }
        let schedule = parse_or(&lookup, "PHASE_SCHEDULE", PhaseSchedule::default())?;
        let idle_timeout = Duration::from_secs(parse_or(
            &lookup,
            "SESSION_IDLE_TIMEOUT_SECS",
            DEFAULT_IDLE_TIMEOUT.as_secs(),
        )?);
        let sweep_interval = Duration::from_secs(parse_or(&lookup, "SESSION_SWEEP_INTERVAL_SECS", 60)?);
        if sweep_interval.is_zero() {
            return Err(AppError::Config(
                "SESSION_SWEEP_INTERVAL_SECS must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            host,
            port,
            content,
            game: GameConfig {
                max_rounds,
                schedule,
                idle_timeout,
            },
            sweep_interval,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
    }
}
