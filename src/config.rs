//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use crate::services::aggregator::{DailySleepRule, DEFAULT_STREAK_LOOKBACK};
use std::env;

const DEFAULT_HISTORY_DAYS: u32 = 30;
/// Upper bound for any history window, in days.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted record backend (PostgREST-style)
    pub backend_url: String,
    /// API key sent with every backend request
    pub backend_api_key: String,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Default history window for summaries
    pub history_days: u32,
    /// Most-recent records considered for a streak
    pub streak_lookback: u32,
    /// How same-day sleep entries combine in daily buckets
    pub daily_sleep_rule: DailySleepRule,
}

impl Config {
    /// Offline defaults for tests.
    pub fn test_default() -> Self {
        Self {
            backend_url: "http://localhost:54321".to_string(),
            backend_api_key: "test_api_key".to_string(),
            frontend_url: "http://localhost:8081".to_string(),
            port: 8080,
            history_days: DEFAULT_HISTORY_DAYS,
            streak_lookback: DEFAULT_STREAK_LOOKBACK,
            daily_sleep_rule: DailySleepRule::LastWrite,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let history_days = parse_u32("HISTORY_DAYS", DEFAULT_HISTORY_DAYS)?;
        if history_days == 0 || history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::Invalid(
                "HISTORY_DAYS",
                format!("must be between 1 and {}", MAX_HISTORY_DAYS),
            ));
        }

        Ok(Self {
            backend_url: env::var("BACKEND_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("BACKEND_URL"))?,
            backend_api_key: env::var("BACKEND_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BACKEND_API_KEY"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            history_days,
            streak_lookback: check_streak_lookback(parse_u32(
                "STREAK_LOOKBACK",
                DEFAULT_STREAK_LOOKBACK,
            )?)?,
            daily_sleep_rule: parse_sleep_rule(env::var("DAILY_SLEEP_RULE").ok().as_deref())?,
        })
    }
}

fn parse_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid(name, format!("{}", e))),
        Err(_) => Ok(default),
    }
}

/// A zero lookback would make every streak 0.
fn check_streak_lookback(lookback: u32) -> Result<u32, ConfigError> {
    if lookback == 0 {
        return Err(ConfigError::Invalid(
            "STREAK_LOOKBACK",
            "must be at least 1".to_string(),
        ));
    }
    Ok(lookback)
}

fn parse_sleep_rule(raw: Option<&str>) -> Result<DailySleepRule, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") | Some("last") => Ok(DailySleepRule::LastWrite),
        Some("average") => Ok(DailySleepRule::Average),
        Some(other) => Err(ConfigError::Invalid(
            "DAILY_SLEEP_RULE",
            format!("expected 'last' or 'average', got '{}'", other),
        )),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("BACKEND_URL", "https://example.supabase.co/");
        env::set_var("BACKEND_API_KEY", " anon-key ");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.backend_url, "https://example.supabase.co");
        assert_eq!(config.backend_api_key, "anon-key");
        assert_eq!(config.port, 8080);
        assert_eq!(config.history_days, 30);
        assert_eq!(config.streak_lookback, 30);
        assert_eq!(config.daily_sleep_rule, DailySleepRule::LastWrite);
    }

    #[test]
    fn test_streak_lookback_must_be_positive() {
        assert!(matches!(
            check_streak_lookback(0),
            Err(ConfigError::Invalid("STREAK_LOOKBACK", _))
        ));
        assert_eq!(check_streak_lookback(1).unwrap(), 1);
        assert_eq!(check_streak_lookback(90).unwrap(), 90);
    }

    #[test]
    fn test_parse_sleep_rule() {
        assert_eq!(parse_sleep_rule(None).unwrap(), DailySleepRule::LastWrite);
        assert_eq!(
            parse_sleep_rule(Some("average")).unwrap(),
            DailySleepRule::Average
        );
        assert!(matches!(
            parse_sleep_rule(Some("median")),
            Err(ConfigError::Invalid("DAILY_SLEEP_RULE", _))
        ));
    }
}
