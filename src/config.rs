// config.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    // Dispute workflow
    pub dispute_response_hours: i64,
    // Notification outbox
    pub outbox_max_attempts: u32,
    pub outbox_retry_backoff_ms: u64,
    pub outbox_flush_interval_secs: u64,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup; `init` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]);

        Ok(Config {
            database_url,
            jwt_secret,
            port: parse_or(&lookup, "PORT", 8000)?,
            cors_origins,
            dispute_response_hours: parse_or(&lookup, "DISPUTE_RESPONSE_HOURS", 24)?,
            outbox_max_attempts: parse_or(&lookup, "OUTBOX_MAX_ATTEMPTS", 3)?,
            outbox_retry_backoff_ms: parse_or(&lookup, "OUTBOX_RETRY_BACKOFF_MS", 250)?,
            outbox_flush_interval_secs: parse_or(&lookup, "OUTBOX_FLUSH_INTERVAL_SECS", 30)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
