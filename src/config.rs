use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://notes.db";
/// Only meant for local development; a warning is logged when it is used.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7 * 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub port: u16,
    pub session_ttl_hours: i64,
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let secret_key = match lookup("SECRET_KEY").filter(|v| !v.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("SECRET_KEY is not set, falling back to the insecure development key");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(value) => match value.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_HOURS",
                        value,
                    })
                }
            },
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Config {
            database_url,
            secret_key,
            port,
            session_ttl_hours,
        })
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
