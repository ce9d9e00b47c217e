use std::{str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use dotenv::dotenv;

use crate::services::TokenService;

/// `DATABASE_URL` value selecting the in-process store instead of PostgreSQL
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub bind_address: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout: Duration,
    pub db_idle_timeout: Duration,
    pub jwt_secret: Option<String>,
    pub jwt_maxage_minutes: i64,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn init() -> Result<Config> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let db_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let config = Config {
            db_url: db_url.trim().to_string(),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 32)?,
            db_min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 4)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 2)?),
            db_idle_timeout: Duration::from_secs(parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", 30)?),
            jwt_secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            jwt_maxage_minutes: parse_or(&lookup, "JWT_MAXAGE_MINUTES", 60)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.db_url == MEMORY_DATABASE_URL
    }

    /// Token issuer keyed by `JWT_SECRET`, if one is configured
    pub fn token_service(&self) -> Option<TokenService> {
        let secret = self.jwt_secret.as_deref()?;
        Some(TokenService::new(
            secret,
            chrono::Duration::minutes(self.jwt_maxage_minutes),
        ))
    }

    fn validate(&self) -> Result<()> {
        if !self.uses_memory_store() {
            let lower = self.db_url.to_lowercase();
            if !(lower.starts_with("postgres://") || lower.starts_with("postgresql://")) {
                bail!("DATABASE_URL must start with postgres:// or postgresql://, or be `{MEMORY_DATABASE_URL}`");
            }
        }
        if self.db_min_connections > self.db_max_connections {
            bail!("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS");
        }
        if self.db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.jwt_maxage_minutes <= 0 {
            bail!("JWT_MAXAGE_MINUTES must be positive");
        }
        Ok(())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}
