use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

use crate::hours::OvernightPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub api_prefix: String,

    /// Photo, geolocation and status fields are accepted and persisted
    pub extended_fields: bool,
    pub overnight_policy: OvernightPolicy,
    pub request_timeout: Duration,

    // Pool
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,

    // Rate limiting, 0 = off
    pub rate_per_min: u32,

    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source, env style.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:7190".to_string()),
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            extended_fields: parsed(&lookup, "EXTENDED_FIELDS", true)?,
            overnight_policy: parsed(&lookup, "OVERNIGHT_POLICY", OvernightPolicy::Reject)?,
            request_timeout: Duration::from_secs(parsed(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),

            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(parsed(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),

            rate_per_min: parsed(&lookup, "RATE_PER_MIN", 0)?,

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
