// 🔧 Configuration from environment variables
//
//   MYTHIC_DB_PATH    database file         (default: mythic.db)
//   MYTHIC_BIND_ADDR  API server address    (default: 0.0.0.0:3000)
//   MYTHIC_LOG        log filter directive  (default: info, RUST_LOG wins)

use anyhow::{anyhow, Result};
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub const DB_PATH_VAR: &str = "MYTHIC_DB_PATH";
pub const BIND_ADDR_VAR: &str = "MYTHIC_BIND_ADDR";
pub const LOG_VAR: &str = "MYTHIC_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_filter: String,
}

impl Config {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            db_path: try_load(&lookup, DB_PATH_VAR, "mythic.db")?,
            bind_addr: try_load(&lookup, BIND_ADDR_VAR, "0.0.0.0:3000")?,
            log_filter: try_load(&lookup, LOG_VAR, DEFAULT_LOG_FILTER)?,
        })
    }

    /// The log filter alone, read without logging so it can set up the subscriber
    /// before `load()` runs
    pub fn log_filter() -> String {
        Self::log_filter_from_lookup(|key| env::var(key).ok())
    }

    pub fn log_filter_from_lookup<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(LOG_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("Invalid {key} value '{raw}': {e}")
    })
}
