// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity whose visible schemas are resolved by the binary
    pub user: String,
    /// Lifetime of cached per-subject schema sets
    pub schema_cache_ttl: Duration,
    /// Server-side timeout requested for watch sessions
    pub watch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let user = env::var("OUTPOST_USER").unwrap_or_else(|_| defaults::USER.to_string());
        let schema_cache_ttl = secs_from_env(
            "OUTPOST_SCHEMA_CACHE_TTL_SECS",
            defaults::SCHEMA_CACHE_TTL_SECS,
        )?;
        let watch_timeout =
            secs_from_env("OUTPOST_WATCH_TIMEOUT_SECS", defaults::WATCH_TIMEOUT_SECS)?;

        Ok(Config {
            user,
            schema_cache_ttl,
            watch_timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user: defaults::USER.to_string(),
            schema_cache_ttl: Duration::from_secs(defaults::SCHEMA_CACHE_TTL_SECS),
            watch_timeout: Duration::from_secs(defaults::WATCH_TIMEOUT_SECS),
        }
    }
}

fn secs_from_env(name: &str, default: u64) -> Result<Duration> {
    match env::var(name) {
        Ok(value) => parse_secs(&value)
            .with_context(|| format!("{} is not a valid number of seconds", name)),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_secs(value: &str) -> Result<Duration> {
    let secs: u64 = value.trim().parse()?;
    Ok(Duration::from_secs(secs))
}
