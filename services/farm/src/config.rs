use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use farm_balance::BarnCapacity;

use crate::db::DbConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub barn_capacity: BarnCapacity,
    pub log_level: String,
    pub dev_mode: bool,
    pub audit_interval: Duration,
    pub database: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let barn_capacity = match lookup("FARM_BARN_CAPACITY") {
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .with_context(|| format!("FARM_BARN_CAPACITY is not a number: {raw}"))?;
                BarnCapacity::new(n).ok_or_else(|| anyhow!("FARM_BARN_CAPACITY must be positive"))?
            }
            None => BarnCapacity::default(),
        };

        let log_level = lookup("FARM_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let dev_mode = lookup("FARM_DEV")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let audit_interval = match lookup("FARM_AUDIT_INTERVAL_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("FARM_AUDIT_INTERVAL_SECS is not a number: {raw}"))?,
            ),
            None => Duration::from_secs(30),
        };
        if audit_interval.is_zero() {
            return Err(anyhow!("FARM_AUDIT_INTERVAL_SECS must be positive"));
        }

        let database = DbConfig::from_lookup(&lookup);

        Ok(Self {
            barn_capacity,
            log_level,
            dev_mode,
            audit_interval,
            database,
        })
    }
}
