//! Sync configuration and its environment loader.

use core::str::FromStr;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DomainError};
use crate::priority::SyncPriority;

/// Policy used to pick an authoritative record when local and remote diverge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictStrategy {
    LastWriteWins,
    Manual,
    PriorityBased,
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStrategy::LastWriteWins => "LAST_WRITE_WINS",
            ConflictStrategy::Manual => "MANUAL",
            ConflictStrategy::PriorityBased => "PRIORITY_BASED",
        }
    }
}

impl core::fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LAST_WRITE_WINS" => Ok(ConflictStrategy::LastWriteWins),
            "MANUAL" => Ok(ConflictStrategy::Manual),
            "PRIORITY_BASED" => Ok(ConflictStrategy::PriorityBased),
            _ => Err(DomainError::unknown("conflict resolution strategy", s)),
        }
    }
}

/// Engine-wide sync settings, fixed for the duration of a sync cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfiguration {
    pub auto_resolve_conflicts: bool,
    /// 1–10.
    pub max_retry_attempts: u32,
    /// 1 000–300 000.
    pub timeout_ms: u64,
    /// 1–100.
    pub batch_size: usize,
    pub conflict_resolution: ConflictStrategy,
    pub enable_cross_warehouse_sync: bool,
    /// At least 60 000.
    pub sync_interval: u64,
    /// Per-product priority floor, keyed by product id.
    pub priority_overrides: HashMap<String, SyncPriority>,
    /// Dispatch concurrency hint for the orchestrator; unused by the engine.
    pub max_concurrent_sync: usize,
}

impl Default for SyncConfiguration {
    fn default() -> Self {
        Self {
            auto_resolve_conflicts: true,
            max_retry_attempts: 3,
            timeout_ms: 30_000,
            batch_size: 50,
            conflict_resolution: ConflictStrategy::PriorityBased,
            enable_cross_warehouse_sync: true,
            sync_interval: 300_000,
            priority_overrides: HashMap::new(),
            max_concurrent_sync: 4,
        }
    }
}

const ENV_PREFIX: &str = "STOCKSYNC_";

impl SyncConfiguration {
    /// Load from `STOCKSYNC_*` environment variables, defaulting unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source (keys include the `STOCKSYNC_` prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        let config = Self {
            auto_resolve_conflicts: parse_var(
                "AUTO_RESOLVE_CONFLICTS",
                read("AUTO_RESOLVE_CONFLICTS"),
                defaults.auto_resolve_conflicts,
            )?,
            max_retry_attempts: parse_var(
                "MAX_RETRY_ATTEMPTS",
                read("MAX_RETRY_ATTEMPTS"),
                defaults.max_retry_attempts,
            )?,
            timeout_ms: parse_var("TIMEOUT_MS", read("TIMEOUT_MS"), defaults.timeout_ms)?,
            batch_size: parse_var("BATCH_SIZE", read("BATCH_SIZE"), defaults.batch_size)?,
            conflict_resolution: parse_var(
                "CONFLICT_RESOLUTION",
                read("CONFLICT_RESOLUTION"),
                defaults.conflict_resolution,
            )?,
            enable_cross_warehouse_sync: parse_var(
                "ENABLE_CROSS_WAREHOUSE_SYNC",
                read("ENABLE_CROSS_WAREHOUSE_SYNC"),
                defaults.enable_cross_warehouse_sync,
            )?,
            sync_interval: parse_var(
                "SYNC_INTERVAL_MS",
                read("SYNC_INTERVAL_MS"),
                defaults.sync_interval,
            )?,
            priority_overrides: HashMap::new(),
            max_concurrent_sync: parse_var(
                "MAX_CONCURRENT_SYNC",
                read("MAX_CONCURRENT_SYNC"),
                defaults.max_concurrent_sync,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every range constraint, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if !(1..=10).contains(&self.max_retry_attempts) {
            problems.push(format!(
                "maxRetryAttempts must be between 1 and 10 (got {})",
                self.max_retry_attempts
            ));
        }
        if !(1_000..=300_000).contains(&self.timeout_ms) {
            problems.push(format!(
                "timeoutMs must be between 1000 and 300000 (got {})",
                self.timeout_ms
            ));
        }
        if !(1..=100).contains(&self.batch_size) {
            problems.push(format!(
                "batchSize must be between 1 and 100 (got {})",
                self.batch_size
            ));
        }
        if self.sync_interval < 60_000 {
            problems.push(format!(
                "syncInterval must be at least 60000 (got {})",
                self.sync_interval
            ));
        }
        if self.max_concurrent_sync == 0 {
            problems.push("maxConcurrentSync must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Priority floor configured for a product, if any.
    pub fn priority_override(&self, product_id: &str) -> Option<SyncPriority> {
        self.priority_overrides.get(product_id).copied()
    }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
            key: format!("{ENV_PREFIX}{name}"),
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}
