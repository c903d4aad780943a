use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{GateError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Bumped whenever prompt or processing logic changes; part of every cache key.
    pub system_version: String,
    pub model_id: String,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
    /// Expired client windows are pruned once this many clients are tracked.
    pub max_tracked_clients: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            system_version: "v3.2".into(),
            model_id: "gpt-4o-mini".into(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 600, max_items: 500 }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 30, window_seconds: 60, max_tracked_clients: 10_000 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

impl GateConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.system_version.trim().is_empty() {
            return Err(GateError::InvalidConfig("system_version must not be empty".into()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(GateError::InvalidConfig("cache.ttl_seconds must be > 0".into()));
        }
        if self.cache.max_items == 0 {
            return Err(GateError::InvalidConfig("cache.max_items must be > 0".into()));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(GateError::InvalidConfig("rate_limit.max_requests must be > 0".into()));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(GateError::InvalidConfig("rate_limit.window_seconds must be > 0".into()));
        }
        if self.rate_limit.max_tracked_clients == 0 {
            return Err(GateError::InvalidConfig("rate_limit.max_tracked_clients must be > 0".into()));
        }
        Ok(())
    }
}
