//! Rate-limited, cached access to an expensive suggestion backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheStats, TtlCache};
use crate::clock::{Clock, SystemClock};
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::key::{build_key, normalize_prompt, CacheKey};
use crate::limiter::RateLimiter;

/// The expensive collaborator behind the gate, typically an LLM call.
pub trait SuggestionBackend: Send + Sync {
    fn suggest(&self, prompt: &str) -> anyhow::Result<Value>;
}

impl<B: SuggestionBackend + ?Sized> SuggestionBackend for Arc<B> {
    fn suggest(&self, prompt: &str) -> anyhow::Result<Value> {
        (**self).suggest(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub value: Value,
    /// True when served from the cache without calling the backend.
    pub cached: bool,
    pub key: CacheKey,
}

pub struct SuggestionGateway<B> {
    config: GateConfig,
    cache: TtlCache<Value>,
    limiter: RateLimiter,
    backend: B,
}

impl<B: SuggestionBackend> SuggestionGateway<B> {
    pub fn new(config: GateConfig, backend: B) -> Result<Self> {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    /// Cache and limiter share `clock`.
    pub fn with_clock(config: GateConfig, backend: B, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let cache = TtlCache::with_clock(config.cache.ttl(), config.cache.max_items, clock.clone());
        let limiter = RateLimiter::with_clock(
            config.rate_limit.max_requests,
            config.rate_limit.window(),
            clock,
        );
        Ok(Self { config, cache, limiter, backend })
    }

    /// The limiter is consulted before the cache, so cache hits still
    /// count against the client's quota.
    pub fn suggest(&self, client_id: &str, prompt: &str) -> Result<GatewayResponse> {
        let prompt = normalize_prompt(prompt);
        if prompt.is_empty() {
            return Err(GateError::EmptyPrompt);
        }

        if self.limiter.tracked_clients() >= self.config.rate_limit.max_tracked_clients {
            let removed = self.limiter.prune();
            debug!(removed, "pruned expired rate-limit windows");
        }

        if !self.limiter.allow(client_id) {
            return Err(GateError::RateLimited { client_id: client_id.to_string() });
        }

        let key = build_key(&self.config.system_version, &self.config.model_id, client_id, &prompt);
        if let Some(value) = self.cache.get(key.as_str()) {
            debug!(%key, client_id, "suggestion cache hit");
            return Ok(GatewayResponse { value, cached: true, key });
        }

        debug!(%key, client_id, "suggestion cache miss");
        let value = self.backend.suggest(&prompt).map_err(|e| {
            warn!(client_id, error = %e, "suggestion backend failed");
            GateError::Backend(e)
        })?;

        self.cache.set(key.as_str(), value.clone());
        Ok(GatewayResponse { value, cached: false, key })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn cache(&self) -> &TtlCache<Value> {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
