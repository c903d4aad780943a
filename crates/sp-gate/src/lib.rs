//! Gate in front of the expensive suggestion call: per-client fixed-window
//! rate limiting, content-addressed keys and a TTL cache.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod key;
pub mod limiter;

pub use cache::{CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, GateConfig, RateLimitConfig};
pub use error::{GateError, Result};
pub use gateway::{GatewayResponse, SuggestionBackend, SuggestionGateway};
pub use key::{build_key, normalize_prompt, CacheKey};
pub use limiter::RateLimiter;
