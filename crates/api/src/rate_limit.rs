//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Provides rate limiting based on peer IP addresses using tower_governor.
//! Uses the Generic Cell Rate Algorithm (GCRA), so no background refill
//! process is needed; only stale per-IP entries are pruned periodically.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tracing::debug;

use crate::error::ServerError;

/// Governor config keyed by peer IP, emitting X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
///
/// Keyed by peer IP. Behind a proxy or cloud ingress all clients share the
/// ingress address, so disable it there and limit at the ingress instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Seconds to replenish one request
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 10,
        }
    }
}

/// Create a rate limiting governor config
///
/// Uses PeerIpKeyExtractor, so the service must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<DefaultGovernorConfig>, ServerError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or_else(|| {
            ServerError::RateLimit(format!(
                "per_second={} burst_size={} (both must be non-zero)",
                config.per_second, config.burst_size
            ))
        })
}

/// Periodically drop limiter state for IPs that have gone quiet
pub fn spawn_cleanup(config: Arc<DefaultGovernorConfig>, interval: Duration) {
    let limiter = config.limiter().clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            debug!("Rate limiting storage size: {}", limiter.len());
            limiter.retain_recent();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 10);
    }

    #[test]
    fn test_create_governor_config() {
        let governor = create_governor_config(&RateLimitConfig::default()).unwrap();
        assert_eq!(Arc::strong_count(&governor), 1);
    }

    #[test]
    fn test_zero_burst_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            create_governor_config(&config),
            Err(ServerError::RateLimit(_))
        ));
    }
}
