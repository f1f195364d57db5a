//! App state: upstream client, caches, config.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::info;

use holonet_cache::{CacheConfig, TtlCache};
use holonet_core::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_SWAPI_BASE_URL, DEFAULT_SWAPI_TIMEOUT_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS,
};
use holonet_core::error::Result;
use holonet_core::traits::Upstream;
use holonet_swapi::{CharacterAssembler, ListingCache, SwapiClient, SwapiConfig};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// SWAPI base URL
    pub swapi_base_url: String,
    /// Per-request upstream timeout, in seconds
    pub swapi_timeout_seconds: u64,
    /// Default cache TTL, in seconds
    pub cache_ttl_seconds: u64,
    /// Interval of the cache sweep, in seconds
    pub cache_sweep_interval_seconds: u64,
    /// Whether GET responses are cached
    pub enable_response_cache: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            swapi_base_url: DEFAULT_SWAPI_BASE_URL.into(),
            swapi_timeout_seconds: DEFAULT_SWAPI_TIMEOUT_SECS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            cache_sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECS,
            enable_response_cache: true,
        }
    }
}

impl ApiConfig {
    /// Reads the configuration from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            swapi_base_url: std::env::var("SWAPI_BASE_URL").unwrap_or(defaults.swapi_base_url),
            swapi_timeout_seconds: env_u64("SWAPI_TIMEOUT_SECS")
                .unwrap_or(defaults.swapi_timeout_seconds),
            cache_ttl_seconds: env_u64("CACHE_DEFAULT_TTL_SECS")
                .unwrap_or(defaults.cache_ttl_seconds),
            cache_sweep_interval_seconds: env_u64("CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.cache_sweep_interval_seconds),
            enable_response_cache: std::env::var("ENABLE_RESPONSE_CACHE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Overrides the SWAPI base URL.
    pub fn with_swapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.swapi_base_url = url.into();
        self
    }

    /// Disables response caching.
    pub fn no_response_cache(mut self) -> Self {
        self.enable_response_cache = false;
        self
    }

    fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_secs(self.cache_ttl_seconds),
            sweep_interval: Duration::from_secs(self.cache_sweep_interval_seconds.max(1)),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Shared state of every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Character data source
    pub upstream: Arc<dyn Upstream>,
    /// Resolves the references of a character record
    pub assembler: CharacterAssembler,
    /// Serialized success envelopes keyed by request path and query
    pub response_cache: TtlCache<Bytes>,
    /// Present when the state owns the SWAPI client's listing cache
    pub listing_cache: Option<Arc<ListingCache>>,
    /// When the state was built
    pub started_at: Instant,
}

impl AppState {
    /// Builds the state around a live SWAPI client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let listing_cache = Arc::new(ListingCache::with_config(config.cache_config()));
        let swapi_config = SwapiConfig::new(config.swapi_base_url.clone())
            .with_timeout(config.swapi_timeout_seconds);
        let client = SwapiClient::with_listing_cache(swapi_config, listing_cache.clone())?;

        let mut state = Self::with_upstream(config, Arc::new(client));
        state.listing_cache = Some(listing_cache);
        Ok(state)
    }

    /// Builds the state around any [`Upstream`].
    pub fn with_upstream(config: ApiConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            response_cache: TtlCache::with_config(config.cache_config()),
            assembler: CharacterAssembler::new(upstream.clone()),
            upstream,
            listing_cache: None,
            config,
            started_at: Instant::now(),
        }
    }

    /// Starts the cache sweep tasks. Must run inside a Tokio runtime.
    pub fn start_background_tasks(&self) {
        self.response_cache.start_sweeper();
        if let Some(cache) = &self.listing_cache {
            cache.start_sweeper();
        }
        info!(
            interval_secs = self.config.cache_sweep_interval_seconds,
            "Cache sweepers started"
        );
    }

    /// Stops the sweep tasks and drops every cached entry.
    pub fn shutdown(&self) {
        self.response_cache.shutdown();
        if let Some(cache) = &self.listing_cache {
            cache.shutdown();
        }
        info!("Caches shut down");
    }
}
