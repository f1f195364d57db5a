//! Constants shared across HOLONET crates.
//!
//! Upstream defaults, cache keys and TTLs. All durations are expressed in
//! whole units so they can be fed straight into `Duration::from_*`.

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM (SWAPI)
// ═══════════════════════════════════════════════════════════════════════════════

/// Default SWAPI base URL, overridable with `SWAPI_BASE_URL`.
pub const DEFAULT_SWAPI_BASE_URL: &str = "https://swapi.tech/api";

/// Per-request timeout for upstream calls, in seconds.
pub const DEFAULT_SWAPI_TIMEOUT_SECS: u64 = 10;

/// Page size used when walking the full character listing.
/// SWAPI caps `limit` at 100.
pub const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// Delay between sequential page fetches of the full listing, in milliseconds.
pub const FETCH_ALL_PAGE_DELAY_MS: u64 = 100;

/// Image host template for character portraits. `{id}` is replaced by the uid.
pub const CHARACTER_IMAGE_URL_TEMPLATE: &str =
    "https://starwars-visualguide.com/assets/img/characters/{id}.jpg";

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Cache key of the full character listing.
pub const ALL_CHARACTERS_CACHE_KEY: &str = "all_characters";

/// TTL of the full character listing, in seconds (30 minutes).
pub const ALL_CHARACTERS_TTL_SECS: u64 = 30 * 60;

/// Default TTL for cache entries set without an explicit TTL (1 hour).
///
/// Character detail responses are cached with this TTL.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Interval of the background sweep that drops expired entries (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// TTL of cached list and search responses (30 minutes).
pub const LIST_RESPONSE_TTL_SECS: u64 = 30 * 60;

// ═══════════════════════════════════════════════════════════════════════════════
// PAGINATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Page served when none (or garbage) is requested.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size served when none (or garbage) is requested.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Hard ceiling on the page size.
pub const MAX_PAGE_LIMIT: u32 = 50;
