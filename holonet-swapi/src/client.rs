//! SWAPI client implementation.
//!
//! Every detail endpoint answers `{ message, result: { properties, uid } }`;
//! the listing answers `{ total_records, total_pages, next, results }`.
//! Any non-2xx or transport failure becomes one [`HolonetError::Upstream`]
//! carrying the status code when there was one. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use holonet_cache::TtlCache;
use holonet_core::constants::{
    ALL_CHARACTERS_CACHE_KEY, ALL_CHARACTERS_TTL_SECS, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_SWAPI_BASE_URL, DEFAULT_SWAPI_TIMEOUT_SECS, FETCH_ALL_PAGE_DELAY_MS,
    FETCH_ALL_PAGE_SIZE,
};
use holonet_core::error::{HolonetError, Result};
use holonet_core::traits::Upstream;
use holonet_core::types::{
    CharacterPage, CharacterRecord, CharacterRef, DetailEnvelope, FilmRecord, ListEnvelope,
    PlanetRecord, SpeciesRecord, StarshipRecord, SwapiRecord, VehicleRecord,
};

/// Cache holding the full character listing.
pub type ListingCache = TtlCache<Arc<Vec<CharacterRef>>>;

/// SWAPI client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SwapiConfig {
    /// Base URL, e.g. "https://swapi.tech/api"
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Delay between pages when walking the full listing, in milliseconds
    pub page_delay_ms: u64,
    /// Page size used when walking the full listing
    pub fetch_page_size: u32,
    /// How long the full listing stays cached, in seconds
    pub listing_ttl_seconds: u64,
}

impl Default for SwapiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SWAPI_BASE_URL.into(),
            timeout_seconds: DEFAULT_SWAPI_TIMEOUT_SECS,
            page_delay_ms: FETCH_ALL_PAGE_DELAY_MS,
            fetch_page_size: FETCH_ALL_PAGE_SIZE,
            listing_ttl_seconds: ALL_CHARACTERS_TTL_SECS,
        }
    }
}

impl SwapiConfig {
    /// Creates config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the delay between listing pages. Zero disables it.
    pub fn with_page_delay(mut self, millis: u64) -> Self {
        self.page_delay_ms = millis;
        self
    }

    /// Sets the page size used when walking the full listing.
    pub fn with_fetch_page_size(mut self, size: u32) -> Self {
        self.fetch_page_size = size.max(1);
        self
    }
}

/// HTTP client for the Star Wars API.
pub struct SwapiClient {
    config: SwapiConfig,
    base_url: String,
    http_client: reqwest::Client,
    listing_cache: Arc<ListingCache>,
}

impl SwapiClient {
    /// Creates a client with its own listing cache.
    pub fn with_config(config: SwapiConfig) -> Result<Self> {
        let cache = Arc::new(ListingCache::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)));
        Self::with_listing_cache(config, cache)
    }

    /// Creates a client storing the full listing in `cache`.
    pub fn with_listing_cache(config: SwapiConfig, cache: Arc<ListingCache>) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url)
            .map_err(|e| HolonetError::Config(format!("Invalid SWAPI base URL '{}': {}", config.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HolonetError::Config(format!(
                "SWAPI base URL must be http(s), got '{}'",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| HolonetError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            http_client,
            listing_cache: cache,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SwapiConfig {
        &self.config
    }

    /// Returns the cache holding the full listing.
    pub fn listing_cache(&self) -> &Arc<ListingCache> {
        &self.listing_cache
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "SWAPI request");

        let response = self
            .http_client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "SWAPI request failed");
                if e.is_connect() || e.is_timeout() {
                    HolonetError::no_response()
                } else {
                    HolonetError::upstream(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "SWAPI error response");
            return Err(HolonetError::upstream_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        debug!(url = %url, status = status.as_u16(), "SWAPI response");
        response
            .json::<T>()
            .await
            .map_err(|e| HolonetError::Decode(format!("{}: {}", url, e)))
    }

    async fn get_detail<T>(&self, resource: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned + SwapiRecord,
    {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HolonetError::Validation(format!(
                "Invalid {} ID format: '{}'",
                resource, id
            )));
        }

        let envelope: DetailEnvelope<T> = self.get_json(&format!("/{}/{}", resource, id)).await?;
        Ok(envelope.into_record())
    }
}

#[async_trait]
impl Upstream for SwapiClient {
    #[instrument(skip(self))]
    async fn get_character(&self, id: &str) -> Result<CharacterRecord> {
        self.get_detail("people", id).await
    }

    #[instrument(skip(self))]
    async fn get_planet(&self, id: &str) -> Result<PlanetRecord> {
        self.get_detail("planets", id).await
    }

    #[instrument(skip(self))]
    async fn get_film(&self, id: &str) -> Result<FilmRecord> {
        self.get_detail("films", id).await
    }

    #[instrument(skip(self))]
    async fn get_species(&self, id: &str) -> Result<SpeciesRecord> {
        self.get_detail("species", id).await
    }

    #[instrument(skip(self))]
    async fn get_vehicle(&self, id: &str) -> Result<VehicleRecord> {
        self.get_detail("vehicles", id).await
    }

    #[instrument(skip(self))]
    async fn get_starship(&self, id: &str) -> Result<StarshipRecord> {
        self.get_detail("starships", id).await
    }

    #[instrument(skip(self))]
    async fn get_page(&self, page: u32, page_size: u32) -> Result<CharacterPage> {
        let envelope: ListEnvelope<CharacterRef> = self
            .get_json(&format!("/people?page={}&limit={}", page, page_size))
            .await?;

        Ok(CharacterPage {
            has_next: envelope.next.is_some(),
            total_records: envelope.total_records,
            total_pages: envelope.total_pages,
            results: envelope.results,
        })
    }

    /// Walks every page sequentially, following `next` until it runs out or
    /// the reported `total_pages` is reached.
    ///
    /// Any failing page fails the whole call; a partial listing is never
    /// cached.
    #[instrument(skip(self))]
    async fn get_all_characters(&self) -> Result<Arc<Vec<CharacterRef>>> {
        if let Some(cached) = self.listing_cache.get(ALL_CHARACTERS_CACHE_KEY) {
            debug!(count = cached.len(), "Using cached character listing");
            return Ok(cached);
        }

        info!("Fetching full character listing");

        let delay = Duration::from_millis(self.config.page_delay_ms);
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let fetched = self.get_page(page, self.config.fetch_page_size).await?;
            debug!(page, count = fetched.results.len(), "Fetched listing page");
            all.extend(fetched.results);

            // `total_pages` bounds the walk even if `next` never runs out.
            let last_page = fetched.total_pages > 0 && u64::from(page) >= fetched.total_pages;
            if !fetched.has_next || last_page {
                if fetched.has_next {
                    warn!(
                        page,
                        total_pages = fetched.total_pages,
                        "Listing reports a next page past the last one"
                    );
                }
                break;
            }
            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let all = Arc::new(all);
        self.listing_cache.set_with_ttl(
            ALL_CHARACTERS_CACHE_KEY,
            all.clone(),
            Duration::from_secs(self.config.listing_ttl_seconds),
        );

        info!(total = all.len(), pages = page, "Fetched full character listing");
        Ok(all)
    }

    fn clear_listing_cache(&self) -> bool {
        self.listing_cache.delete(ALL_CHARACTERS_CACHE_KEY)
    }
}

/// Extracts the trailing numeric id from a cross-reference URL.
///
/// Accepts `…/<digits>` and `…/<digits>/`. Returns `None` when there is no
/// such segment; callers treat that reference as unresolvable.
pub fn extract_id_from_url(url: &str) -> Option<&str> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let (_, last) = trimmed.rsplit_once('/')?;

    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
        Some(last)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SwapiClient {
        SwapiClient::with_config(SwapiConfig::new(server.uri()).with_page_delay(0)).unwrap()
    }

    fn listing_page(uids: &[&str], next: Option<&str>, total: u64, pages: u64) -> serde_json::Value {
        json!({
            "message": "ok",
            "total_records": total,
            "total_pages": pages,
            "previous": null,
            "next": next,
            "results": uids.iter().map(|uid| json!({
                "uid": uid,
                "name": format!("Character {}", uid),
                "url": format!("https://swapi.tech/api/people/{}", uid),
            })).collect::<Vec<_>>(),
        })
    }

    #[test_case("https://swapi.tech/api/people/1/" => Some("1") ; "trailing slash")]
    #[test_case("https://swapi.tech/api/people/42" => Some("42") ; "no trailing slash")]
    #[test_case("https://swapi.tech/api/planets/" => None ; "no id")]
    #[test_case("invalid-url" => None ; "garbage")]
    #[test_case("https://swapi.tech/api/people/1a" => None ; "not numeric")]
    #[test_case("" => None ; "empty")]
    fn test_extract_id_from_url(url: &str) -> Option<&str> {
        extract_id_from_url(url)
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            SwapiClient::with_config(SwapiConfig::new("not a url")),
            Err(HolonetError::Config(_))
        ));
        assert!(matches!(
            SwapiClient::with_config(SwapiConfig::new("ftp://swapi.tech/api")),
            Err(HolonetError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_get_character_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok",
                "result": {
                    "properties": {
                        "name": "Luke Skywalker",
                        "height": "172",
                        "homeworld": "https://swapi.tech/api/planets/1",
                        "films": ["https://swapi.tech/api/films/1"]
                    },
                    "uid": "1",
                    "description": "A person within the Star Wars universe"
                }
            })))
            .mount(&server)
            .await;

        let character = client_for(&server).get_character("1").await.unwrap();
        assert_eq!(character.uid, "1");
        assert_eq!(character.name, "Luke Skywalker");
        assert_eq!(character.films.len(), 1);
        assert!(character.vehicles.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people/999999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get_character("999999").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_server_error_is_dependency_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films/2"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).get_film("2").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.is_dependency_error());
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/planets/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_planet("1").await.unwrap_err();
        assert!(matches!(err, HolonetError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_id_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).get_character("abc").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Nothing listens on port 9 locally.
        let client = SwapiClient::with_config(SwapiConfig::new("http://127.0.0.1:9").with_timeout(2)).unwrap();
        let err = client.get_character("1").await.unwrap_err();
        assert_eq!(err.status(), None);
        assert!(err.is_dependency_error());
    }

    #[tokio::test]
    async fn test_get_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
                &["11", "12"],
                Some("https://swapi.tech/api/people?page=3&limit=10"),
                82,
                9,
            )))
            .mount(&server)
            .await;

        let page = client_for(&server).get_page(2, 10).await.unwrap();
        assert!(page.has_next);
        assert_eq!(page.total_records, 82);
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.results[0].uid, "11");
    }

    #[tokio::test]
    async fn test_get_all_characters_walks_pages_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
                &["1", "2"],
                Some("https://swapi.tech/api/people?page=2&limit=100"),
                3,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(&["3"], None, 3, 2)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let all = client.get_all_characters().await.unwrap();
        let uids: Vec<&str> = all.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(uids, vec!["1", "2", "3"]);

        // Second call is served from cache; the mocks expect one hit each.
        let again = client.get_all_characters().await.unwrap();
        assert!(Arc::ptr_eq(&all, &again));

        assert!(client.clear_listing_cache());
        assert!(!client.clear_listing_cache());
    }

    #[tokio::test]
    async fn test_get_all_characters_fails_whole_on_page_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
                &["1"],
                Some("https://swapi.tech/api/people?page=2&limit=100"),
                2,
                2,
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.get_all_characters().await.is_err());
        assert!(client.listing_cache().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_characters_stops_at_total_pages() {
        let server = MockServer::start().await;
        for page in ["1", "2"] {
            Mock::given(method("GET"))
                .and(path("/people"))
                .and(query_param("page", page))
                .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
                    &[page],
                    Some("https://swapi.tech/api/people?page=99&limit=100"),
                    2,
                    2,
                )))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(&[], None, 2, 2)))
            .expect(0)
            .mount(&server)
            .await;

        let all = client_for(&server).get_all_characters().await.unwrap();
        let uids: Vec<&str> = all.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(uids, vec!["1", "2"]);
    }
}
