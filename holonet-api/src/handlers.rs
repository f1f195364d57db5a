//! API route handlers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{OriginalUri, Path, RawQuery, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use holonet_core::constants::{
    ALL_CHARACTERS_CACHE_KEY, LIST_RESPONSE_TTL_SECS,
};
use holonet_core::types::{Character, CharacterSummary, Paginated, Pagination};
use holonet_swapi::to_list_summary;

use crate::dto::*;
use crate::error::ApiError;
use crate::search::{filter_by_name, paginate, ListParams};
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

const LIST_TTL: Duration = Duration::from_secs(LIST_RESPONSE_TTL_SECS);

// ═══════════════════════════════════════════════════════════════════════════
// Characters
// ═══════════════════════════════════════════════════════════════════════════

/// GET /api/characters
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> Result<Response> {
    let params = ListParams::from_query(&ListQuery::parse(raw.as_deref()));
    respond_cached(&state, cache_key(&uri), Some(LIST_TTL), || {
        fetch_characters(&state, params)
    })
    .await
}

/// GET /api/characters/search
pub async fn search_characters(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> Result<Response> {
    let params = ListParams::from_query(&ListQuery::parse(raw.as_deref()));
    if params.query.is_none() {
        return Err(ApiError::missing_query());
    }
    respond_cached(&state, cache_key(&uri), Some(LIST_TTL), || {
        fetch_characters(&state, params)
    })
    .await
}

/// GET /api/characters/:id
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Response> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::invalid_id());
    }
    // Details use the response cache's default TTL.
    respond_cached(&state, cache_key(&uri), None, || {
        fetch_character(&state, id)
    })
    .await
}

/// POST /api/characters/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ClearCacheResponse>> {
    let cleared = state.upstream.clear_listing_cache();

    let message = if cleared {
        "Character cache cleared successfully"
    } else {
        "No character cache to clear"
    };
    info!(cleared, "Cache clear requested");

    Json(ApiResponse::ok(ClearCacheResponse {
        message: message.into(),
        cache_cleared: cleared,
    }))
}

async fn fetch_characters(
    state: &AppState,
    params: ListParams,
) -> Result<Paginated<CharacterSummary>> {
    match &params.query {
        None => {
            let page = state
                .upstream
                .get_page(params.page, params.limit)
                .await
                .map_err(|e| ApiError::dependency("Failed to fetch characters", &e))?;

            Ok(Paginated {
                data: page.results.iter().map(to_list_summary).collect(),
                pagination: Pagination::from_upstream(params.page, params.limit, &page),
            })
        }
        Some(term) => {
            let all = state
                .upstream
                .get_all_characters()
                .await
                .map_err(|e| ApiError::dependency("Failed to fetch characters", &e))?;

            let matches = filter_by_name(all.iter().map(to_list_summary), term);
            debug!(term = %term, matches = matches.len(), "Searched characters");
            Ok(paginate(matches, &params))
        }
    }
}

async fn fetch_character(state: &AppState, id: String) -> Result<Character> {
    let record = state.upstream.get_character(&id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found(
                format!("Character with ID {} not found", id),
                "CHARACTER_NOT_FOUND",
            )
        } else {
            ApiError::dependency("Failed to fetch character", &e)
        }
    })?;

    Ok(state.assembler.to_detail(record).await)
}

// ═══════════════════════════════════════════════════════════════════════════
// Response cache
// ═══════════════════════════════════════════════════════════════════════════

fn cache_key(uri: &axum::http::Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Serves a stored success envelope, or produces, stores and serves one.
///
/// Only successful envelopes are stored; errors pass straight through.
/// Without a `ttl` the entry takes the cache's default.
async fn respond_cached<T, F, Fut>(
    state: &AppState,
    key: String,
    ttl: Option<Duration>,
    produce: F,
) -> Result<Response>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if !state.config.enable_response_cache {
        let data = produce().await?;
        return Ok(Json(ApiResponse::ok(data)).into_response());
    }

    if let Some(body) = state.response_cache.get(&key) {
        debug!(key = %key, "Response cache hit");
        return Ok(json_bytes(body, "HIT"));
    }

    let data = produce().await?;
    let body = serde_json::to_vec(&ApiResponse::ok(data))
        .map(Bytes::from)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))?;

    match ttl {
        Some(ttl) => state.response_cache.set_with_ttl(key, body.clone(), ttl),
        None => state.response_cache.set(key, body.clone()),
    }
    Ok(json_bytes(body, "MISS"))
}

fn json_bytes(body: Bytes, cache_status: &'static str) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(X_CACHE.clone(), HeaderValue::from_static(cache_status));
    response
}

// ═══════════════════════════════════════════════════════════════════════════
// Misc
// ═══════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let listing_cached = state
        .listing_cache
        .as_ref()
        .is_some_and(|cache| cache.has(ALL_CHARACTERS_CACHE_KEY));

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cached_responses: state.response_cache.len(),
        listing_cached,
    })
}

/// Fallback for unknown routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let body = ApiResponse::<()>::failure("NOT_FOUND", format!("Route {} not found", uri.path()));
    (StatusCode::NOT_FOUND, Json(body))
}
