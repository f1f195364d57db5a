//! DTOs for API requests and responses.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Uniform response envelope.
///
/// Successful responses carry `data`, failed ones carry `error`; both carry
/// a UTC timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    /// RFC 3339 timestamp with millisecond precision
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_timestamp(),
        }
    }

    /// Wraps an error.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
            timestamp: now_timestamp(),
        }
    }
}

/// Machine-readable code plus human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code, e.g. `CHARACTER_NOT_FOUND`
    pub code: String,
    /// Human-readable description
    pub message: String,
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Raw query string of the list and search endpoints.
///
/// Everything stays a string here so a malformed number falls back to its
/// default instead of rejecting the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Requested page (1-based)
    pub page: Option<String>,
    /// Requested page size
    pub limit: Option<String>,
    /// Name search term
    pub query: Option<String>,
}

impl ListQuery {
    /// Parses a raw query string.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut parsed = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut parsed.page,
                "limit" => &mut parsed.limit,
                "query" => &mut parsed.query,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        parsed
    }
}

/// Response of `POST /api/characters/cache/clear`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponse {
    /// Human-readable outcome
    pub message: String,
    /// Whether a cached listing was dropped
    pub cache_cleared: bool,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the server state was created
    pub uptime_seconds: u64,
    /// Entries currently held by the response cache
    pub cached_responses: usize,
    /// Whether the full character listing is cached
    pub listing_cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("INVALID_ID", "Invalid character ID format")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "INVALID_ID");
        assert_eq!(json["error"]["message"], "Invalid character ID format");
    }

    #[test]
    fn test_list_query_first_value_wins() {
        let query = ListQuery::parse(Some("page=2&page=3&limit=5&query=luke+sky&sort=name"));
        assert_eq!(query.page.as_deref(), Some("2"));
        assert_eq!(query.limit.as_deref(), Some("5"));
        assert_eq!(query.query.as_deref(), Some("luke sky"));
    }

    #[test]
    fn test_list_query_empty() {
        assert_eq!(ListQuery::parse(None), ListQuery::default());
        assert_eq!(ListQuery::parse(Some("")), ListQuery::default());
    }

    #[test]
    fn test_clear_cache_camel_case() {
        let json = serde_json::to_value(ClearCacheResponse {
            message: "m".into(),
            cache_cleared: true,
        })
        .unwrap();
        assert_eq!(json["cacheCleared"], true);
    }
}
