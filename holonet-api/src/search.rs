//! Pagination parameters and name search.
//!
//! Search walks the whole cached listing in memory. That is fine for SWAPI's
//! corpus (under a hundred characters across a handful of pages) and is the
//! only strategy the upstream supports for partial matches; a much larger
//! corpus would need server-side search instead.

use holonet_core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use holonet_core::types::{CharacterSummary, Paginated, Pagination};

use crate::dto::ListQuery;

/// Validated list/search parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page, at least 1
    pub page: u32,
    /// Page size in `1..=50`
    pub limit: u32,
    /// Trimmed, non-empty search term
    pub query: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            query: None,
        }
    }
}

impl ListParams {
    /// Validates the raw query string.
    ///
    /// A missing, non-numeric or zero value takes the default; anything else
    /// is clamped (page at least 1, limit within `1..=50`).
    pub fn from_query(raw: &ListQuery) -> Self {
        let page = match raw.page.as_deref().and_then(parse_leading_int) {
            None | Some(0) => i64::from(DEFAULT_PAGE),
            Some(n) => n.max(1),
        };
        let limit = match raw.limit.as_deref().and_then(parse_leading_int) {
            None | Some(0) => i64::from(DEFAULT_PAGE_LIMIT),
            Some(n) => n.clamp(1, i64::from(MAX_PAGE_LIMIT)),
        };
        let query = raw
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: limit as u32,
            query,
        }
    }

    /// Index of the first item of this page within the full result set.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1).saturating_mul(self.limit as usize)
    }
}

/// Parses the leading integer of `s`, ignoring whatever follows it.
///
/// `"12"`, `" 12"` and `"12abc"` all give 12; `"abc"` gives `None`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate rather than fail on absurdly long inputs.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Returns true if `name` matches the search `term`, case-insensitively.
///
/// A name matches when it equals the term, contains it, starts with it, or
/// has a whitespace-delimited word starting with it.
pub fn matches_name(name: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    let name = name.to_lowercase();

    name == term
        || name.contains(&term)
        || name.starts_with(&term)
        || name.split_whitespace().any(|word| word.starts_with(&term))
}

/// Keeps the summaries whose name matches `term`, in listing order.
pub fn filter_by_name<I>(summaries: I, term: &str) -> Vec<CharacterSummary>
where
    I: IntoIterator<Item = CharacterSummary>,
{
    summaries
        .into_iter()
        .filter(|summary| matches_name(&summary.name, term))
        .collect()
}

/// Slices one page out of `items`, computing pagination from the full set.
pub fn paginate<T>(items: Vec<T>, params: &ListParams) -> Paginated<T> {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(params.offset())
        .take(params.limit as usize)
        .collect();

    Paginated {
        data,
        pagination: Pagination::for_slice(params.page, params.limit, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn raw(page: Option<&str>, limit: Option<&str>, query: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            query: query.map(String::from),
        }
    }

    fn summaries(names: &[&str]) -> Vec<CharacterSummary> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| CharacterSummary::from_uid((i + 1).to_string(), *name))
            .collect()
    }

    #[test_case(None, None => (1, 10) ; "defaults")]
    #[test_case(Some("3"), Some("20") => (3, 20) ; "plain values")]
    #[test_case(Some("0"), Some("1000") => (1, 50) ; "limit ceiling")]
    #[test_case(Some("-4"), Some("-5") => (1, 1) ; "negatives clamp up")]
    #[test_case(Some("abc"), Some("xyz") => (1, 10) ; "garbage uses defaults")]
    #[test_case(Some("2abc"), Some("15px") => (2, 15) ; "leading digits")]
    #[test_case(Some("1"), Some("0") => (1, 10) ; "zero limit uses default")]
    #[test_case(Some(""), Some(" ") => (1, 10) ; "blank")]
    fn test_clamping(page: Option<&str>, limit: Option<&str>) -> (u32, u32) {
        let params = ListParams::from_query(&raw(page, limit, None));
        (params.page, params.limit)
    }

    #[test]
    fn test_query_trimmed_and_blank_dropped() {
        assert_eq!(
            ListParams::from_query(&raw(None, None, Some("  luke "))).query.as_deref(),
            Some("luke")
        );
        assert!(ListParams::from_query(&raw(None, None, Some("   "))).query.is_none());
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  7 "), Some(7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test_case("Luke Skywalker", "luke" => true ; "prefix")]
    #[test_case("Luke Skywalker", "SKY" => true ; "word prefix any case")]
    #[test_case("Luke Skywalker", "walker" => true ; "substring")]
    #[test_case("R2-D2", "r2-d2" => true ; "exact")]
    #[test_case("Leia Organa", "luke" => false ; "no match")]
    #[test_case("Obi-Wan Kenobi", "  obi  " => true ; "term trimmed")]
    fn test_matches_name(name: &str, term: &str) -> bool {
        matches_name(name, term)
    }

    #[test]
    fn test_filter_luke() {
        let found = filter_by_name(summaries(&["Luke Skywalker", "Leia Organa"]), "luke");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Luke Skywalker");
    }

    #[test]
    fn test_filter_no_match_is_empty_page() {
        let found = filter_by_name(summaries(&["Luke Skywalker", "Leia Organa"]), "jar jar");
        let page = paginate(found, &ListParams::default());
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_paginate_last_page() {
        let items: Vec<u32> = (1..=25).collect();
        let params = ListParams {
            page: 3,
            limit: 10,
            query: None,
        };
        let page = paginate(items, &params);
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn test_page_zero_reads_as_first_page() {
        let params = ListParams {
            page: 0,
            limit: 10,
            query: None,
        };
        assert_eq!(params.offset(), 0);
        let page = paginate((1..=3).collect::<Vec<u32>>(), &params);
        assert_eq!(page.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_paginate_past_end() {
        let params = ListParams {
            page: 9,
            limit: 10,
            query: None,
        };
        let page = paginate((1..=5).collect::<Vec<u32>>(), &params);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 5);
    }
}
