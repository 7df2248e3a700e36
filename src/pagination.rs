//! Page/limit query handling for the `/list` endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `?page=&limit=` query. Kept as strings so a malformed value falls
/// back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self) -> PageRequest {
        PageRequest {
            page: positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: positive(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        }
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|n| *n >= 1)
}

/// A resolved page request; both fields are at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

/// `{result, meta}` body of every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            result: self.result.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn defaults_apply() {
        assert_eq!(query(None, None).resolve(), PageRequest::default());
        assert_eq!(
            query(Some("abc"), Some("0")).resolve(),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            query(Some("-2"), Some("")).resolve(),
            PageRequest { page: 1, limit: 10 }
        );
    }

    #[test]
    fn explicit_values_are_kept() {
        let request = query(Some("3"), Some("25")).resolve();
        assert_eq!(request, PageRequest { page: 3, limit: 25 });
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        let cases = [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (7, 3, 3), (5, 1, 5)];
        for (total, limit, expected) in cases {
            let meta = PageMeta::new(PageRequest { page: 1, limit }, total);
            assert_eq!(meta.total_pages, expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn meta_serializes_camel_case_total_pages() {
        let meta = PageMeta::new(PageRequest::default(), 0);
        let value = serde_json::to_value(meta).unwrap();
        assert_eq!(value["totalPages"], 0);
        assert!(value.get("total_pages").is_none());
    }
}
