use serde::{Deserialize, Serialize};
use validator::Validate;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters, accepted on every list endpoint.
///
/// Both values arrive as untrusted strings. Parsing failures fall back to the
/// defaults; this never rejects a request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Bounded page/limit pair for the query stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Response-stage metadata, derived from the count query
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let total = total.max(0);
        // ceil(total / limit); limit is always >= 1
        let total_pages = (total + self.limit - 1) / self.limit;

        PaginationMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages,
            has_next: self.page < total_pages,
            has_prev: self.page > 1,
        }
    }
}

/// Pagination block of the response envelope. Wire field names are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_inputs_use_defaults() {
        let req = PageRequest::from_raw(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn non_numeric_inputs_fall_back() {
        let req = PageRequest::from_raw(Some("abc"), Some("xyz"));
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn zero_and_negative_are_clamped() {
        let req = PageRequest::from_raw(Some("0"), Some("-5"));
        assert_eq!(req, PageRequest { page: 1, limit: 1 });

        let req = PageRequest::from_raw(Some("-3"), Some("0"));
        assert_eq!(req, PageRequest { page: 1, limit: 1 });
    }

    #[test]
    fn oversized_limit_is_capped_at_100() {
        let req = PageRequest::from_raw(Some("0"), Some("500"));
        assert_eq!(req, PageRequest { page: 1, limit: 100 });
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let req = PageRequest::from_raw(Some("3"), Some("25"));
        assert_eq!(req.offset(), 50);
    }

    #[test]
    fn meta_arithmetic_is_consistent() {
        let req = PageRequest { page: 2, limit: 10 };
        let meta = req.meta(35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let meta = req.meta(20);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
    }

    #[test]
    fn meta_with_zero_total() {
        let req = PageRequest { page: 1, limit: 10 };
        let meta = req.meta(0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn meta_exact_multiple_of_limit() {
        let req = PageRequest { page: 10, limit: 10 };
        let meta = req.meta(100);
        assert_eq!(meta.total_pages, 10);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let meta = PageRequest { page: 1, limit: 10 }.meta(3);
        let v = serde_json::to_value(&meta).unwrap();
        assert!(v.get("totalPages").is_some());
        assert!(v.get("hasNext").is_some());
        assert!(v.get("hasPrev").is_some());
        assert!(v.get("total_pages").is_none());
    }
}
