//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for staff listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 30;

/// Upper bound for any page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Zero-based pagination (`?pageNo=&limit=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Rows to skip. Saturates so a huge `pageNo` reads past the end
    /// instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page_no.unwrap_or(0).max(0).saturating_mul(self.limit())
    }
}

/// `?limit=` on its own, for the "latest" rails.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_based() {
        let params = PageParams {
            page_no: Some(2),
            limit: Some(10),
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(PageParams::default().offset(), 0);
    }

    #[test]
    fn limits_are_clamped() {
        let params = PageParams {
            page_no: Some(-3),
            limit: Some(10_000),
        };
        assert_eq!(params.limit(), MAX_PAGE_LIMIT);
        assert_eq!(params.offset(), 0);
        assert_eq!(LimitParams { limit: Some(0) }.limit_or(5), 1);
    }

    #[test]
    fn huge_page_number_saturates() {
        let params = PageParams {
            page_no: Some(i64::MAX),
            limit: Some(50),
        };
        assert_eq!(params.offset(), i64::MAX);
    }
}
