use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub const PAGINATION_COUNT: HeaderName = HeaderName::from_static("x-pagination-count");
pub const PAGINATION_OFFSET: HeaderName = HeaderName::from_static("x-pagination-offset");
pub const PAGINATION_LIMIT: HeaderName = HeaderName::from_static("x-pagination-limit");

/// Common query parameters of every list endpoint. `ids` is a repeatable
/// key (`?ids=..&ids=..`), hence `axum_extra::extract::Query` on the routes.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ListQuery {
    pub ids: Option<Vec<Uuid>>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
    #[validate(range(min = 0_i64, max = 9_007_199_254_740_991_i64))]
    pub offset: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            ids: None,
            limit: 30,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn ids(&self) -> Option<&[Uuid]> {
        self.ids.as_deref()
    }
}

pub fn pagination_headers(count: i64, offset: i64, limit: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(PAGINATION_COUNT, HeaderValue::from(count));
    headers.insert(PAGINATION_OFFSET, HeaderValue::from(offset));
    headers.insert(PAGINATION_LIMIT, HeaderValue::from(limit));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 30);
        assert_eq!(query.offset, 0);
        assert!(query.ids.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let query = ListQuery {
            limit: 0,
            ..ListQuery::default()
        };
        assert!(query.validate().is_err());

        let query = ListQuery {
            limit: 1001,
            ..ListQuery::default()
        };
        assert!(query.validate().is_err());

        let query = ListQuery {
            limit: 1000,
            ..ListQuery::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn negative_offset_is_rejected() {
        let query = ListQuery {
            offset: -1,
            ..ListQuery::default()
        };
        assert!(query.validate().is_err());
    }
}
