//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope.
///
/// `total_pages` is `ceil(total_results / limit)`; a page past the end has
/// an empty `data` list.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub page: i64,
    pub limit: i64,
    pub total_results: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}
