//! Shared query parameter types for API handlers.

use recipebook_core::charts::ChartSelector;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /search` (`?ingredient=&chart=`).
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub ingredient: Option<String>,
    pub chart: Option<ChartSelector>,
}
