//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for listings; clamped by the version manager.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
