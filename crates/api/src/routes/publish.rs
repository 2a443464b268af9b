//! Route definitions for `/publish`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::publish;
use crate::state::AppState;

/// Routes mounted at `/publish`.
///
/// ```text
/// POST /         -> publish
/// GET  /status   -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(publish::publish))
        .route("/status", get(publish::status))
}
