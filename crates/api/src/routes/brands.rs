//! Route definitions for brand logo operations.

use axum::routing::{delete, post, put};
use axum::Router;

use crate::handlers::brands;
use crate::state::AppState;

/// Routes mounted at `/brands`.
///
/// ```text
/// POST   /logos          -> add_logo
/// PUT    /logos/order    -> reorder_logos
/// DELETE /logos/{id}     -> remove_logo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logos", post(brands::add_logo))
        .route("/logos/order", put(brands::reorder_logos))
        .route("/logos/{id}", delete(brands::remove_logo))
}
