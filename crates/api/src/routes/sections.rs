//! Route definitions for the `/sections` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sections;
use crate::state::AppState;

/// Routes mounted at `/sections`.
///
/// ```text
/// GET    /                  -> list_sections
/// GET    /{tag}             -> get_section
/// PUT    /{tag}             -> update_section
/// POST   /{tag}/validate    -> validate_section
/// POST   /{tag}/preview     -> preview_section
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sections::list_sections))
        .route(
            "/{tag}",
            get(sections::get_section).put(sections::update_section),
        )
        .route("/{tag}/validate", post(sections::validate_section))
        .route("/{tag}/preview", post(sections::preview_section))
}
