//! Route definitions for the `/versions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Routes mounted at `/versions`.
///
/// ```text
/// GET    /                -> list_versions (?limit=)
/// POST   /                -> create_version
/// GET    /{id}            -> get_version
/// POST   /{id}/restore    -> restore_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(versions::list_versions).post(versions::create_version),
        )
        .route("/{id}", get(versions::get_version))
        .route("/{id}/restore", post(versions::restore_version))
}
