pub mod auth;
pub mod brands;
pub mod health;
pub mod publish;
pub mod sections;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/verify                         current identity (requires auth)
///
/// /sections                            list all, defaults for missing
/// /sections/{tag}                      get, update (admin)
/// /sections/{tag}/validate             dry-run validation
/// /sections/{tag}/preview              render without saving
///
/// /brands/logos                        append logo (admin)
/// /brands/logos/order                  reorder logos (admin, PUT)
/// /brands/logos/{id}                   remove logo (admin, DELETE)
///
/// /publish                             run the publish pipeline (admin)
/// /publish/status                      last publish, unpublished changes
///
/// /versions                            list, create (admin)
/// /versions/{id}                       get with snapshot payload
/// /versions/{id}/restore               restore (admin, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sections", sections::router())
        .nest("/brands", brands::router())
        .nest("/publish", publish::router())
        .nest("/versions", versions::router())
}
