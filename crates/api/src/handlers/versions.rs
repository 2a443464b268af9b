//! Handlers for the `/versions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::store::{HomepageVersion, VersionSummary};
use folio_core::types::DbId;
use folio_publish::{RestoreOptions, RestoreOutcome};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /versions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateVersionRequest {
    pub name: Option<String>,
    /// Mark the new version active, deactivating every other one.
    pub activate: bool,
}

/// GET /api/v1/versions
///
/// Version summaries, most recent first (`?limit=`, default 10, max 100).
pub async fn list_versions(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<VersionSummary>>>> {
    let versions = state.versions.list_versions(params.limit).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/versions
pub async fn create_version(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    input: Option<Json<CreateVersionRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<VersionSummary>>)> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let version = state.versions.create_version(input.name, input.activate).await?;
    tracing::info!(version_id = version.id, user = %admin.email, "Version created via API");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: VersionSummary::from(&version),
        }),
    ))
}

/// GET /api/v1/versions/{id}
///
/// Full version including the snapshot payload.
pub async fn get_version(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HomepageVersion>>> {
    let version = state.versions.get_version(id).await?;
    Ok(Json(DataResponse { data: version }))
}

/// POST /api/v1/versions/{id}/restore
///
/// Restore a version as the current content. Backs up the current content
/// first unless `backupCurrent` is false; the body may be omitted.
pub async fn restore_version(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    options: Option<Json<RestoreOptions>>,
) -> AppResult<Json<DataResponse<RestoreOutcome>>> {
    let options = options.map(|Json(options)| options).unwrap_or_default();
    tracing::info!(version_id = id, user = %admin.email, backup = options.backup_current, "Restore requested");
    let outcome = state.versions.restore_version(id, options).await?;
    Ok(Json(DataResponse { data: outcome }))
}
