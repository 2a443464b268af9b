//! Handlers for `/publish`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_publish::{PublishRequest, PublishResult, PublishStage, PublishStatus};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/publish
///
/// Run the publish pipeline. The body is optional. A failed publish is
/// still a [`PublishResult`]; the status code reflects the stage it stopped in.
pub async fn publish(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    input: Option<Json<PublishRequest>>,
) -> (StatusCode, Json<DataResponse<PublishResult>>) {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    tracing::info!(user = %admin.email, create_backup = input.create_backup, "Publish requested");

    let result = state.publisher.publish(input).await;
    let status = match result.failed_stage {
        None => StatusCode::OK,
        Some(PublishStage::Validating) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(DataResponse { data: result }))
}

/// GET /api/v1/publish/status
///
/// Last successful publish since startup, and whether sections changed after it.
pub async fn status(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PublishStatus>>> {
    let status = state.publisher.status().await?;
    Ok(Json(DataResponse { data: status }))
}
