//! Handlers for the `/sections` resource.
//!
//! Writes are validated against the section's rule table before anything
//! reaches the store; a rejected payload comes back as a 400 with one entry
//! per violated rule.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use folio_core::error::CoreError;
use folio_core::render::Renderer;
use folio_core::section::{Fields, Section, SectionContent, SectionTag};
use folio_core::types::Timestamp;
use folio_core::validation::{validate, ValidationResult};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One section as the editor sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: SectionTag,
    /// Typed content; defaults when the section was never written.
    pub content: Fields,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Rendered fragment returned by the preview endpoint.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub section: SectionTag,
    pub html: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_tag(tag: &str) -> Result<SectionTag, AppError> {
    Ok(tag.parse::<SectionTag>()?)
}

/// Validate `payload` for `tag`, turning violations into a 400.
fn ensure_valid(tag: SectionTag, payload: &Value) -> Result<(), AppError> {
    let result = validate(tag, payload);
    if result.is_valid() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::InvalidContent {
            section: tag,
            errors: result.into_errors(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/sections
///
/// Every known section in site order, with typed defaults for missing ones.
/// Stored content that no longer parses is returned as stored.
pub async fn list_sections(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SectionView>>>> {
    let stored: HashMap<SectionTag, Section> = state
        .store
        .list_sections()
        .await?
        .into_iter()
        .map(|s| (s.section, s))
        .collect();

    let views = SectionTag::ALL
        .into_iter()
        .map(|tag| match stored.get(&tag) {
            Some(section) => SectionView {
                section: tag,
                content: section
                    .content()
                    .map(|c| c.to_fields())
                    .unwrap_or_else(|_| section.fields.clone()),
                stored: true,
                updated_at: Some(section.updated_at),
            },
            None => SectionView {
                section: tag,
                content: SectionContent::default_for(tag).to_fields(),
                stored: false,
                updated_at: None,
            },
        })
        .collect();

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/sections/{tag}
pub async fn get_section(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> AppResult<Json<DataResponse<Section>>> {
    let tag = parse_tag(&tag)?;
    let section = state
        .store
        .get_section(tag)
        .await?
        .ok_or_else(|| CoreError::not_found("Section", tag))?;
    Ok(Json(DataResponse { data: section }))
}

/// PUT /api/v1/sections/{tag}
///
/// Validate the payload and upsert its fields. Fields not in the payload keep
/// their stored value; list fields are replaced wholesale.
pub async fn update_section(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<DataResponse<Section>>> {
    let tag = parse_tag(&tag)?;
    ensure_valid(tag, &payload)?;

    let Value::Object(fields) = payload else {
        return Err(AppError::BadRequest("Section payload must be a JSON object".into()));
    };
    let field_count = fields.len();
    let section = state.store.upsert_section(tag, fields).await?;

    tracing::info!(section = %tag, fields = field_count, user = %user.email, "Section updated");
    Ok(Json(DataResponse { data: section }))
}

/// POST /api/v1/sections/{tag}/validate
///
/// Dry-run validation; never writes.
pub async fn validate_section(
    RequireAuth(_user): RequireAuth,
    Path(tag): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<DataResponse<ValidationResult>>> {
    let tag = parse_tag(&tag)?;
    Ok(Json(DataResponse {
        data: validate(tag, &payload),
    }))
}

/// POST /api/v1/sections/{tag}/preview
///
/// Render a payload to its HTML fragment without saving it, using the same
/// escape policy as publishing.
pub async fn preview_section(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<DataResponse<PreviewResponse>>> {
    let tag = parse_tag(&tag)?;
    ensure_valid(tag, &payload)?;

    let renderer = Renderer::new(state.publisher.config().escape);
    let html = renderer.render_value(tag, &payload)?;
    Ok(Json(DataResponse {
        data: PreviewResponse { section: tag, html },
    }))
}
