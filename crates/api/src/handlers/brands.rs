//! Handlers for brand logo list operations under `/brands/logos`.
//!
//! Each operation loads the brands section, applies the change, re-validates
//! the whole section and writes it back, holding `AppState::brands_lock`
//! throughout so concurrent edits cannot overwrite each other.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::section::content::{BrandLogo, Brands};
use folio_core::section::{NewLogo, SectionContent, SectionTag};
use folio_core::types::DbId;
use folio_core::validation::validate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /brands/logos`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLogoRequest {
    pub name: String,
    pub logo_url: String,
}

/// Request body for `PUT /brands/logos/order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderLogosRequest {
    pub logo_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_brands(state: &AppState) -> AppResult<Brands> {
    let Some(section) = state.store.get_section(SectionTag::Brands).await? else {
        return Ok(Brands::default());
    };
    match section.content()? {
        SectionContent::Brands(brands) => Ok(brands),
        other => Err(AppError::InternalError(format!(
            "brands section decoded as {}",
            other.tag()
        ))),
    }
}

/// Validate the updated section and write it back.
async fn save_brands(state: &AppState, brands: Brands) -> AppResult<Brands> {
    let fields = SectionContent::from(brands.clone()).to_fields();
    let result = validate(SectionTag::Brands, &Value::Object(fields.clone()));
    if !result.is_valid() {
        return Err(AppError::Core(CoreError::InvalidContent {
            section: SectionTag::Brands,
            errors: result.into_errors(),
        }));
    }
    state.store.upsert_section(SectionTag::Brands, fields).await?;
    Ok(brands)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/brands/logos
///
/// Append a logo; its id and display order are assigned.
pub async fn add_logo(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AddLogoRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BrandLogo>>)> {
    let _edit = state.brands_lock.lock().await;
    let mut brands = load_brands(&state).await?;
    let logo = brands.add_logo(NewLogo {
        name: input.name,
        logo_url: input.logo_url,
    })?;
    save_brands(&state, brands).await?;

    tracing::info!(logo_id = logo.id, display_order = logo.display_order, "Brand logo added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: logo })))
}

/// DELETE /api/v1/brands/logos/{id}
///
/// Remove a logo and renumber the remaining ones from 1.
pub async fn remove_logo(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brands>>> {
    let _edit = state.brands_lock.lock().await;
    let mut brands = load_brands(&state).await?;
    brands.remove_logo(id)?;
    let brands = save_brands(&state, brands).await?;

    tracing::info!(logo_id = id, remaining = brands.logos.len(), "Brand logo removed");
    Ok(Json(DataResponse { data: brands }))
}

/// PUT /api/v1/brands/logos/order
///
/// Reorder logos; the list must name every logo exactly once.
pub async fn reorder_logos(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ReorderLogosRequest>,
) -> AppResult<Json<DataResponse<Brands>>> {
    let _edit = state.brands_lock.lock().await;
    let mut brands = load_brands(&state).await?;
    brands.reorder_logos(&input.logo_ids)?;
    let brands = save_brands(&state, brands).await?;

    tracing::info!(logos = brands.logos.len(), "Brand logos reordered");
    Ok(Json(DataResponse { data: brands }))
}
