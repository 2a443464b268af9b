//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api::error::AppError;
use folio_core::error::CoreError;
use folio_core::section::SectionTag;
use folio_core::validation::FieldError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("HomepageVersion", 42));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "HomepageVersion with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: InvalidContent maps to 400 and carries field errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_content_returns_400_with_field_errors() {
    let err = AppError::Core(CoreError::InvalidContent {
        section: SectionTag::Hero,
        errors: vec![FieldError::new("title", "must be a string")],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid hero content");
    assert_eq!(json["errors"][0]["field"], "title");
    assert_eq!(json["errors"][0]["message"], "must be a string");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 without field errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("logo id 3 appears more than once".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json.get("errors").is_none());
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: Conflict, Unauthorized and Forbidden map to 409 / 401 / 403
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_error_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("duplicate".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("Admin role required".into())))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Test: snapshot and write failures keep their own codes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corrupt_snapshot_returns_500_snapshot_error() {
    let err = AppError::Core(CoreError::CorruptSnapshot {
        version_id: 3,
        reason: "checksum mismatch".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "SNAPSHOT_ERROR");
    assert!(json["error"].as_str().unwrap().contains("version 3"));
}

#[tokio::test]
async fn snapshot_error_returns_500_snapshot_error() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Snapshot("rolled back".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "SNAPSHOT_ERROR");
}

#[tokio::test]
async fn write_error_returns_500_write_error() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Write("disk full".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "WRITE_ERROR");
    assert_eq!(json["error"], "disk full");
}

// ---------------------------------------------------------------------------
// Test: store and internal errors are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_error_is_sanitized() {
    let err = AppError::Core(CoreError::Store("connection refused to 10.0.0.5".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("secret stack trace".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
