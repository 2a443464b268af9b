//! Handlers for the `/auth` resource (login, verify).

use axum::extract::State;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::roles::ROLE_ADMIN;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Identity carried by a valid token.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate the admin account with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let admin = &state.config.admin;
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        ))
    };

    let Some(password_hash) = admin.password_hash.as_deref() else {
        tracing::warn!("Login attempted but ADMIN_PASSWORD_HASH is not configured");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Login is disabled".into(),
        )));
    };

    if !input.email.trim().eq_ignore_ascii_case(&admin.email) {
        return Err(invalid());
    }

    let password_valid = verify_password(&input.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(email = %admin.email, "Rejected admin login");
        return Err(invalid());
    }

    let access_token = generate_access_token(&admin.email, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(email = %admin.email, "Admin logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: UserInfo {
                email: admin.email.clone(),
                role: ROLE_ADMIN.to_string(),
            },
        },
    }))
}

/// GET /api/v1/auth/verify
///
/// Return the identity of the bearer token.
pub async fn verify(user: AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: UserInfo {
            email: user.email,
            role: user.role,
        },
    })
}
