//! Handlers for the admin gate and dashboard.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use typeboard_core::admin_gate::{issue_flag, password_matches, ADMIN_FLAG_NAME};
use typeboard_core::error::CoreError;
use typeboard_core::stats::DashboardStats;

use crate::error::{AppError, AppResult};
use crate::middleware::admin::{is_admin, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

/// The flag never expires on its own; ten years stands in for "forever".
const FLAG_MAX_AGE_SECS: u64 = 10 * 365 * 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/session`.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub loading: bool,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/session
///
/// Unlock the admin area. On a matching password, sets the persistent
/// `typing_test_admin_auth` cookie.
pub async fn unlock(
    State(state): State<AppState>,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Response> {
    if !password_matches(&input.password, &state.config.admin_password) {
        tracing::warn!("Admin unlock rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect password".into(),
        )));
    }

    let cookie = format!(
        "{ADMIN_FLAG_NAME}={}; Path=/; Max-Age={FLAG_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
        issue_flag(&state.config.admin_password)
    );
    tracing::info!("Admin area unlocked");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: SessionStatus {
                authenticated: true,
            },
        }),
    )
        .into_response())
}

/// DELETE /api/v1/admin/session
///
/// Clear the admin flag (logout).
pub async fn lock() -> Response {
    let cookie = format!("{ADMIN_FLAG_NAME}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    tracing::info!("Admin area locked");
    (StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response()
}

/// GET /api/v1/admin/session
///
/// Whether the caller currently holds a valid admin flag.
pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<DataResponse<SessionStatus>> {
    Json(DataResponse {
        data: SessionStatus {
            authenticated: is_admin(&headers, &state.config.admin_password),
        },
    })
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dashboard
///
/// Player count and averages over the cached roster.
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<DataResponse<DashboardResponse>> {
    let snapshot = state.controller.snapshot();
    Json(DataResponse {
        data: DashboardResponse {
            stats: DashboardStats::from_players(&snapshot.players),
            loading: snapshot.loading,
            error: snapshot.error,
        },
    })
}
