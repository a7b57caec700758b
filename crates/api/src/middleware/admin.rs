//! Admin gate extractor.
//!
//! The admin area is unlocked by the `typing_test_admin_auth` cookie issued
//! by `POST /api/v1/admin/session`. This is a convenience gate on a shared
//! password, not an access-control boundary.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use typeboard_core::admin_gate::{flag_is_valid, ADMIN_FLAG_NAME};
use typeboard_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Requires a valid admin flag cookie. Rejects with 401 Unauthorized
/// otherwise.
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(&parts.headers, &state.config.admin_password) {
            Ok(RequireAdmin)
        } else {
            Err(AppError::Core(CoreError::Unauthorized(
                "Admin password required".into(),
            )))
        }
    }
}

/// Whether `headers` carry a valid admin flag for `secret`.
pub fn is_admin(headers: &HeaderMap, secret: &str) -> bool {
    read_cookie(headers, ADMIN_FLAG_NAME).is_some_and(|value| flag_is_valid(value, secret))
}

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use typeboard_core::admin_gate::issue_flag;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_cookie_among_others() {
        let h = headers("theme=dark; typing_test_admin_auth=abc; lang=en");
        assert_eq!(read_cookie(&h, ADMIN_FLAG_NAME), Some("abc"));
        assert_eq!(read_cookie(&h, "missing"), None);
    }

    #[test]
    fn admin_requires_flag_for_same_secret() {
        let flag = issue_flag("hunter2");
        let h = headers(&format!("{ADMIN_FLAG_NAME}={flag}"));

        assert!(is_admin(&h, "hunter2"));
        assert!(!is_admin(&h, "other"));
        assert!(!is_admin(&headers(&format!("{ADMIN_FLAG_NAME}=true")), "hunter2"));
        assert!(!is_admin(&HeaderMap::new(), "hunter2"));
    }
}
