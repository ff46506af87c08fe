use axum::{http::StatusCode, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;

use crate::auth::invalidate_auth_cookie;

/// Invalidate the auth cookie.
///
/// Always succeeds, even if the client was not logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, invalidate_auth_cookie(jar))
}
