//! The log-in endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_login, set_auth_cookie},
    db::lock_connection,
    timezone::get_local_offset,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
pub const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Warsaw".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent by the client.
///
/// The password is a plain string, it is only compared against the stored hash.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogInData {
    /// Username or email address.
    pub login: String,
    pub password: String,
    /// Extend the initial cookie duration to [REMEMBER_ME_COOKIE_DURATION].
    #[serde(default)]
    pub remember_me: bool,
}

/// The body returned after a successful log-in or registration.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub user_id: UserID,
    pub username: String,
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set and the user is returned.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] for an unknown login or a wrong password.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Json(data): Json<LogInData>,
) -> Response {
    match log_in(&state, jar, &data) {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

fn log_in(
    state: &LogInState,
    jar: PrivateCookieJar,
    data: &LogInData,
) -> Result<(PrivateCookieJar, Json<SessionUser>), Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_login(&data.login, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&data.password)? {
        tracing::info!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let cookie_duration = if data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let jar = set_auth_cookie(jar, user.id, cookie_duration, local_offset)?;

    Ok((
        jar,
        Json(SessionUser {
            user_id: user.id,
            username: user.username,
        }),
    ))
}
