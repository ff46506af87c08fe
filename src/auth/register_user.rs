//! The user registration endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, MonthKey,
    auth::{
        PasswordHash, SessionUser, ValidatedPassword, create_user, set_auth_cookie,
        validate_email, validate_username,
    },
    db::lock_connection,
    profile::create_profile,
    timezone::{get_local_offset, local_today},
};

/// The bcrypt cost for new passwords. Tests use the minimum to stay fast.
const PASSWORD_HASH_COST: u32 = if cfg!(test) {
    4
} else {
    PasswordHash::DEFAULT_COST
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Warsaw".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
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
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data for a new account.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Create a user and their profile, then log them in.
///
/// The profile starts with the username as display name, the system theme,
/// no default salary and the current month as the first tracked month.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Json(data): Json<RegisterData>,
) -> Response {
    match register(&state, jar, data) {
        Ok((jar, user)) => (StatusCode::CREATED, jar, Json(user)).into_response(),
        Err(error) => error.into_response(),
    }
}

fn register(
    state: &RegistrationState,
    jar: PrivateCookieJar,
    data: RegisterData,
) -> Result<(PrivateCookieJar, SessionUser), Error> {
    let username = validate_username(&data.username)?;
    let email = validate_email(&data.email)?;
    let password = ValidatedPassword::new(&data.password, &[&username, &email])?;
    let password_hash = PasswordHash::new(password, PASSWORD_HASH_COST)?;

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let current_month = MonthKey::containing(local_today(&state.local_timezone)?)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;

        let transaction = connection.unchecked_transaction()?;
        let user = create_user(&username, &email, password_hash, &transaction)?;
        create_profile(user.id, &username, current_month, &transaction)?;
        transaction.commit()?;

        user
    };

    tracing::info!("Registered user {} ({})", user.username, user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration, local_offset)?;

    Ok((
        jar,
        SessionUser {
            user_id: user.id,
            username: user.username,
        },
    ))
}
