//! Profile endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, MonthKey,
    auth::UserID,
    db::lock_connection,
    profile::{Profile, ProfileUpdate, Theme, get_profile, update_profile},
    validation::{validate_amount, validate_text},
};

/// The longest allowed display name, in characters.
const DISPLAY_NAME_MAX_LENGTH: usize = 50;

/// The state needed for the profile endpoints.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields of a profile the client may change.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateData {
    pub display_name: Option<String>,
    pub theme_pref: Option<Theme>,
    pub default_salary_cents: Option<i64>,
    /// A month in the format "YYYY-MM".
    pub first_tracked_month: Option<String>,
}

impl ProfileUpdateData {
    fn validate(self) -> Result<ProfileUpdate, Error> {
        Ok(ProfileUpdate {
            display_name: self
                .display_name
                .map(|name| validate_text("display name", &name, 1, DISPLAY_NAME_MAX_LENGTH))
                .transpose()?,
            theme_pref: self.theme_pref,
            default_salary_cents: self
                .default_salary_cents
                .map(|cents| validate_amount("default salary", cents))
                .transpose()?,
            first_tracked_month: self
                .first_tracked_month
                .map(|month| month.parse::<MonthKey>())
                .transpose()?,
        })
    }
}

/// Get the logged in user's profile.
pub async fn get_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Profile>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_profile(user_id, &connection).map(Json)
}

/// Update the logged in user's profile and return the result.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<ProfileUpdateData>,
) -> Result<Json<Profile>, Error> {
    let update = data.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_profile(user_id, &update, &connection).map(Json)
}
