//! Category listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, get_all_categories},
    db::lock_connection,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the logged in user's categories ordered by name.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_categories(user_id, &connection).map(Json)
}
