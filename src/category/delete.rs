//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{CategoryId, delete_category},
    db::lock_connection,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a category. Fails with 409 while any expense or recurring expense uses it.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(user_id, category_id, &connection) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(Error::CategoryInUse) => {
            tracing::info!("Refused to delete category {category_id} because it is in use");
            Err(Error::CategoryInUse)
        }
        Err(error) => Err(error),
    }
}
