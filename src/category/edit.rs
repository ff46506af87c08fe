//! Category rename endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, CategoryData, CategoryId, CategoryName, update_category},
    db::lock_connection,
};

/// The state needed for renaming a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Rename one of the logged in user's categories.
///
/// Expenses keep their category, so the new name shows up everywhere the category is used.
pub async fn update_category_endpoint(
    State(state): State<UpdateCategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(data): Json<CategoryData>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;

    update_category(user_id, category_id, name, &connection).map(Json)
}
