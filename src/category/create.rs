//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, CategoryData, CategoryName, create_category},
    db::lock_connection,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a category for the logged in user.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(user_id, name, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        Error,
        category::Category,
        endpoints,
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn create_category_returns_category() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .json(&json!({ "name": "  Groceries " }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category: Category = response.json();
        assert_eq!(category.name.as_ref(), "Groceries");
    }

    #[tokio::test]
    async fn create_duplicate_category_is_conflict() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;

        server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({ "name": "Groceries" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .json(&json!({ "name": "Groceries" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], Error::DuplicateCategoryName.to_string());
    }

    #[tokio::test]
    async fn create_category_with_empty_name_fails() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;

        server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .json(&json!({ "name": " " }))
            .await
            .assert_status_bad_request();
    }
}
