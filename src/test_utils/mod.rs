//! Shared helpers for unit and endpoint tests.

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, MonthKey, build_router,
    auth::{COOKIE_TOKEN, PasswordHash, UserID, create_user},
    db::initialize,
    endpoints,
    profile::create_profile,
};

/// A password that passes the strength check.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// An initialized in-memory database.
pub fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user named "test" with a profile and return their ID.
pub fn create_test_user(connection: &Connection) -> UserID {
    create_named_test_user("test", connection)
}

/// Insert a user with a profile and return their ID.
pub fn create_named_test_user(username: &str, connection: &Connection) -> UserID {
    let user = create_user(
        username,
        &format!("{username}@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user");
    let first_month: MonthKey = "2025-01".parse().expect("Could not parse month");
    create_profile(user.id, username, first_month, connection)
        .expect("Could not create test profile");

    user.id
}

/// A server running the full application router on an in-memory database.
pub fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let state = AppState::new(connection, "test secret", "Etc/UTC")
        .expect("Could not create app state");

    TestServer::new(build_router(state)).expect("Could not create test server.")
}

/// Register `username` through the API and return their auth cookie.
pub async fn register_test_user(server: &TestServer, username: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::USERS)
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status_success();
    response.cookie(COOKIE_TOKEN)
}
