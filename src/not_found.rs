use axum::response::{IntoResponse, Response};

use crate::Error;

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use super::get_404_not_found;

    #[tokio::test]
    async fn returns_json_error() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].is_string());
    }
}
