// --- File: crates/frontdesk_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{FrontdeskError, HttpStatusCode};

pub mod client;

/// Extension trait for FrontdeskError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for FrontdeskError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Only the log sees upstream detail.
        if status_code.is_server_error() {
            error!("🚨 Request failed with {}: {}", status_code.as_u16(), self);
        }

        let body = Json(json!({
            "message": self.public_message(),
            "code": status_code.as_u16(),
        }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for FrontdeskError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{internal_error, not_found};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_not_found_response_shape() {
        let response = not_found("Article not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Article not found");
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = internal_error("password rejected by smtp.example.com").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal Server Error");
    }
}
