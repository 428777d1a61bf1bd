//! HTTP error mapping. Domain errors become `{"error": "<message>"}` with
//! the status from `FactoryError::http_status()`. Callers never see stack
//! traces; internals are logged server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use factories_core::error::FactoryError;

pub struct AppError(pub FactoryError);

impl From<FactoryError> for AppError {
    fn from(e: FactoryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
