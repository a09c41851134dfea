//! HTTP mapping of [`StrataError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::StrataError;

/// HTTP status for an error
pub fn status_code(error: &StrataError) -> StatusCode {
    if error.is_bad_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for StrataError {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
