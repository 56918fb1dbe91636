//! HTTP mapping of workflow errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domains::posts::error::WorkflowError;

/// Wrapper so workflow errors can be returned straight from handlers.
pub struct ApiError(WorkflowError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WorkflowError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowError::Generation(_) | WorkflowError::Publish(_) => StatusCode::BAD_GATEWAY,
            WorkflowError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        let cases = [
            (
                WorkflowError::configuration("inactive"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                WorkflowError::Generation("provider down".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                WorkflowError::Publish("endpoint 500".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                WorkflowError::Persistence("store".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WorkflowError::not_found("post"),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
