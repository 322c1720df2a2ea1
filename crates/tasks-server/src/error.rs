//! API error bodies and the mapping from store failures to HTTP statuses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tasks_core::{FieldError, ValidationError};
use tasks_store::StoreError;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code for programmatic handling.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Status code plus body; what every handler returns on failure.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message))
    }

    pub fn validation(error: ValidationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError {
                code: "VALIDATION_ERROR".to_string(),
                message: "One or more validation errors occurred.".to_string(),
                details: Some(error.errors),
            },
        )
    }

    pub fn id_mismatch(path: i64, body: i64) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::new(
                "ID_MISMATCH",
                format!("Path id {path} does not match body id {body}."),
            ),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", "An internal error occurred."),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => Self::not_found(format!("No {what}.")),
            StoreError::IdMismatch { path, body } => Self::id_mismatch(path, body),
            StoreError::Validation(v) => Self::validation(v),
            // Details stay in the log, never in the response.
            fault @ (StoreError::Conflict(_)
            | StoreError::Database(_)
            | StoreError::CorruptRow { .. }
            | StoreError::Io(_)) => {
                tracing::error!(error = %fault, "store fault");
                Self::internal()
            }
        }
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::validation(error)
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, ApiError::new("BAD_REQUEST", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_404() {
        let resp = ApiErrorResponse::from(StoreError::NotFound("task 9".into()));
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.error.code, "NOT_FOUND");
    }

    #[test]
    fn store_validation_maps_to_400_with_details() {
        let resp = ApiErrorResponse::from(StoreError::Validation(ValidationError::single(
            "title", "required",
        )));
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error.details.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn id_mismatch_maps_to_400() {
        let resp = ApiErrorResponse::from(StoreError::IdMismatch { path: 1, body: 2 });
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error.code, "ID_MISMATCH");
    }

    #[test]
    fn faults_hide_details() {
        for err in [
            StoreError::Conflict("task 1".into()),
            StoreError::Database("disk I/O error".into()),
        ] {
            let resp = ApiErrorResponse::from(err);
            assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!resp.error.message.contains("task 1"));
            assert!(!resp.error.message.contains("disk"));
        }
    }

    #[test]
    fn body_omits_empty_details() {
        let json = serde_json::to_value(ApiError::new("NOT_FOUND", "gone")).unwrap();
        assert!(json.get("details").is_none());
    }
}
