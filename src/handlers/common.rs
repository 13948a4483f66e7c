use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Body returned by write operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: i32) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1))]
        value: i32,
    }

    #[test]
    fn invalid_input_becomes_validation_error() {
        assert_matches!(
            validate_input(&Probe { value: 0 }),
            Err(ApiError::ValidationError(_))
        );
        assert!(validate_input(&Probe { value: 3 }).is_ok());
    }

    #[test]
    fn message_response_omits_missing_id() {
        let body = serde_json::to_value(MessageResponse::new("ok")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "ok" }));

        let body = serde_json::to_value(MessageResponse::with_id("ok", 7)).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "ok", "id": 7 }));
    }
}
