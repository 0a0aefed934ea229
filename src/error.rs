// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Implements `IntoResponse`, which makes it the single terminal error
/// normalizer: every handler and middleware returns `Result<_, ApiError>` and
/// the envelope shape `{success: false, message}` is produced in exactly one
/// place.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation {
        message: String,
        // BTreeMap keeps field ordering deterministic for a given input
        details: BTreeMap<String, String>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Internal {
        message: String,
        detail: Option<String>,
    },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal { message, .. } => message,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, details } => {
                json!({
                    "success": false,
                    "message": message,
                    "details": details,
                })
            }
            ApiError::Internal { message, detail } => {
                let mut body = json!({
                    "success": false,
                    "message": message,
                });
                // Diagnostics stay out of production responses
                if !crate::is_production!() {
                    if let Some(detail) = detail {
                        body["detail"] = json!(detail);
                    }
                }
                body
            }
            _ => {
                json!({
                    "success": false,
                    "message": self.message(),
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>, details: BTreeMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: None,
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Typed store errors map by kind, never by sniffing message strings here
impl From<crate::database::store::StoreError> for ApiError {
    fn from(err: crate::database::store::StoreError) -> Self {
        use crate::database::store::StoreError;
        match err {
            StoreError::NotFound => ApiError::not_found("Record not found"),
            StoreError::UniqueViolation { constraint } => {
                tracing::debug!(constraint = ?constraint, "unique constraint violation");
                ApiError::conflict("A record with the same unique value already exists")
            }
            StoreError::MissingField { column } => match column {
                Some(column) => {
                    ApiError::bad_request(format!("Missing required field '{}'", column))
                }
                None => ApiError::bad_request("Missing required field"),
            },
            StoreError::Connection(msg) => {
                tracing::error!("database connection error: {}", msg);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            StoreError::Query(msg) => {
                // Never expose internal SQL errors to clients
                tracing::error!("database query error: {}", msg);
                ApiError::Internal {
                    message: "An error occurred while processing your request".to_string(),
                    detail: Some(msg),
                }
            }
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        use crate::auth::TokenError;
        match err {
            TokenError::Verification(msg) => {
                tracing::debug!("token verification failed: {}", msg);
                ApiError::unauthorized("Invalid or expired token")
            }
            TokenError::Generation(msg) => {
                tracing::error!("token generation failed: {}", msg);
                ApiError::internal("An error occurred while processing your request")
            }
            TokenError::MissingSecret => {
                tracing::error!("JWT secret not configured");
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for '{}'", field));
                details.insert(field.to_string(), message);
            }
        }
        ApiError::validation("Request validation failed", details)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("bcrypt error: {}", err);
        ApiError::internal("An error occurred while processing your request")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::StoreError;

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_envelope_is_never_successful() {
        let body = ApiError::conflict("duplicate slug").to_json();
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["message"], serde_json::json!("duplicate slug"));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err: ApiError = StoreError::UniqueViolation {
            constraint: Some("blog_posts_slug_key".to_string()),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_field_names_the_column() {
        let err: ApiError = StoreError::MissingField {
            column: Some("title".to_string()),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("title"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiError = StoreError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_details_are_deterministic() {
        let mut details = BTreeMap::new();
        details.insert("email".to_string(), "invalid email".to_string());
        details.insert("title".to_string(), "too short".to_string());
        let body = ApiError::validation("Request validation failed", details).to_json();
        assert_eq!(body["details"]["email"], "invalid email");
        assert_eq!(body["details"]["title"], "too short");
    }
}
