use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::api::pagination::PaginationMeta;

/// Wrapper for API responses that adds the success envelope.
///
/// Every 2xx response in the system goes through this type, so the
/// `success: true` flag and the status class cannot disagree. Errors go
/// through `ApiError` which always carries `success: false`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: T,
    pub pagination: Option<PaginationMeta>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with default 200 status
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            pagination: None,
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created response
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            pagination: None,
            status_code: StatusCode::CREATED,
        }
    }

    /// Paginated list response, always 200
    pub fn paginated(message: impl Into<String>, data: T, pagination: PaginationMeta) -> Self {
        Self {
            message: message.into(),
            data,
            pagination: Some(pagination),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data",
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "message": self.message,
            "data": data,
        });
        if let Some(pagination) = &self.pagination {
            envelope["pagination"] = json!(pagination);
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::pagination::PageRequest;

    #[test]
    fn success_defaults_to_200() {
        let res = ApiResponse::success("ok", json!({"id": 1}));
        assert_eq!(res.status_code, StatusCode::OK);
        assert!(res.pagination.is_none());
    }

    #[test]
    fn created_uses_201() {
        let res = ApiResponse::created("created", json!({}));
        assert_eq!(res.status_code, StatusCode::CREATED);
    }

    #[test]
    fn paginated_carries_metadata() {
        let page = PageRequest { page: 2, limit: 10 };
        let res = ApiResponse::paginated("ok", json!([]), page.meta(35));
        let meta = res.pagination.expect("pagination");
        assert_eq!(meta.total, 35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }
}
