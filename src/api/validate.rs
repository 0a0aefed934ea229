use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body extractor that runs the endpoint's declared schema before the
/// handler body executes. The schema is the DTO's `Validate` derive, fixed at
/// composition time; a failure yields a 400 with field-level details and the
/// handler never runs.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_json(e.body_text()))?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Query-string counterpart of `ValidJson`
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        value.validate()?;
        Ok(ValidQuery(value))
    }
}

/// Path-parameter extractor whose rejection goes through the error
/// normalizer. A malformed id yields the standard `{success:false, message}`
/// 400 body instead of axum's plain-text default.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Ok(ValidPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Submission {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(email(message = "must be a valid email address"))]
        email: String,
    }

    #[test]
    fn validation_failure_produces_field_details() {
        let submission = Submission {
            name: String::new(),
            email: "not-an-email".to_string(),
        };
        let err: ApiError = submission.validate().unwrap_err().into();

        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details.get("name").unwrap(), "name is required");
                assert_eq!(details.get("email").unwrap(), "must be a valid email address");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_input_passes() {
        let submission = Submission {
            name: "Jordan".to_string(),
            email: "jordan@example.org".to_string(),
        };
        assert!(submission.validate().is_ok());
    }
}
