use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Account, Role};
use crate::database::store::Repository;
use crate::error::ApiError;

/// Message shared by every authentication failure sub-case. Callers learn
/// nothing about which check failed.
const UNAUTHORIZED_MSG: &str = "Authentication required";

/// Authenticated principal attached to the request after token verification
/// and account lookup
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<Account> for CurrentUser {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            is_active: account.is_active,
        }
    }
}

/// Bearer-token authentication middleware.
///
/// Verifies the token, loads the account, and rejects unknown or inactive
/// subjects. Re-verifies on every request; no caching, one store read per
/// call.
pub async fn authenticate(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MSG))?;

    let claims =
        auth::verify_token(&token).map_err(|_| ApiError::unauthorized(UNAUTHORIZED_MSG))?;

    let pool = DatabaseManager::pool().await?;
    let account = Repository::<Account>::new("accounts")
        .find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MSG))?;

    // Inactive accounts never authenticate, token validity notwithstanding
    if !account.is_active {
        tracing::warn!(account_id = %account.id, "rejected token for inactive account");
        return Err(ApiError::unauthorized(UNAUTHORIZED_MSG));
    }

    request.extensions_mut().insert(CurrentUser::from(account));
    Ok(next.run(request).await)
}

/// Extract the bearer token from the conventional Authorization header.
/// Absence is a normal input, not an error.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            extract_bearer(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_is_none() {
        assert_eq!(extract_bearer(&headers_with("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn empty_token_is_none() {
        assert_eq!(extract_bearer(&headers_with("Bearer   ")), None);
    }
}
