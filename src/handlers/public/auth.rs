use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, ValidJson};
use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::Account;
use crate::database::store::Repository;
use crate::error::ApiError;

/// One message for every credential failure: unknown email, wrong password,
/// inactive account. Nothing leaks about which check failed.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// POST /auth/login - verify credentials and issue a bearer token
pub async fn login(ValidJson(payload): ValidJson<LoginRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let account = Repository::<Account>::new("accounts")
        .find_one_by(pool, "email", &payload.email)
        .await?;

    let (account, token) = verify_login(account, &payload.password)?;
    tracing::info!(account_id = %account.id, "login successful");

    Ok(ApiResponse::success(
        "Login successful",
        login_data(&account, &token),
    ))
}

/// Credential checks and token issuance, after the account lookup. Every
/// failure branch returns the same 401 so callers cannot distinguish an
/// unknown email from a wrong password or a deactivated account.
fn verify_login(account: Option<Account>, password: &str) -> Result<(Account, String), ApiError> {
    let account = account.ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    if !account.is_active {
        tracing::warn!(account_id = %account.id, "login attempt for inactive account");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    if !auth::verify_password(password, &account.password_hash)? {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = auth::generate_token(account.id)?;
    Ok((account, token))
}

fn login_data(account: &Account, token: &str) -> Value {
    json!({
        "token": token,
        "user": {
            "id": account.id,
            "email": account.email,
            "name": account.name,
            "role": account.role,
        },
        "expires_in": auth::expires_in_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use axum::http::StatusCode;
    use chrono::Utc;
    use uuid::Uuid;

    fn account_with_password(password: &str, is_active: bool) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "staff@campus.example.org".to_string(),
            password_hash: auth::hash_password(password).unwrap(),
            name: "Staff".to_string(),
            role: Role::Admin,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn correct_password_issues_a_token_for_the_account() {
        let account = account_with_password("hunter2-hunter2", true);
        let id = account.id;

        let (account, token) = verify_login(Some(account), "hunter2-hunter2").unwrap();
        let claims = auth::verify_token(&token).unwrap();
        assert_eq!(claims.sub, id);

        let data = login_data(&account, &token);
        assert_eq!(data["token"], json!(token));
        assert_eq!(data["user"]["id"], json!(id));
    }

    #[test]
    fn wrong_password_is_unauthorized_with_no_token() {
        let account = account_with_password("hunter2-hunter2", true);

        let err = verify_login(Some(account), "not-the-password").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.to_json().get("token").is_none());
    }

    #[test]
    fn inactive_account_is_unauthorized_even_with_the_right_password() {
        let account = account_with_password("hunter2-hunter2", false);

        let err = verify_login(Some(account), "hunter2-hunter2").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unknown_email_fails_with_the_same_message_as_a_wrong_password() {
        let missing = verify_login(None, "whatever").unwrap_err();
        let account = account_with_password("hunter2-hunter2", true);
        let wrong = verify_login(Some(account), "whatever").unwrap_err();

        assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.to_json()["message"], wrong.to_json()["message"]);
    }
}
