use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, PageQuery, ValidJson, ValidPath, ValidQuery};
use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Account, Role};
use crate::database::store::{Repository, StoreError};
use crate::handlers::paginated_list;

fn repo() -> Repository<Account> {
    Repository::new("accounts")
}

/// GET /api/accounts - super-admin only
pub async fn list(ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult<Vec<Account>> {
    let pool = DatabaseManager::pool().await?;

    paginated_list(
        &repo(),
        pool,
        None,
        "created_at ASC",
        query.resolve(),
        "Accounts retrieved",
    )
    .await
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccount {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub role: Option<Role>,
}

/// POST /api/accounts - register a staff account
pub async fn create(ValidJson(payload): ValidJson<CreateAccount>) -> ApiResult<Account> {
    let pool = DatabaseManager::pool().await?;
    let password_hash = auth::hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::Standard);

    let result = sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (email, password_hash, name, role) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.name)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from);

    let account = match result {
        Err(e) if e.is_unique_violation() => {
            return Err(crate::error::ApiError::conflict(
                "An account with this email already exists",
            ))
        }
        other => other?,
    };

    tracing::info!(account_id = %account.id, "account created");
    Ok(ApiResponse::created("Account created", account))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccount {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// PUT /api/accounts/:id
pub async fn update(
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateAccount>,
) -> ApiResult<Account> {
    let pool = DatabaseManager::pool().await?;
    let existing = repo().fetch_by_id(pool, id).await?;

    let name = payload.name.unwrap_or(existing.name);
    let role = payload.role.unwrap_or(existing.role);
    let is_active = payload.is_active.unwrap_or(existing.is_active);
    let password_hash = match &payload.password {
        Some(password) => auth::hash_password(password)?,
        None => existing.password_hash,
    };

    let account = sqlx::query_as::<_, Account>(
        "UPDATE accounts SET name = $2, password_hash = $3, role = $4, is_active = $5, \
         updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&name)
    .bind(&password_hash)
    .bind(role)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::success("Account updated", account))
}

/// DELETE /api/accounts/:id - deactivates; account rows are never removed
pub async fn deactivate(ValidPath(id): ValidPath<Uuid>) -> ApiResult<Account> {
    let pool = DatabaseManager::pool().await?;

    let account = sqlx::query_as::<_, Account>(
        "UPDATE accounts SET is_active = false, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    tracing::info!(account_id = %account.id, "account deactivated");
    Ok(ApiResponse::success("Account deactivated", account))
}
