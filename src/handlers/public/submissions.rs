use serde::Deserialize;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, ValidJson};
use crate::database::manager::DatabaseManager;
use crate::database::models::{ContactMessage, PrayerRequest};
use crate::database::store::StoreError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePrayerRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "request is required"))]
    pub request: String,
}

/// POST /prayer-requests - public submission, no auth
pub async fn create_prayer_request(
    ValidJson(payload): ValidJson<CreatePrayerRequest>,
) -> ApiResult<PrayerRequest> {
    let pool = DatabaseManager::pool().await?;

    let request = sqlx::query_as::<_, PrayerRequest>(
        "INSERT INTO prayer_requests (name, email, request) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.request)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::created("Prayer request submitted", request))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactMessage {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "message is required"))]
    pub message: String,
}

/// POST /contact - public submission, no auth
pub async fn create_contact_message(
    ValidJson(payload): ValidJson<CreateContactMessage>,
) -> ApiResult<ContactMessage> {
    let pool = DatabaseManager::pool().await?;

    let message = sqlx::query_as::<_, ContactMessage>(
        "INSERT INTO contact_messages (name, email, subject, message) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.subject)
    .bind(&payload.message)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::created("Message received", message))
}
