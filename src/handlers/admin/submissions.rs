use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, PageQuery, PageRequest, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::{ContactMessage, PrayerRequest};
use crate::database::store::{Filter, Repository, StoreError};
use crate::handlers::paginated_list;

fn prayer_repo() -> Repository<PrayerRequest> {
    Repository::new("prayer_requests")
}

fn contact_repo() -> Repository<ContactMessage> {
    Repository::new("contact_messages")
}

#[derive(Debug, Deserialize, Validate)]
pub struct PrayerListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub reviewed: Option<bool>,
}

/// GET /api/prayer-requests - newest first, optional reviewed filter
pub async fn list_prayer_requests(
    ValidQuery(query): ValidQuery<PrayerListQuery>,
) -> ApiResult<Vec<PrayerRequest>> {
    let pool = DatabaseManager::pool().await?;
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    let filter = query.reviewed.map(|r| Filter::Bool("is_reviewed", r));

    paginated_list(
        &prayer_repo(),
        pool,
        filter,
        "created_at DESC",
        page,
        "Prayer requests retrieved",
    )
    .await
}

/// PATCH /api/prayer-requests/:id/review - mark as reviewed
pub async fn review_prayer_request(ValidPath(id): ValidPath<Uuid>) -> ApiResult<PrayerRequest> {
    let pool = DatabaseManager::pool().await?;

    let request = sqlx::query_as::<_, PrayerRequest>(
        "UPDATE prayer_requests SET is_reviewed = true WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::success("Prayer request reviewed", request))
}

/// DELETE /api/prayer-requests/:id
pub async fn delete_prayer_request(ValidPath(id): ValidPath<Uuid>) -> ApiResult<serde_json::Value> {
    let pool = DatabaseManager::pool().await?;
    prayer_repo().delete(pool, id).await?;
    Ok(ApiResponse::success(
        "Prayer request deleted",
        serde_json::json!({ "id": id }),
    ))
}

/// GET /api/contact - newest first
pub async fn list_contact_messages(
    ValidQuery(query): ValidQuery<PageQuery>,
) -> ApiResult<Vec<ContactMessage>> {
    let pool = DatabaseManager::pool().await?;

    paginated_list(
        &contact_repo(),
        pool,
        None,
        "created_at DESC",
        query.resolve(),
        "Contact messages retrieved",
    )
    .await
}

/// PATCH /api/contact/:id/read - mark as read
pub async fn read_contact_message(ValidPath(id): ValidPath<Uuid>) -> ApiResult<ContactMessage> {
    let pool = DatabaseManager::pool().await?;

    let message = sqlx::query_as::<_, ContactMessage>(
        "UPDATE contact_messages SET is_read = true WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::success("Contact message read", message))
}

/// DELETE /api/contact/:id
pub async fn delete_contact_message(ValidPath(id): ValidPath<Uuid>) -> ApiResult<serde_json::Value> {
    let pool = DatabaseManager::pool().await?;
    contact_repo().delete(pool, id).await?;
    Ok(ApiResponse::success(
        "Contact message deleted",
        serde_json::json!({ "id": id }),
    ))
}
