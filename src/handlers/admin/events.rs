use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, PageQuery, ValidJson, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::Event;
use crate::database::store::{Repository, StoreError};
use crate::error::ApiError;
use crate::handlers::paginated_list;

fn repo() -> Repository<Event> {
    Repository::new("events")
}

/// GET /api/events
pub async fn list(ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult<Vec<Event>> {
    let pool = DatabaseManager::pool().await?;

    paginated_list(
        &repo(),
        pool,
        None,
        "starts_at ASC",
        query.resolve(),
        "Events retrieved",
    )
    .await
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(max = 200, message = "location is too long"))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// POST /api/events
pub async fn create(ValidJson(payload): ValidJson<CreateEvent>) -> ApiResult<Event> {
    if let Some(ends_at) = payload.ends_at {
        if ends_at < payload.starts_at {
            return Err(ApiError::bad_request("Event cannot end before it starts"));
        }
    }

    let pool = DatabaseManager::pool().await?;
    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (title, description, location, starts_at, ends_at) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.location)
    .bind(payload.starts_at)
    .bind(payload.ends_at)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::created("Event created", event))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "location is too long"))]
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// PUT /api/events/:id
pub async fn update(
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateEvent>,
) -> ApiResult<Event> {
    let pool = DatabaseManager::pool().await?;
    let existing = repo().fetch_by_id(pool, id).await?;

    let title = payload.title.unwrap_or(existing.title);
    let description = payload.description.unwrap_or(existing.description);
    let location = payload.location.or(existing.location);
    let starts_at = payload.starts_at.unwrap_or(existing.starts_at);
    let ends_at = payload.ends_at.or(existing.ends_at);

    if let Some(ends_at) = ends_at {
        if ends_at < starts_at {
            return Err(ApiError::bad_request("Event cannot end before it starts"));
        }
    }

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET title = $2, description = $3, location = $4, starts_at = $5, \
         ends_at = $6, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&title)
    .bind(&description)
    .bind(&location)
    .bind(starts_at)
    .bind(ends_at)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(ApiResponse::success("Event updated", event))
}

/// DELETE /api/events/:id
pub async fn delete(ValidPath(id): ValidPath<Uuid>) -> ApiResult<serde_json::Value> {
    let pool = DatabaseManager::pool().await?;
    repo().delete(pool, id).await?;
    Ok(ApiResponse::success(
        "Event deleted",
        serde_json::json!({ "id": id }),
    ))
}
