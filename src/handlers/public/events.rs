use uuid::Uuid;

use crate::api::{ApiResponse, ApiResult, PageQuery, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::Event;
use crate::database::store::Repository;
use crate::handlers::paginated_list;

fn repo() -> Repository<Event> {
    Repository::new("events")
}

/// GET /events - events, soonest first
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

/// GET /events/:id - a single event
pub async fn get(ValidPath(id): ValidPath<Uuid>) -> ApiResult<Event> {
    let pool = DatabaseManager::pool().await?;
    let event = repo().fetch_by_id(pool, id).await?;
    Ok(ApiResponse::success("Event retrieved", event))
}
