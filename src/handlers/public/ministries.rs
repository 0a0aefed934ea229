use crate::api::{ApiResponse, ApiResult, PageQuery, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::Ministry;
use crate::database::store::{Filter, Repository};
use crate::error::ApiError;
use crate::handlers::paginated_list;

fn repo() -> Repository<Ministry> {
    Repository::new("ministries")
}

/// GET /ministries - active ministries, alphabetical
pub async fn list(ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult<Vec<Ministry>> {
    let pool = DatabaseManager::pool().await?;

    paginated_list(
        &repo(),
        pool,
        Some(Filter::Bool("is_active", true)),
        "name ASC",
        query.resolve(),
        "Ministries retrieved",
    )
    .await
}

/// GET /ministries/:slug - a single active ministry
pub async fn get(ValidPath(slug): ValidPath<String>) -> ApiResult<Ministry> {
    let pool = DatabaseManager::pool().await?;
    let ministry = repo()
        .find_one_by(pool, "slug", &slug)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| ApiError::not_found("Ministry not found"))?;

    Ok(ApiResponse::success("Ministry retrieved", ministry))
}
