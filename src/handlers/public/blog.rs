use crate::api::{ApiResponse, ApiResult, PageQuery, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::{BlogPost, ContentStatus};
use crate::database::store::{Filter, Repository};
use crate::error::ApiError;
use crate::handlers::paginated_list;

fn repo() -> Repository<BlogPost> {
    Repository::new("blog_posts")
}

/// GET /blog - published posts, newest first
pub async fn list(ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult<Vec<BlogPost>> {
    let pool = DatabaseManager::pool().await?;
    let filter = Filter::Status("status", ContentStatus::Published);

    paginated_list(
        &repo(),
        pool,
        Some(filter),
        "published_at DESC NULLS LAST",
        query.resolve(),
        "Blog posts retrieved",
    )
    .await
}

/// GET /blog/:slug - a single published post
pub async fn get(ValidPath(slug): ValidPath<String>) -> ApiResult<BlogPost> {
    let pool = DatabaseManager::pool().await?;
    let post = repo()
        .find_one_by(pool, "slug", &slug)
        .await?
        .filter(|p| p.status == ContentStatus::Published)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    Ok(ApiResponse::success("Blog post retrieved", post))
}
