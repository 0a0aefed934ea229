use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, PageRequest, ValidJson, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::{BlogPost, ContentStatus};
use crate::database::store::{Filter, Repository, StoreError};
use crate::handlers::paginated_list;
use crate::services::slug::{self, TableProbe};

fn repo() -> Repository<BlogPost> {
    Repository::new("blog_posts")
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlogListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<ContentStatus>,
}

/// GET /api/blog - all posts regardless of status, optional status filter
pub async fn list(ValidQuery(query): ValidQuery<BlogListQuery>) -> ApiResult<Vec<BlogPost>> {
    let pool = DatabaseManager::pool().await?;
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
    let filter = query.status.map(|s| Filter::Status("status", s));

    paginated_list(
        &repo(),
        pool,
        filter,
        "created_at DESC",
        page,
        "Blog posts retrieved",
    )
    .await
}

/// GET /api/blog/:id
pub async fn get(ValidPath(id): ValidPath<Uuid>) -> ApiResult<BlogPost> {
    let pool = DatabaseManager::pool().await?;
    let post = repo().fetch_by_id(pool, id).await?;
    Ok(ApiResponse::success("Blog post retrieved", post))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogPost {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    /// Explicit slug candidate; derived from the title when absent
    #[validate(length(min = 1, max = 200, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "excerpt is too long"))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
    pub status: Option<ContentStatus>,
}

/// POST /api/blog - create with a resolved-unique slug.
///
/// The resolver's probe and the insert are not atomic; when a concurrent
/// create commits the same slug first, the insert hits the UNIQUE backstop
/// and we re-resolve and retry exactly once.
pub async fn create(ValidJson(payload): ValidJson<CreateBlogPost>) -> ApiResult<BlogPost> {
    let pool = DatabaseManager::pool().await?;
    let repo = repo();
    let probe = TableProbe { repo: &repo, pool };

    let base = payload.slug.as_deref().unwrap_or(&payload.title);
    let status = payload.status.unwrap_or(ContentStatus::Draft);

    let slug = slug::resolve_unique(&probe, base, None).await?;
    let post = match insert_post(pool, &payload, &slug, status).await {
        Err(e) if e.is_slug_violation() => {
            let slug = slug::resolve_unique(&probe, base, None).await?;
            insert_post(pool, &payload, &slug, status).await?
        }
        other => other?,
    };

    Ok(ApiResponse::created("Blog post created", post))
}

async fn insert_post(
    pool: &PgPool,
    payload: &CreateBlogPost,
    slug: &str,
    status: ContentStatus,
) -> Result<BlogPost, StoreError> {
    let published_at = (status == ContentStatus::Published).then(Utc::now);

    let post = sqlx::query_as::<_, BlogPost>(
        "INSERT INTO blog_posts (title, slug, excerpt, body, status, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&payload.title)
    .bind(slug)
    .bind(&payload.excerpt)
    .bind(&payload.body)
    .bind(status)
    .bind(published_at)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBlogPost {
    #[validate(length(min = 1, max = 200, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "excerpt is too long"))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: Option<String>,
    pub status: Option<ContentStatus>,
}

/// PUT /api/blog/:id - the slug is re-resolved only when the title or slug
/// fields change, excluding the record itself from collision probing
pub async fn update(
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateBlogPost>,
) -> ApiResult<BlogPost> {
    let pool = DatabaseManager::pool().await?;
    let repo = repo();
    let existing = repo.fetch_by_id(pool, id).await?;

    let title = payload.title.clone().unwrap_or(existing.title);
    let excerpt = payload.excerpt.clone().or(existing.excerpt);
    let body = payload.body.clone().unwrap_or(existing.body);
    let status = payload.status.unwrap_or(existing.status);

    let published_at = match (existing.published_at, status) {
        (Some(at), ContentStatus::Published) => Some(at),
        (None, ContentStatus::Published) => Some(Utc::now()),
        (_, ContentStatus::Draft) => None,
    };

    // Slug only moves on explicit edit of the title or slug fields
    let slug_base = match (&payload.slug, &payload.title) {
        (Some(slug), _) => Some(slug.clone()),
        (None, Some(_)) => Some(title.clone()),
        (None, None) => None,
    };

    let probe = TableProbe { repo: &repo, pool };
    let slug = match &slug_base {
        Some(base) => slug::resolve_unique(&probe, base, Some(id)).await?,
        None => existing.slug,
    };

    let updated = match update_post(pool, id, &title, &slug, &excerpt, &body, status, published_at)
        .await
    {
        Err(e) if e.is_slug_violation() => {
            let base = slug_base.as_deref().unwrap_or(&slug);
            let slug = slug::resolve_unique(&probe, base, Some(id)).await?;
            update_post(pool, id, &title, &slug, &excerpt, &body, status, published_at).await?
        }
        other => other?,
    };

    Ok(ApiResponse::success("Blog post updated", updated))
}

#[allow(clippy::too_many_arguments)]
async fn update_post(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    slug: &str,
    excerpt: &Option<String>,
    body: &str,
    status: ContentStatus,
    published_at: Option<chrono::DateTime<Utc>>,
) -> Result<BlogPost, StoreError> {
    let post = sqlx::query_as::<_, BlogPost>(
        "UPDATE blog_posts SET title = $2, slug = $3, excerpt = $4, body = $5, \
         status = $6, published_at = $7, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(slug)
    .bind(excerpt)
    .bind(body)
    .bind(status)
    .bind(published_at)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// DELETE /api/blog/:id
pub async fn delete(ValidPath(id): ValidPath<Uuid>) -> ApiResult<serde_json::Value> {
    let pool = DatabaseManager::pool().await?;
    repo().delete(pool, id).await?;
    Ok(ApiResponse::success(
        "Blog post deleted",
        serde_json::json!({ "id": id }),
    ))
}
