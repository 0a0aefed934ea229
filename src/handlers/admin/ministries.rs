use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiResponse, ApiResult, PageQuery, ValidJson, ValidPath, ValidQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::Ministry;
use crate::database::store::{Repository, StoreError};
use crate::handlers::paginated_list;
use crate::services::slug::{self, TableProbe};

fn repo() -> Repository<Ministry> {
    Repository::new("ministries")
}

/// GET /api/ministries - all ministries including inactive
pub async fn list(ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult<Vec<Ministry>> {
    let pool = DatabaseManager::pool().await?;

    paginated_list(
        &repo(),
        pool,
        None,
        "name ASC",
        query.resolve(),
        "Ministries retrieved",
    )
    .await
}

/// GET /api/ministries/:id
pub async fn get(ValidPath(id): ValidPath<Uuid>) -> ApiResult<Ministry> {
    let pool = DatabaseManager::pool().await?;
    let ministry = repo().fetch_by_id(pool, id).await?;
    Ok(ApiResponse::success("Ministry retrieved", ministry))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMinistry {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(max = 100, message = "leader name is too long"))]
    pub leader: Option<String>,
    pub is_active: Option<bool>,
}

/// POST /api/ministries
pub async fn create(ValidJson(payload): ValidJson<CreateMinistry>) -> ApiResult<Ministry> {
    let pool = DatabaseManager::pool().await?;
    let repo = repo();
    let probe = TableProbe { repo: &repo, pool };

    let base = payload.slug.as_deref().unwrap_or(&payload.name);
    let slug = slug::resolve_unique(&probe, base, None).await?;

    let ministry = match insert_ministry(pool, &payload, &slug).await {
        Err(e) if e.is_slug_violation() => {
            let slug = slug::resolve_unique(&probe, base, None).await?;
            insert_ministry(pool, &payload, &slug).await?
        }
        other => other?,
    };

    Ok(ApiResponse::created("Ministry created", ministry))
}

async fn insert_ministry(
    pool: &PgPool,
    payload: &CreateMinistry,
    slug: &str,
) -> Result<Ministry, StoreError> {
    let ministry = sqlx::query_as::<_, Ministry>(
        "INSERT INTO ministries (name, slug, description, leader, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&payload.name)
    .bind(slug)
    .bind(&payload.description)
    .bind(&payload.leader)
    .bind(payload.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;

    Ok(ministry)
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMinistry {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "leader name is too long"))]
    pub leader: Option<String>,
    pub is_active: Option<bool>,
}

/// PUT /api/ministries/:id
pub async fn update(
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateMinistry>,
) -> ApiResult<Ministry> {
    let pool = DatabaseManager::pool().await?;
    let repo = repo();
    let existing = repo.fetch_by_id(pool, id).await?;

    let name = payload.name.clone().unwrap_or(existing.name);
    let description = payload.description.clone().unwrap_or(existing.description);
    let leader = payload.leader.clone().or(existing.leader);
    let is_active = payload.is_active.unwrap_or(existing.is_active);

    let slug_base = match (&payload.slug, &payload.name) {
        (Some(slug), _) => Some(slug.clone()),
        (None, Some(_)) => Some(name.clone()),
        (None, None) => None,
    };

    let probe = TableProbe { repo: &repo, pool };
    let slug = match &slug_base {
        Some(base) => slug::resolve_unique(&probe, base, Some(id)).await?,
        None => existing.slug,
    };

    let updated =
        match update_ministry(pool, id, &name, &slug, &description, &leader, is_active).await {
            Err(e) if e.is_slug_violation() => {
                let base = slug_base.as_deref().unwrap_or(&slug);
                let slug = slug::resolve_unique(&probe, base, Some(id)).await?;
                update_ministry(pool, id, &name, &slug, &description, &leader, is_active).await?
            }
            other => other?,
        };

    Ok(ApiResponse::success("Ministry updated", updated))
}

async fn update_ministry(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    slug: &str,
    description: &str,
    leader: &Option<String>,
    is_active: bool,
) -> Result<Ministry, StoreError> {
    let ministry = sqlx::query_as::<_, Ministry>(
        "UPDATE ministries SET name = $2, slug = $3, description = $4, leader = $5, \
         is_active = $6, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .bind(description)
    .bind(leader)
    .bind(is_active)
    .fetch_one(pool)
    .await?;

    Ok(ministry)
}

/// DELETE /api/ministries/:id
pub async fn delete(ValidPath(id): ValidPath<Uuid>) -> ApiResult<serde_json::Value> {
    let pool = DatabaseManager::pool().await?;
    repo().delete(pool, id).await?;
    Ok(ApiResponse::success(
        "Ministry deleted",
        serde_json::json!({ "id": id }),
    ))
}
