pub mod admin;
pub mod public;

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::api::{ApiResponse, ApiResult, PageRequest};
use crate::database::store::{Filter, Repository};

/// Shared list stage for every paginated resource: count, bounded fetch,
/// envelope with metadata. Resource handlers differ only in table, filter,
/// and ordering.
pub(crate) async fn paginated_list<T>(
    repo: &Repository<T>,
    pool: &PgPool,
    filter: Option<Filter>,
    order_by: &'static str,
    page: PageRequest,
    message: &str,
) -> ApiResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    let total = repo.count(pool, filter.as_ref()).await?;
    let rows = repo
        .list(pool, filter.as_ref(), order_by, page.limit, page.offset())
        .await?;

    Ok(ApiResponse::paginated(message, rows, page.meta(total)))
}
