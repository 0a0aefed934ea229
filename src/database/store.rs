use sqlx::postgres::{PgDatabaseError, PgRow};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::ContentStatus;

/// Typed persistence error taxonomy. Handlers and the error normalizer switch
/// on these kinds; the raw Postgres codes are interpreted in exactly one
/// place (`From<sqlx::Error>` below).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated")]
    UniqueViolation { constraint: Option<String> },

    #[error("required column missing")]
    MissingField { column: Option<String> },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    /// True when the violated constraint is a slug uniqueness backstop,
    /// which the content handlers retry once after re-resolving.
    pub fn is_slug_violation(&self) -> bool {
        match self {
            StoreError::UniqueViolation {
                constraint: Some(name),
            } => name.contains("slug"),
            _ => false,
        }
    }
}

// Postgres error class 23: integrity constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_NOT_NULL_VIOLATION: &str = "23502";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Connection(err.to_string())
            }
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => StoreError::UniqueViolation {
                    constraint: db.constraint().map(String::from),
                },
                Some(PG_NOT_NULL_VIOLATION) => StoreError::MissingField {
                    column: db
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .map(String::from),
                },
                _ => StoreError::Query(err.to_string()),
            },
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Equality filter for list/count queries. Column names are compile-time
/// constants supplied by the resource modules, never caller input.
///
/// The value is bound with its Rust type so sqlx declares the matching
/// Postgres parameter type; a `content_status` column must be filtered with
/// `Status`, not `Text`, because Postgres has no implicit text-to-enum cast.
#[derive(Debug, Clone)]
pub enum Filter {
    Text(&'static str, String),
    Bool(&'static str, bool),
    Status(&'static str, ContentStatus),
}

impl Filter {
    fn column(&self) -> &'static str {
        match self {
            Filter::Text(column, _) => column,
            Filter::Bool(column, _) => column,
            Filter::Status(column, _) => column,
        }
    }
}

/// Generic table gateway exposing the narrow set of primitives the resource
/// handlers need: find-one, bounded list, count, delete, and slug probing.
/// Inserts and updates carry per-resource column sets and live beside the
/// resource handlers.
pub struct Repository<T> {
    table: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            _marker: std::marker::PhantomData,
        }
    }

    pub async fn find_by_id(&self, pool: &PgPool, id: Uuid) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = $1", self.table);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// `find_by_id` that raises `NotFound` instead of returning `None`
    pub async fn fetch_by_id(&self, pool: &PgPool, id: Uuid) -> Result<T, StoreError> {
        self.find_by_id(pool, id).await?.ok_or(StoreError::NotFound)
    }

    pub async fn find_one_by(
        &self,
        pool: &PgPool,
        column: &'static str,
        value: &str,
    ) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE \"{}\" = $1", self.table, column);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        pool: &PgPool,
        filter: Option<&Filter>,
        order_by: &'static str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<T>, StoreError> {
        let sql = match filter {
            Some(f) => format!(
                "SELECT * FROM \"{}\" WHERE \"{}\" = $1 ORDER BY {} LIMIT $2 OFFSET $3",
                self.table,
                f.column(),
                order_by
            ),
            None => format!(
                "SELECT * FROM \"{}\" ORDER BY {} LIMIT $1 OFFSET $2",
                self.table, order_by
            ),
        };

        let query = sqlx::query_as::<_, T>(&sql);
        let query = match filter {
            Some(Filter::Text(_, value)) => query.bind(value.clone()),
            Some(Filter::Bool(_, value)) => query.bind(*value),
            Some(Filter::Status(_, value)) => query.bind(*value),
            None => query,
        };

        let rows = query.bind(limit).bind(offset).fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn count(&self, pool: &PgPool, filter: Option<&Filter>) -> Result<i64, StoreError> {
        let sql = match filter {
            Some(f) => format!(
                "SELECT COUNT(*) FROM \"{}\" WHERE \"{}\" = $1",
                self.table,
                f.column()
            ),
            None => format!("SELECT COUNT(*) FROM \"{}\"", self.table),
        };

        let query = sqlx::query_scalar::<_, i64>(&sql);
        let query = match filter {
            Some(Filter::Text(_, value)) => query.bind(value.clone()),
            Some(Filter::Bool(_, value)) => query.bind(*value),
            Some(Filter::Status(_, value)) => query.bind(*value),
            None => query,
        };

        let count = query.fetch_one(pool).await?;
        Ok(count)
    }

    pub async fn delete(&self, pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Slug existence probe used by the slug resolver, optionally excluding
    /// the record currently being edited
    pub async fn slug_exists(
        &self,
        pool: &PgPool,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let sql = match exclude {
            Some(_) => format!(
                "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE slug = $1 AND id <> $2)",
                self.table
            ),
            None => format!(
                "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE slug = $1)",
                self.table
            ),
        };

        let query = sqlx::query_scalar::<_, bool>(&sql).bind(slug);
        let query = match exclude {
            Some(id) => query.bind(id),
            None => query,
        };

        let exists = query.fetch_one(pool).await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::TypeInfo;

    #[test]
    fn status_filter_binds_the_enum_type_not_text() {
        // Postgres rejects `content_status = text`, so the status filter must
        // carry the typed value whose declared parameter type is the enum
        let info = <ContentStatus as sqlx::Type<sqlx::Postgres>>::type_info();
        assert_eq!(info.name(), "content_status");

        let filter = Filter::Status("status", ContentStatus::Published);
        assert_eq!(filter.column(), "status");
        assert!(matches!(
            filter,
            Filter::Status(_, ContentStatus::Published)
        ));
    }

    #[test]
    fn slug_violation_detection() {
        let err = StoreError::UniqueViolation {
            constraint: Some("blog_posts_slug_key".to_string()),
        };
        assert!(err.is_unique_violation());
        assert!(err.is_slug_violation());

        let err = StoreError::UniqueViolation {
            constraint: Some("accounts_email_key".to_string()),
        };
        assert!(err.is_unique_violation());
        assert!(!err.is_slug_violation());

        assert!(!StoreError::NotFound.is_slug_violation());
    }
}
