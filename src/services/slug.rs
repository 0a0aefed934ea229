use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::{Repository, StoreError};

/// Existence probe against a content table's slug column. The resolver only
/// reads; the caller commits the returned slug with its own insert or update.
#[async_trait]
pub trait SlugProbe {
    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, StoreError>;
}

/// `SlugProbe` backed by a table repository
pub struct TableProbe<'a, T> {
    pub repo: &'a Repository<T>,
    pub pool: &'a PgPool,
}

#[async_trait]
impl<'a, T> SlugProbe for TableProbe<'a, T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin,
{
    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        self.repo.slug_exists(self.pool, slug, exclude).await
    }
}

/// Lossy transform of a human title into a URL-safe slug: lowercase, strip
/// anything outside `[a-z0-9 -]`, collapse whitespace runs to single hyphens,
/// collapse repeated hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut last_hyphen = true; // suppress leading hyphens

    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                slug.push(c);
                last_hyphen = false;
            }
            c if c.is_whitespace() || c == '-' => {
                if !last_hyphen {
                    slug.push('-');
                    last_hyphen = true;
                }
            }
            _ => {}
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Resolve a slug guaranteed free at the instant of probing: try the
/// normalized base, then `base-1`, `base-2`, ... until no collision remains.
/// `exclude` skips the record currently being edited.
///
/// Two concurrent resolutions of the same base can still race; the table's
/// UNIQUE constraint is the backstop, and callers retry once on a late slug
/// violation.
pub async fn resolve_unique<P: SlugProbe + Sync>(
    probe: &P,
    base: &str,
    exclude: Option<Uuid>,
) -> Result<String, StoreError> {
    let base = slugify(base);
    let base = if base.is_empty() {
        // A title with no sluggable characters still needs an address
        Uuid::new_v4().simple().to_string()
    } else {
        base
    };

    if !probe.slug_exists(&base, exclude).await? {
        return Ok(base);
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !probe.slug_exists(&candidate, exclude).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory slug table: slug -> owning record id
    struct MemoryProbe {
        slugs: HashMap<String, Uuid>,
    }

    impl MemoryProbe {
        fn new(entries: &[(&str, Uuid)]) -> Self {
            Self {
                slugs: entries
                    .iter()
                    .map(|(s, id)| (s.to_string(), *id))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SlugProbe for MemoryProbe {
        async fn slug_exists(
            &self,
            slug: &str,
            exclude: Option<Uuid>,
        ) -> Result<bool, StoreError> {
            Ok(self
                .slugs
                .get(slug)
                .map(|owner| Some(*owner) != exclude)
                .unwrap_or(false))
        }
    }

    #[test]
    fn slugify_normalizes_titles() {
        assert_eq!(slugify("Easter Service"), "easter-service");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Fall Retreat 2026"), "fall-retreat-2026");
        assert_eq!(slugify("a--b---c"), "a-b-c");
        assert_eq!(slugify("Café & Crêpes"), "caf-crpes");
        assert_eq!(slugify("---trim---"), "trim");
    }

    #[test]
    fn slugify_empty_input_yields_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[tokio::test]
    async fn free_base_is_returned_unchanged() {
        let probe = MemoryProbe::new(&[]);
        let slug = resolve_unique(&probe, "Easter Service", None).await.unwrap();
        assert_eq!(slug, "easter-service");
    }

    #[tokio::test]
    async fn collision_appends_incrementing_suffix() {
        let probe = MemoryProbe::new(&[("easter-service", Uuid::new_v4())]);
        let slug = resolve_unique(&probe, "Easter Service", None).await.unwrap();
        assert_eq!(slug, "easter-service-1");
    }

    #[tokio::test]
    async fn suffix_skips_taken_candidates() {
        let probe = MemoryProbe::new(&[
            ("easter-service", Uuid::new_v4()),
            ("easter-service-1", Uuid::new_v4()),
        ]);
        let slug = resolve_unique(&probe, "Easter Service", None).await.unwrap();
        assert_eq!(slug, "easter-service-2");
    }

    #[tokio::test]
    async fn editing_a_record_keeps_its_own_slug() {
        let id = Uuid::new_v4();
        let probe = MemoryProbe::new(&[
            ("easter-service", Uuid::new_v4()),
            ("easter-service-1", id),
        ]);
        // Re-resolving for the record that owns easter-service-1 keeps it
        let slug = resolve_unique(&probe, "easter-service-1", Some(id))
            .await
            .unwrap();
        assert_eq!(slug, "easter-service-1");
    }

    #[tokio::test]
    async fn unsluggable_title_falls_back_to_generated_slug() {
        let probe = MemoryProbe::new(&[]);
        let slug = resolve_unique(&probe, "!!!", None).await.unwrap();
        assert!(!slug.is_empty());
    }
}
