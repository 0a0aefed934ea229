// Scenario tests for the pure pieces of the request pipeline: pagination
// resolution, slug uniqueness, token round trips, and envelope shapes.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use campus_api::api::PageRequest;
use campus_api::auth;
use campus_api::database::store::StoreError;
use campus_api::services::slug::{resolve_unique, SlugProbe};

/// Slug table standing in for a content table, tracking committed slugs
struct SlugSet {
    slugs: Mutex<HashSet<String>>,
}

impl SlugSet {
    fn new() -> Self {
        Self {
            slugs: Mutex::new(HashSet::new()),
        }
    }

    fn commit(&self, slug: &str) {
        self.slugs.lock().unwrap().insert(slug.to_string());
    }
}

#[async_trait]
impl SlugProbe for SlugSet {
    async fn slug_exists(&self, slug: &str, _exclude: Option<Uuid>) -> Result<bool, StoreError> {
        Ok(self.slugs.lock().unwrap().contains(slug))
    }
}

#[tokio::test]
async fn colliding_titles_get_incrementing_slugs() -> Result<()> {
    let table = SlugSet::new();

    let first = resolve_unique(&table, "Easter Service", None).await?;
    assert_eq!(first, "easter-service");
    table.commit(&first);

    let second = resolve_unique(&table, "Easter Service", None).await?;
    assert_eq!(second, "easter-service-1");
    table.commit(&second);

    let third = resolve_unique(&table, "Easter Service", None).await?;
    assert_eq!(third, "easter-service-2");
    Ok(())
}

#[test]
fn hostile_pagination_input_is_clamped_not_rejected() {
    // page=0&limit=500 resolves to page=1, limit=100
    let req = PageRequest::from_raw(Some("0"), Some("500"));
    assert_eq!(req, PageRequest { page: 1, limit: 100 });

    let req = PageRequest::from_raw(Some("banana"), Some("-1"));
    assert_eq!(req, PageRequest { page: 1, limit: 1 });
}

#[test]
fn pagination_metadata_is_internally_consistent() {
    for (total, page, limit) in [(0, 1, 10), (1, 1, 1), (35, 2, 10), (100, 10, 10), (7, 9, 3)] {
        let req = PageRequest { page, limit };
        let meta = req.meta(total);
        let expected_pages = (total + limit - 1) / limit;
        assert_eq!(meta.total_pages, expected_pages);
        assert_eq!(meta.has_next, page < expected_pages);
        assert_eq!(meta.has_prev, page > 1);
    }
}

#[test]
fn issued_token_decodes_to_its_subject() {
    let account_id = Uuid::new_v4();
    let token = auth::generate_token(account_id).expect("token");
    let claims = auth::verify_token(&token).expect("claims");
    assert_eq!(claims.sub, account_id);
}

#[test]
fn foreign_token_is_rejected() {
    // Signed under a different secret than the configured one
    let other_key = jsonwebtoken::EncodingKey::from_secret(b"some-other-secret");
    let claims = serde_json::json!({
        "sub": Uuid::new_v4(),
        "iat": chrono::Utc::now().timestamp(),
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    let token =
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &other_key).unwrap();

    assert!(auth::verify_token(&token).is_err());
}

#[test]
fn error_envelopes_always_carry_success_false() {
    use campus_api::error::ApiError;

    for err in [
        ApiError::unauthorized("no"),
        ApiError::forbidden("no"),
        ApiError::not_found("no"),
        ApiError::conflict("no"),
        ApiError::bad_request("no"),
    ] {
        let status = err.status_code();
        let body = err.to_json();
        assert!(!status.is_success());
        assert_eq!(body["success"], serde_json::json!(false));
        assert!(body["message"].is_string());
    }
}
