use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use campus_api::database::manager::DatabaseManager;
use campus_api::handlers::{admin, public};
use campus_api::middleware::{authenticate, require_admin, require_super_admin};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=info,tower_http=info".into()),
        )
        .init();

    let config = campus_api::config::config();
    tracing::info!("starting campus API in {:?} mode", config.environment);

    let app = app();

    let port = std::env::var("CAMPUS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(admin_routes())
        .merge(account_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route("/auth/login", post(public::auth::login))
        .route("/blog", get(public::blog::list))
        .route("/blog/:slug", get(public::blog::get))
        .route("/ministries", get(public::ministries::list))
        .route("/ministries/:slug", get(public::ministries::get))
        .route("/events", get(public::events::list))
        .route("/events/:id", get(public::events::get))
        .route("/prayer-requests", post(public::submissions::create_prayer_request))
        .route("/contact", post(public::submissions::create_contact_message))
}

/// Admin surface: every route gated by Authenticator then "requires admin".
/// The pipeline order is fixed here, once, for the whole group.
fn admin_routes() -> Router {
    use axum::routing::{delete, patch};

    Router::new()
        .route("/api/auth/whoami", get(admin::whoami))
        .route("/api/blog", get(admin::blog::list).post(admin::blog::create))
        .route(
            "/api/blog/:id",
            get(admin::blog::get)
                .put(admin::blog::update)
                .delete(admin::blog::delete),
        )
        .route(
            "/api/ministries",
            get(admin::ministries::list).post(admin::ministries::create),
        )
        .route(
            "/api/ministries/:id",
            get(admin::ministries::get)
                .put(admin::ministries::update)
                .delete(admin::ministries::delete),
        )
        .route(
            "/api/events",
            get(admin::events::list).post(admin::events::create),
        )
        .route(
            "/api/events/:id",
            axum::routing::put(admin::events::update).delete(admin::events::delete),
        )
        .route(
            "/api/prayer-requests",
            get(admin::submissions::list_prayer_requests),
        )
        .route(
            "/api/prayer-requests/:id/review",
            patch(admin::submissions::review_prayer_request),
        )
        .route(
            "/api/prayer-requests/:id",
            delete(admin::submissions::delete_prayer_request),
        )
        .route("/api/contact", get(admin::submissions::list_contact_messages))
        .route(
            "/api/contact/:id/read",
            patch(admin::submissions::read_contact_message),
        )
        .route(
            "/api/contact/:id",
            delete(admin::submissions::delete_contact_message),
        )
        // The later-added layer wraps the earlier one: authenticate runs
        // before the role gate
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn(authenticate))
}

/// Account management is super-admin only
fn account_routes() -> Router {
    use axum::routing::put;

    Router::new()
        .route(
            "/api/accounts",
            get(admin::accounts::list).post(admin::accounts::create),
        )
        .route(
            "/api/accounts/:id",
            put(admin::accounts::update).delete(admin::accounts::deactivate),
        )
        .route_layer(from_fn(require_super_admin))
        .route_layer(from_fn(authenticate))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "message": "Campus API",
        "data": {
            "name": "Campus API",
            "version": version,
            "endpoints": {
                "public": "/blog, /ministries, /events (read), /prayer-requests, /contact (submit)",
                "auth": "/auth/login (public - token acquisition)",
                "admin": "/api/* (requires admin role)",
                "accounts": "/api/accounts (requires super-admin role)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "message": "ok",
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "database_error": e.to_string() }
            })),
        ),
    }
}
