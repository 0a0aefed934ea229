pub mod accounts;
pub mod blog;
pub mod events;
pub mod ministries;
pub mod submissions;

use axum::Extension;
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::middleware::CurrentUser;

/// GET /api/auth/whoami - the authenticated principal
pub async fn whoami(Extension(user): Extension<CurrentUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(
        "Current user",
        json!({
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
            "is_active": user.is_active,
        }),
    ))
}
