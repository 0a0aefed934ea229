use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::models::Role;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;

/// Role-gate middleware. One generic check consumes the per-route-group
/// minimum role declared at composition time, instead of per-route
/// conditionals.
///
/// Must be composed after `authenticate`. A missing principal means the
/// pipeline was mis-composed; that is treated as forbidden, not a panic.
pub async fn authorize(min: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::forbidden("Insufficient permissions"))?;

    if !user.role.satisfies(min) {
        tracing::debug!(account_id = %user.id, role = %user.role, required = %min,
            "authorization denied");
        return Err(ApiError::forbidden("Insufficient permissions"));
    }

    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(Role::Admin, request, next).await
}

pub async fn require_super_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(Role::SuperAdmin, request, next).await
}
