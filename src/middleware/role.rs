use axum::{extract::Request, middleware::Next, response::Response};

use crate::entities::user::Role;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if auth_user.role != Role::Admin {
        tracing::warn!("Access denied: user '{}' is not an admin", auth_user.email);
        return Err(AppError::Forbidden("Insufficient permissions".to_string()));
    }

    Ok(next.run(req).await)
}
