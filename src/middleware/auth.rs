use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::entities::user::Role;
use crate::error::AppError;
use crate::state::AppState;

/// Access tokens live for one day.
pub const TOKEN_TTL_SECS: usize = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    role: Role,
}

pub fn issue_token(secret: &str, email: &str, role: Role) -> Result<String, AppError> {
    let exp = chrono::Utc::now().timestamp() as usize + TOKEN_TTL_SECS;
    let claims = Claims {
        sub: email.to_string(),
        exp,
        role,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("token encode error: {}", e)))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT decode error: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser {
        email: token_data.claims.sub,
        role: token_data.claims.role,
    });

    Ok(next.run(req).await)
}
