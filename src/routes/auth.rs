use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::user::{self, Role};
use crate::error::AppError;
use crate::middleware::auth::{issue_token, AuthUser, TOKEN_TTL_SECS};
use crate::services::users::{find_by_email, register_user, verify_credentials};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    access_token: String,
    expires_in: usize,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    id: i32,
    email: String,
    name: String,
    role: Role,
    created_at: chrono::NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    user: UserResponse,
    access_token: String,
    expires_in: usize,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    tracing::info!("Login attempt for: {}", payload.email);

    let user = verify_credentials(&state.db, &payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let access_token = issue_token(&state.config.jwt_secret, &user.email, user.role)?;
    Ok(Json(LoginResponse {
        access_token,
        expires_in: TOKEN_TTL_SECS,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, already logged in", body = RegisterResponse),
        (status = 400, description = "Invalid email, password or name"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = register_user(&state.db, &payload.email, &payload.password, &payload.name).await?;
    let access_token = issue_token(&state.config.jwt_secret, &user.email, user.role)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
            access_token,
            expires_in: TOKEN_TTL_SECS,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated account", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = find_by_email(&state.db, &auth_user.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}
