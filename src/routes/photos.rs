use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::entities::photo;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::services::users::find_by_email;
use crate::services::enrichment::{self, EnrichedPhoto};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdatePhotoRequest {
    description: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ByEventQuery {
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
}

/// A present-but-blank `eventId` is as good as missing.
fn required_event_id(query: &ByEventQuery) -> Result<&str, AppError> {
    query
        .event_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingParameter("eventId"))
}

#[utoipa::path(
    get,
    path = "/api/photos",
    params(ByEventQuery),
    responses(
        (status = 200, description = "Photos newest first, optionally only one event's", body = [EnrichedPhoto]),
        (status = 400, description = "Blank eventId"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Query(query): Query<ByEventQuery>,
) -> Result<Json<Vec<EnrichedPhoto>>, AppError> {
    let photos = if query.event_id.is_some() {
        let event_id = required_event_id(&query)?;
        enrichment::photos_by_event(&state.photos(), &state.events(), event_id).await?
    } else {
        enrichment::all_photos(&state.photos(), &state.events()).await?
    };
    tracing::debug!(event_id = ?query.event_id, count = photos.len(), "Photos | GET /api/photos");
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/api/photos/by-event",
    params(ByEventQuery),
    responses(
        (status = 200, description = "Photos of one event, newest first", body = [EnrichedPhoto]),
        (status = 400, description = "Missing eventId"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Photos"
)]
pub async fn photos_by_event(
    State(state): State<AppState>,
    Query(query): Query<ByEventQuery>,
) -> Result<Json<Vec<EnrichedPhoto>>, AppError> {
    let event_id = required_event_id(&query)?;
    let photos = enrichment::photos_by_event(&state.photos(), &state.events(), event_id).await?;
    tracing::debug!(event_id, count = photos.len(), "Photos | GET /api/photos/by-event");
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo details", body = EnrichedPhoto),
        (status = 404, description = "Photo not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Photos"
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedPhoto>, AppError> {
    let photo = state
        .photos()
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

    enrichment::enrich_all(&state.events(), vec![photo])
        .await
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::InternalServerError("enrichment returned no photo".to_string()))
}

/// Loads the photo and checks the caller may change it.
async fn managed_photo(
    state: &AppState,
    auth_user: &AuthUser,
    id: Uuid,
) -> Result<photo::Model, AppError> {
    let photo = state
        .photos()
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;
    let caller = find_by_email(&state.db, &auth_user.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    if !photo.is_managed_by(&caller) {
        tracing::warn!(photo_id = %id, user = %caller.email, "Photos | not the uploader");
        return Err(AppError::Forbidden("Access denied to this photo".to_string()));
    }
    Ok(photo)
}

#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo updated", body = EnrichedPhoto),
        (status = 403, description = "Neither the uploader nor an admin"),
        (status = 404, description = "Photo not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Photos"
)]
pub async fn update_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePhotoRequest>,
) -> Result<Json<EnrichedPhoto>, AppError> {
    let photo = managed_photo(&state, &auth_user, id).await?;

    let mut active = photo.into_active_model();
    active.description = Set(payload.description);
    let updated = state.photos().update(active).await?;

    tracing::info!(photo_id = %id, "Photos | description updated");
    enrichment::enrich_all(&state.events(), vec![updated])
        .await
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::InternalServerError("enrichment returned no photo".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 403, description = "Neither the uploader nor an admin"),
        (status = 404, description = "Photo not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Photos"
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    managed_photo(&state, &auth_user, id).await?;
    state.photos().delete(id).await?;

    tracing::info!(photo_id = %id, "Photos | deleted");
    Ok(Json(serde_json::json!({
        "message": "Photo deleted successfully"
    })))
}
