use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::event::{self, EventStatus};
use crate::error::AppError;
use crate::models::event_ref::EventRef;
use crate::services::users::is_valid_email;
use crate::state::{AppState, EVENTS_CACHE_KEY};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    title: Option<String>,
    name: Option<String>,
    description: Option<String>,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD`.
    date: String,
    location: Option<String>,
    photographer_email: Option<String>,
    cover_image_url: Option<String>,
    status: Option<EventStatus>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    title: Option<String>,
    name: Option<String>,
    description: Option<String>,
    date: Option<String>,
    location: Option<String>,
    photographer_email: Option<String>,
    cover_image_url: Option<String>,
    status: Option<EventStatus>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    id: Uuid,
    legacy_id: Option<String>,
    title: Option<String>,
    name: Option<String>,
    description: Option<String>,
    date: NaiveDateTime,
    location: Option<String>,
    photographer_email: Option<String>,
    cover_image_url: Option<String>,
    status: EventStatus,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        EventResponse {
            id: event.id,
            legacy_id: event.legacy_id,
            title: event.title,
            name: event.name,
            description: event.description,
            date: event.date,
            location: event.location,
            photographer_email: event.photographer_email,
            cover_image_url: event.cover_image_url,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

fn parse_event_date(value: &str) -> Result<NaiveDateTime, AppError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", value)))
}

fn validated_email(email: Option<String>) -> Result<Option<String>, AppError> {
    match email.filter(|e| !e.trim().is_empty()) {
        Some(e) if !is_valid_email(e.trim()) => {
            Err(AppError::BadRequest(format!("Invalid photographer email: {}", e)))
        }
        other => Ok(other.map(|e| e.trim().to_string())),
    }
}

async fn find_event(state: &AppState, id: &str) -> Result<event::Model, AppError> {
    state
        .events()
        .resolve(&EventRef::Raw(id.to_string()))
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Events, most recent date first", body = [EventResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let generation = {
        let cache = state.cache.lock().await;
        if let Some(cached) = cache.get(EVENTS_CACHE_KEY) {
            return Ok(Json(cached.clone()));
        }
        cache.generation()
    };

    let events: Vec<EventResponse> = state
        .events()
        .all_by_date_desc()
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();
    let body = serde_json::to_value(events)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    // The query ran unlocked: skip the store if an event changed meanwhile.
    state
        .cache
        .lock()
        .await
        .set_if_current(generation, EVENTS_CACHE_KEY, body.clone());
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID, native or legacy")
    ),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event = find_event(&state, &id).await?;
    Ok(Json(EventResponse::from(event)))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let has_label = [payload.title.as_deref(), payload.name.as_deref()]
        .into_iter()
        .flatten()
        .any(|s| !s.trim().is_empty());
    if !has_label {
        return Err(AppError::BadRequest("Event title or name is required".to_string()));
    }

    let now = chrono::Utc::now().naive_utc();
    let event = event::ActiveModel {
        id: Set(Uuid::new_v4()),
        legacy_id: Set(None),
        title: Set(payload.title),
        name: Set(payload.name),
        description: Set(payload.description),
        date: Set(parse_event_date(&payload.date)?),
        location: Set(payload.location),
        photographer_email: Set(validated_email(payload.photographer_email)?),
        cover_image_url: Set(payload.cover_image_url),
        status: Set(payload.status.unwrap_or(EventStatus::Upcoming)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = state.events().insert(event).await?;
    state.invalidate_cache().await;

    tracing::info!(id = %created.id, "Event '{}' created", created.display_name());
    Ok((StatusCode::CREATED, Json(EventResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID, native or legacy")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event = find_event(&state, &id).await?;

    // validate before touching the model
    let date = payload.date.as_deref().map(parse_event_date).transpose()?;
    let photographer_email = validated_email(payload.photographer_email)?;

    let mut active = event.into_active_model();
    if let Some(title) = payload.title {
        active.title = Set(Some(title));
    }
    if let Some(name) = payload.name {
        active.name = Set(Some(name));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(date) = date {
        active.date = Set(date);
    }
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(email) = photographer_email {
        active.photographer_email = Set(Some(email));
    }
    if let Some(cover) = payload.cover_image_url {
        active.cover_image_url = Set(Some(cover));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = state.events().update(active).await?;
    state.invalidate_cache().await;

    tracing::info!(id = %updated.id, "Event updated");
    Ok(Json(EventResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID, native or legacy")
    ),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let event = find_event(&state, &id).await?;

    if state.events().delete(event.id).await? == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    state.invalidate_cache().await;

    tracing::info!(id = %event.id, "Event deleted");
    Ok(Json(serde_json::json!({
        "message": "Event deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        let plain = parse_event_date("2024-06-01").unwrap();
        assert_eq!(plain.to_string(), "2024-06-01 00:00:00");

        let rfc = parse_event_date("2024-06-01T10:30:00+02:00").unwrap();
        assert_eq!(rfc.to_string(), "2024-06-01 08:30:00");

        assert!(matches!(parse_event_date("01/06/2024"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn blank_email_is_treated_as_absent() {
        assert_eq!(validated_email(Some("  ".into())).unwrap(), None);
        assert!(validated_email(Some("nope".into())).is_err());
    }
}
