use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::entities::event::{self, UNKNOWN_EVENT_NAME};
use crate::entities::photo;
use crate::models::event_ref::EventRef;
use crate::services::events::EventStore;
use crate::services::photos::PhotoStore;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub url: Option<String>,
    pub filename: Option<String>,
    pub event_id: Option<String>,
    pub uploaded_at: NaiveDateTime,
    #[schema(value_type = Option<Object>)]
    pub face_encodings: Option<Value>,
    pub uploaded_by: Option<i32>,
    pub description: Option<String>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(model: photo::Model) -> Self {
        let event_id = model.event_ref().map(|r| r.to_string());
        Self {
            id: model.id,
            url: model.url,
            filename: model.filename,
            event_id,
            uploaded_at: model.uploaded_at,
            face_encodings: model.face_encodings,
            uploaded_by: model.uploaded_by,
            description: model.description,
        }
    }
}

/// A photo plus the display fields taken from its event.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EnrichedPhoto {
    #[serde(flatten)]
    pub photo: PhotoResponse,
    pub event_name: String,
    pub date: Option<NaiveDateTime>,
}

pub fn enrich(photo: photo::Model, event: Option<&event::Model>) -> EnrichedPhoto {
    EnrichedPhoto {
        photo: PhotoResponse::from(photo),
        event_name: event
            .map(|e| e.display_name().to_string())
            .unwrap_or_else(|| UNKNOWN_EVENT_NAME.to_string()),
        date: event.map(|e| e.date),
    }
}

/// Resolves an event for display. A store error here only costs this one
/// lookup its event; it is logged and treated as no match.
async fn lookup(events: &EventStore, reference: &EventRef) -> Option<event::Model> {
    match events.resolve(reference).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(event_ref = %reference, error = %e, "event lookup failed");
            None
        }
    }
}

/// Enriches each photo independently, keeping the input order.
pub async fn enrich_all(events: &EventStore, photos: Vec<photo::Model>) -> Vec<EnrichedPhoto> {
    let mut seen: HashMap<EventRef, Option<event::Model>> = HashMap::new();
    let mut enriched = Vec::with_capacity(photos.len());

    for photo in photos {
        let event = match photo.event_ref() {
            Some(reference) => {
                if !seen.contains_key(&reference) {
                    let found = lookup(events, &reference).await;
                    seen.insert(reference.clone(), found);
                }
                seen.get(&reference).cloned().flatten()
            }
            None => None,
        };
        enriched.push(enrich(photo, event.as_ref()));
    }

    enriched
}

pub async fn all_photos(
    photos: &PhotoStore,
    events: &EventStore,
) -> Result<Vec<EnrichedPhoto>, DbErr> {
    let all = photos.all_newest_first().await?;
    Ok(enrich_all(events, all).await)
}

/// Photos of one event. The id is matched verbatim first; only when that
/// finds nothing is it retried in native form, since older rows stored the
/// reference either way.
pub async fn photos_by_event(
    photos: &PhotoStore,
    events: &EventStore,
    event_id: &str,
) -> Result<Vec<EnrichedPhoto>, DbErr> {
    let mut results = photos.by_raw_event_id(event_id).await?;
    let reference = EventRef::Raw(event_id.to_string());

    if results.is_empty() {
        if let Some(native) = reference.native() {
            results = photos.by_native_event_id(native).await?;
        }
    }

    let event = lookup(events, &reference).await;
    Ok(results
        .into_iter()
        .map(|photo| enrich(photo, event.as_ref()))
        .collect())
}
