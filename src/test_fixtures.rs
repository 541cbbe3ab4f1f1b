//! Shared fixtures for unit tests: an in-memory SQLite database with the
//! full schema applied, plus builders for events and photos.

use chrono::{Duration, NaiveDateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::entities::{event, photo};
use crate::models::event_ref::EventRef;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn minutes_ago(minutes: i64) -> NaiveDateTime {
    Utc::now().naive_utc() - Duration::minutes(minutes)
}

pub async fn insert_event(
    db: &DatabaseConnection,
    legacy_id: Option<&str>,
    title: Option<&str>,
    name: Option<&str>,
) -> event::Model {
    let now = Utc::now().naive_utc();
    let model = event::ActiveModel {
        id: Set(Uuid::new_v4()),
        legacy_id: Set(legacy_id.map(str::to_string)),
        title: Set(title.map(str::to_string)),
        name: Set(name.map(str::to_string)),
        description: Set(None),
        date: Set(now),
        location: Set(None),
        photographer_email: Set(None),
        cover_image_url: Set(None),
        status: Set(event::EventStatus::Upcoming),
        created_at: Set(now),
        updated_at: Set(now),
    };
    crate::services::events::EventStore::new(db.clone())
        .insert(model)
        .await
        .expect("insert event")
}

pub struct PhotoSpec<'a> {
    pub url: Option<&'a str>,
    pub filename: Option<&'a str>,
    pub event: Option<EventRef>,
    pub uploaded_at: NaiveDateTime,
}

impl Default for PhotoSpec<'_> {
    fn default() -> Self {
        Self {
            url: None,
            filename: None,
            event: None,
            uploaded_at: Utc::now().naive_utc(),
        }
    }
}

pub async fn insert_photo(db: &DatabaseConnection, spec: PhotoSpec<'_>) -> photo::Model {
    let (event_id, event_uuid) = match spec.event {
        Some(EventRef::Raw(raw)) => (Some(raw), None),
        Some(EventRef::Resolved(id)) => (None, Some(id)),
        None => (None, None),
    };
    let model = photo::ActiveModel {
        id: Set(Uuid::new_v4()),
        url: Set(spec.url.map(str::to_string)),
        filename: Set(spec.filename.map(str::to_string)),
        event_id: Set(event_id),
        event_uuid: Set(event_uuid),
        uploaded_at: Set(spec.uploaded_at),
        face_encodings: Set(None),
        uploaded_by: Set(None),
        description: Set(None),
    };
    crate::services::photos::PhotoStore::new(db.clone())
        .insert(model)
        .await
        .expect("insert photo")
}
