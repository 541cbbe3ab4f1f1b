use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::event::{self, Entity as Event, EventStatus};
use crate::models::event_ref::EventRef;

/// Queries and mutations on the `events` table.
#[derive(Clone)]
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn all_by_date_desc(&self) -> Result<Vec<event::Model>, DbErr> {
        Event::find()
            .order_by_desc(event::Column::Date)
            .all(&self.db)
            .await
    }

    /// Looks the reference up exactly as given: raw text against the legacy
    /// string id, a native id against the primary key.
    pub async fn find_as_is(&self, reference: &EventRef) -> Result<Option<event::Model>, DbErr> {
        match reference {
            EventRef::Raw(raw) => {
                Event::find()
                    .filter(event::Column::LegacyId.eq(raw.as_str()))
                    .one(&self.db)
                    .await
            }
            EventRef::Resolved(id) => Event::find_by_id(*id).one(&self.db).await,
        }
    }

    /// Tries the reference as-is, then its normalized form. A reference that
    /// cannot be normalized simply has no second chance.
    pub async fn resolve(&self, reference: &EventRef) -> Result<Option<event::Model>, DbErr> {
        if let Some(event) = self.find_as_is(reference).await? {
            return Ok(Some(event));
        }
        let normalized = reference.normalize();
        if normalized == *reference {
            return Ok(None);
        }
        self.find_as_is(&normalized).await
    }

    pub async fn insert(&self, event: event::ActiveModel) -> Result<event::Model, DbErr> {
        event.insert(&self.db).await
    }

    pub async fn update(&self, event: event::ActiveModel) -> Result<event::Model, DbErr> {
        event.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let res = Event::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    /// Sets every event to ACTIVE. Returns how many rows actually changed.
    pub async fn activate_all(&self) -> Result<u64, DbErr> {
        let res = Event::update_many()
            .col_expr(event::Column::Status, Expr::value(EventStatus::Active.to_value()))
            .col_expr(event::Column::UpdatedAt, Expr::value(chrono::Utc::now().naive_utc()))
            .filter(event::Column::Status.ne(EventStatus::Active))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn set_cover(&self, id: Uuid, cover_image_url: String) -> Result<u64, DbErr> {
        let res = Event::update_many()
            .col_expr(event::Column::CoverImageUrl, Expr::value(cover_image_url))
            .col_expr(event::Column::UpdatedAt, Expr::value(chrono::Utc::now().naive_utc()))
            .filter(event::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
