use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::photo::{self, Entity as Photo};

/// Queries and mutations on the `photos` table.
#[derive(Clone)]
pub struct PhotoStore {
    db: DatabaseConnection,
}

impl PhotoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn all_newest_first(&self) -> Result<Vec<photo::Model>, DbErr> {
        Photo::find()
            .order_by_desc(photo::Column::UploadedAt)
            .all(&self.db)
            .await
    }

    /// Photos whose reference was stored as text equal to `raw`.
    pub async fn by_raw_event_id(&self, raw: &str) -> Result<Vec<photo::Model>, DbErr> {
        Photo::find()
            .filter(photo::Column::EventId.eq(raw))
            .order_by_desc(photo::Column::UploadedAt)
            .all(&self.db)
            .await
    }

    /// Photos whose reference was stored in native form.
    pub async fn by_native_event_id(&self, id: Uuid) -> Result<Vec<photo::Model>, DbErr> {
        Photo::find()
            .filter(photo::Column::EventUuid.eq(id))
            .order_by_desc(photo::Column::UploadedAt)
            .all(&self.db)
            .await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<photo::Model>, DbErr> {
        Photo::find_by_id(id).one(&self.db).await
    }

    pub async fn insert(&self, photo: photo::ActiveModel) -> Result<photo::Model, DbErr> {
        photo.insert(&self.db).await
    }

    pub async fn update(&self, photo: photo::ActiveModel) -> Result<photo::Model, DbErr> {
        photo.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let res = Photo::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_many(&self, ids: Vec<Uuid>) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = Photo::delete_many()
            .filter(photo::Column::Id.is_in(ids))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
