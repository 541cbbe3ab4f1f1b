use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::event_ref::EventRef;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub url: Option<String>,
    pub filename: Option<String>,
    pub event_id: Option<String>,
    pub event_uuid: Option<Uuid>,
    pub uploaded_at: DateTime,
    pub face_encodings: Option<Json>,
    pub uploaded_by: Option<i32>,
    pub description: Option<String>,
}

impl Model {
    /// The event reference in the form it was stored. The native column wins
    /// when both are populated.
    pub fn event_ref(&self) -> Option<EventRef> {
        if let Some(id) = self.event_uuid {
            return Some(EventRef::Resolved(id));
        }
        self.event_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| EventRef::Raw(s.to_string()))
    }

    /// Name of the backing file inside the uploads directory.
    ///
    /// `url` takes precedence over `filename`; empty values count as absent.
    /// Only the last path segment is kept, so `/uploads/photos/a.jpg` and
    /// `a.jpg` name the same file. Returns `None` when nothing usable is left.
    pub fn stored_name(&self) -> Option<&str> {
        [self.url.as_deref(), self.filename.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .and_then(last_segment)
    }

    /// The uploader and admins may edit or delete a photo.
    pub fn is_managed_by(&self, user: &super::user::Model) -> bool {
        user.role == super::user::Role::Admin || self.uploaded_by == Some(user.id)
    }
}

pub(crate) fn last_segment(value: &str) -> Option<&str> {
    let segment = value.rsplit(&['/', '\\'][..]).next()?;
    match segment {
        "" | "." | ".." => None,
        s => Some(s),
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(url: Option<&str>, filename: Option<&str>) -> Model {
        Model {
            id: Uuid::new_v4(),
            url: url.map(str::to_string),
            filename: filename.map(str::to_string),
            event_id: None,
            event_uuid: None,
            uploaded_at: chrono::Utc::now().naive_utc(),
            face_encodings: None,
            uploaded_by: None,
            description: None,
        }
    }

    #[test]
    fn url_takes_precedence_over_filename() {
        assert_eq!(photo(Some("a.jpg"), Some("b.jpg")).stored_name(), Some("a.jpg"));
        assert_eq!(photo(None, Some("b.jpg")).stored_name(), Some("b.jpg"));
        assert_eq!(photo(Some(""), Some("b.jpg")).stored_name(), Some("b.jpg"));
    }

    #[test]
    fn stored_name_keeps_last_segment_only() {
        assert_eq!(
            photo(Some("/uploads/photos/a.jpg"), None).stored_name(),
            Some("a.jpg")
        );
        assert_eq!(photo(Some("../../etc/passwd"), None).stored_name(), Some("passwd"));
        assert_eq!(photo(Some("photos/"), None).stored_name(), None);
        assert_eq!(photo(Some(".."), None).stored_name(), None);
        assert_eq!(photo(None, None).stored_name(), None);
    }

    #[test]
    fn native_reference_wins_over_raw() {
        let id = Uuid::new_v4();
        let mut p = photo(None, None);
        assert_eq!(p.event_ref(), None);

        p.event_id = Some(String::new());
        assert_eq!(p.event_ref(), None);

        p.event_id = Some("abc".into());
        assert_eq!(p.event_ref(), Some(EventRef::Raw("abc".into())));

        p.event_uuid = Some(id);
        assert_eq!(p.event_ref(), Some(EventRef::Resolved(id)));
    }

    #[test]
    fn only_uploader_or_admin_manage_a_photo() {
        use crate::entities::user::{self, Role};

        let account = |id, role| user::Model {
            id,
            email: format!("u{id}@x.fr"),
            password: String::new(),
            name: "U".into(),
            role,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let mut p = photo(Some("a.jpg"), None);
        p.uploaded_by = Some(7);
        assert!(p.is_managed_by(&account(7, Role::Photographer)));
        assert!(p.is_managed_by(&account(1, Role::Admin)));
        assert!(!p.is_managed_by(&account(8, Role::User)));

        p.uploaded_by = None;
        assert!(!p.is_managed_by(&account(7, Role::Photographer)));
    }
}
