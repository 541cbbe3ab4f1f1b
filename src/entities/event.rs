use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_EVENT_NAME: &str = "Événement inconnu";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub legacy_id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: DateTime,
    pub location: Option<String>,
    pub photographer_email: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// Title if set, otherwise name, otherwise the unknown-event label.
    pub fn display_name(&self) -> &str {
        [self.title.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_EVENT_NAME)
    }
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    #[sea_orm(string_value = "UPCOMING")]
    Upcoming,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: Option<&str>, name: Option<&str>) -> Model {
        let now = chrono::Utc::now().naive_utc();
        Model {
            id: Uuid::new_v4(),
            legacy_id: None,
            title: title.map(str::to_string),
            name: name.map(str::to_string),
            description: None,
            date: now,
            location: None,
            photographer_email: None,
            cover_image_url: None,
            status: EventStatus::Upcoming,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn display_name_prefers_title() {
        assert_eq!(event(Some("Gala"), Some("gala-2024")).display_name(), "Gala");
        assert_eq!(event(None, Some("gala-2024")).display_name(), "gala-2024");
        assert_eq!(event(Some(""), Some("gala-2024")).display_name(), "gala-2024");
        assert_eq!(event(None, None).display_name(), UNKNOWN_EVENT_NAME);
    }
}
