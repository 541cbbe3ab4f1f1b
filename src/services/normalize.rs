use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::config::UPLOADS_ROOT;
use crate::entities::photo::last_segment;
use crate::error::AppError;
use crate::services::events::EventStore;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MissingCover {
    pub event_id: Uuid,
    pub cover_image_url: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CoverReport {
    pub rewritten: u64,
    pub missing: Vec<MissingCover>,
}

/// Sets every event to ACTIVE, whatever its current status.
pub async fn activate_all(events: &EventStore) -> Result<u64, AppError> {
    let modified = events.activate_all().await?;
    tracing::info!(modified, "Normalize | events set to ACTIVE");
    Ok(modified)
}

/// The rewritten cover path, or `None` when the value is empty or already
/// under the uploads root.
pub fn normalized_cover(value: &str, prefix: &str) -> Option<String> {
    if value.is_empty() || value.starts_with(UPLOADS_ROOT) || value.starts_with(prefix) {
        return None;
    }
    Some(format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        value.trim_start_matches('/')
    ))
}

/// Prefixes cover paths that are not rooted under the uploads prefix.
pub async fn fix_cover_paths(events: &EventStore, prefix: &str) -> Result<u64, AppError> {
    let mut rewritten = 0;
    for event in events.all_by_date_desc().await? {
        let Some(cover) = event.cover_image_url.as_deref() else {
            continue;
        };
        if let Some(fixed) = normalized_cover(cover, prefix) {
            tracing::info!(event_id = %event.id, from = cover, to = %fixed, "Normalize | cover path rewritten");
            rewritten += events.set_cover(event.id, fixed).await?;
        }
    }
    Ok(rewritten)
}

/// Directory that `/uploads/` maps to on disk: `uploads_dir` climbed by the
/// number of segments the prefix adds below `/uploads/`. `None` when the
/// prefix is not under `/uploads/`.
fn uploads_root(prefix: &str, uploads_dir: &Path) -> Option<PathBuf> {
    let depth = prefix
        .strip_prefix(UPLOADS_ROOT.trim_end_matches('/'))?
        .split('/')
        .filter(|s| !s.is_empty())
        .count();
    uploads_dir.ancestors().nth(depth).map(Path::to_path_buf)
}

/// The file a cover points at. Paths under the prefix map into
/// `uploads_dir`, any other `/uploads/...` path maps into the uploads root,
/// and a value that was never normalized is looked up by its last segment.
/// Paths that would leave the uploads tree resolve to `None`.
pub fn cover_file_path(cover: &str, prefix: &str, uploads_dir: &Path) -> Option<PathBuf> {
    let prefix = prefix.trim_end_matches('/');
    let (base, rest) = if let Some(rest) = cover.strip_prefix(prefix).filter(|r| r.starts_with('/')) {
        (uploads_dir.to_path_buf(), rest)
    } else if let Some(rest) = cover.strip_prefix(UPLOADS_ROOT) {
        (uploads_root(prefix, uploads_dir)?, rest)
    } else {
        return last_segment(cover).map(|name| uploads_dir.join(name));
    };

    let relative = Path::new(rest.trim_start_matches('/'));
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if relative.as_os_str().is_empty() || !contained {
        return None;
    }
    Some(base.join(relative))
}

/// Lists events whose cover file cannot be found under the uploads tree.
/// Reports only; nothing is repaired.
pub async fn verify_cover_files(
    events: &EventStore,
    prefix: &str,
    uploads_dir: &Path,
) -> Result<Vec<MissingCover>, AppError> {
    let mut missing = Vec::new();
    for event in events.all_by_date_desc().await? {
        let Some(cover) = event.cover_image_url.filter(|c| !c.is_empty()) else {
            continue;
        };
        let present = match cover_file_path(&cover, prefix, uploads_dir) {
            Some(path) => tokio::fs::try_exists(path).await?,
            None => false,
        };
        if !present {
            tracing::warn!(event_id = %event.id, cover = %cover, "Normalize | cover file missing");
            missing.push(MissingCover {
                event_id: event.id,
                cover_image_url: cover,
            });
        }
    }
    Ok(missing)
}

/// Rewrites cover paths, then checks the files in a separate pass.
pub async fn fix_covers(
    events: &EventStore,
    prefix: &str,
    uploads_dir: &Path,
) -> Result<CoverReport, AppError> {
    let rewritten = fix_cover_paths(events, prefix).await?;
    let missing = verify_cover_files(events, prefix, uploads_dir).await?;
    Ok(CoverReport { rewritten, missing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::event::{self, EventStatus};
    use crate::test_fixtures::{insert_event, setup_db};
    use sea_orm::{EntityTrait, IntoActiveModel, Set};

    const PREFIX: &str = "/uploads/photos";

    #[test]
    fn bare_name_gets_prefixed() {
        assert_eq!(
            normalized_cover("img.jpg", PREFIX).as_deref(),
            Some("/uploads/photos/img.jpg")
        );
        assert_eq!(
            normalized_cover("/img.jpg", PREFIX).as_deref(),
            Some("/uploads/photos/img.jpg")
        );
    }

    #[test]
    fn paths_under_uploads_are_left_alone() {
        assert_eq!(normalized_cover("/uploads/photos/img.jpg", PREFIX), None);
        assert_eq!(normalized_cover("/uploads/covers/img.jpg", PREFIX), None);
        assert_eq!(normalized_cover("", PREFIX), None);
    }

    #[test]
    fn cover_paths_resolve_inside_the_uploads_tree() {
        let photos = Path::new("/srv/uploads/photos");
        assert_eq!(
            cover_file_path("/uploads/photos/a.jpg", PREFIX, photos),
            Some(PathBuf::from("/srv/uploads/photos/a.jpg"))
        );
        assert_eq!(
            cover_file_path("/uploads/covers/a.jpg", PREFIX, photos),
            Some(PathBuf::from("/srv/uploads/covers/a.jpg"))
        );
        assert_eq!(
            cover_file_path("a.jpg", PREFIX, photos),
            Some(PathBuf::from("/srv/uploads/photos/a.jpg"))
        );
        assert_eq!(cover_file_path("/uploads/../etc/passwd", PREFIX, photos), None);
        assert_eq!(cover_file_path("/uploads/", PREFIX, photos), None);
    }

    async fn with_cover(db: &sea_orm::DatabaseConnection, cover: Option<&str>) -> event::Model {
        let e = insert_event(db, None, Some("E"), None).await;
        let mut active = e.into_active_model();
        active.cover_image_url = Set(cover.map(str::to_string));
        EventStore::new(db.clone()).update(active).await.unwrap()
    }

    #[tokio::test]
    async fn activate_all_counts_only_changed_rows() {
        let db = setup_db().await;
        let events = EventStore::new(db.clone());
        let already = insert_event(&db, None, Some("A"), None).await;
        insert_event(&db, None, Some("B"), None).await;
        insert_event(&db, None, Some("C"), None).await;

        let mut active = already.into_active_model();
        active.status = Set(EventStatus::Active);
        events.update(active).await.unwrap();

        assert_eq!(activate_all(&events).await.unwrap(), 2);
        assert_eq!(activate_all(&events).await.unwrap(), 0);
        let all = event::Entity::find().all(&db).await.unwrap();
        assert!(all.iter().all(|e| e.status == EventStatus::Active));
    }

    #[tokio::test]
    async fn fix_covers_rewrites_then_reports_missing_files() {
        let db = setup_db().await;
        let events = EventStore::new(db.clone());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("img.jpg"), b"x").unwrap();

        let bare = with_cover(&db, Some("img.jpg")).await;
        let rooted = with_cover(&db, Some("/uploads/photos/lost.jpg")).await;
        with_cover(&db, None).await;

        let report = fix_covers(&events, PREFIX, dir.path()).await.unwrap();
        assert_eq!(report.rewritten, 1);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].event_id, rooted.id);

        let fixed = event::Entity::find_by_id(bare.id).one(&db).await.unwrap().unwrap();
        assert_eq!(fixed.cover_image_url.as_deref(), Some("/uploads/photos/img.jpg"));

        let again = fix_covers(&events, PREFIX, dir.path()).await.unwrap();
        assert_eq!(again.rewritten, 0);
    }

    #[tokio::test]
    async fn covers_outside_the_photo_folder_are_found() {
        let db = setup_db().await;
        let events = EventStore::new(db.clone());
        let root = tempfile::tempdir().unwrap();
        let photos = root.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        std::fs::create_dir_all(root.path().join("covers")).unwrap();
        std::fs::write(root.path().join("covers").join("x.jpg"), b"x").unwrap();

        with_cover(&db, Some("/uploads/covers/x.jpg")).await;
        let gone = with_cover(&db, Some("/uploads/covers/gone.jpg")).await;

        let report = fix_covers(&events, PREFIX, &photos).await.unwrap();
        assert_eq!(report.rewritten, 0);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].event_id, gone.id);
    }
}
