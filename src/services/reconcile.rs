use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::photos::PhotoStore;

/// How orphan records are removed. Both converge on the same end state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurgeMode {
    /// Collect every orphan id, then issue one delete.
    #[default]
    Batch,
    /// Delete orphans one at a time, logging each.
    Individual,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MissingPhoto {
    pub id: Uuid,
    pub filename: String,
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct ScanReport {
    pub total: u64,
    pub existing: u64,
    /// Records without any usable file name; never counted as missing.
    pub skipped: u64,
    pub missing: Vec<MissingPhoto>,
    /// Files on disk that no record points at.
    pub untracked: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ReconcileReport {
    pub total: u64,
    pub existing: u64,
    pub skipped: u64,
    pub missing: u64,
    pub removed: u64,
}

/// Aligns the `photos` table with the files in the uploads directory.
///
/// Reads are a snapshot: a file that disappears between the scan and the
/// delete step is picked up by the next run.
pub struct Reconciler {
    photos: PhotoStore,
    uploads_dir: PathBuf,
}

impl Reconciler {
    pub fn new(photos: PhotoStore, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            photos,
            uploads_dir: uploads_dir.into(),
        }
    }

    async fn files_on_disk(&self) -> Result<HashSet<String>, AppError> {
        // A missing directory must not turn every record into an orphan.
        let mut entries = tokio::fs::read_dir(&self.uploads_dir).await?;
        let mut names = HashSet::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.insert(name);
            }
        }
        Ok(names)
    }

    /// Dry run: classifies every record without touching the store.
    pub async fn scan(&self) -> Result<ScanReport, AppError> {
        let on_disk = self.files_on_disk().await?;
        let photos = self.photos.all_newest_first().await?;

        let mut report = ScanReport {
            total: photos.len() as u64,
            ..Default::default()
        };
        let mut referenced = HashSet::new();

        for photo in &photos {
            let Some(name) = photo.stored_name() else {
                report.skipped += 1;
                continue;
            };
            referenced.insert(name);
            if on_disk.contains(name) {
                report.existing += 1;
            } else {
                report.missing.push(MissingPhoto {
                    id: photo.id,
                    filename: name.to_string(),
                    event_id: photo.event_ref().map(|r| r.to_string()),
                });
            }
        }

        let mut untracked: Vec<String> = on_disk
            .iter()
            .filter(|name| !referenced.contains(name.as_str()))
            .cloned()
            .collect();
        untracked.sort();
        report.untracked = untracked;

        tracing::info!(
            dir = %self.uploads_dir.display(),
            total = report.total,
            existing = report.existing,
            missing = report.missing.len(),
            skipped = report.skipped,
            untracked = report.untracked.len(),
            "Reconcile | scan complete"
        );
        Ok(report)
    }

    /// Removes every record whose backing file is absent.
    pub async fn reconcile(&self, mode: PurgeMode) -> Result<ReconcileReport, AppError> {
        let scan = self.scan().await?;

        let removed = match mode {
            PurgeMode::Batch => {
                let ids: Vec<Uuid> = scan.missing.iter().map(|m| m.id).collect();
                self.photos.delete_many(ids).await?
            }
            PurgeMode::Individual => {
                let mut removed = 0;
                for orphan in &scan.missing {
                    removed += self.photos.delete(orphan.id).await?;
                    tracing::info!(id = %orphan.id, filename = %orphan.filename, "Reconcile | removed orphan record");
                }
                removed
            }
        };

        tracing::info!(removed, ?mode, "Reconcile | done");
        Ok(ReconcileReport {
            total: scan.total,
            existing: scan.existing,
            skipped: scan.skipped,
            missing: scan.missing.len() as u64,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event_ref::EventRef;
    use crate::test_fixtures::{insert_photo, setup_db, PhotoSpec};

    async fn seed(db: &sea_orm::DatabaseConnection, dir: &std::path::Path) {
        std::fs::write(dir.join("present.jpg"), b"x").unwrap();
        std::fs::write(dir.join("by-filename.jpg"), b"x").unwrap();
        std::fs::write(dir.join("stray.png"), b"x").unwrap();

        insert_photo(db, PhotoSpec { url: Some("present.jpg"), ..Default::default() }).await;
        insert_photo(db, PhotoSpec {
            url: Some("/uploads/photos/by-filename.jpg"),
            ..Default::default()
        })
        .await;
        insert_photo(db, PhotoSpec {
            filename: Some("gone.jpg"),
            event: Some(EventRef::Raw("evt".into())),
            ..Default::default()
        })
        .await;
        insert_photo(db, PhotoSpec { url: Some("also-gone.jpg"), ..Default::default() }).await;
        // no name at all
        insert_photo(db, PhotoSpec::default()).await;
    }

    #[tokio::test]
    async fn scan_classifies_without_deleting() {
        let db = setup_db().await;
        let dir = tempfile::tempdir().unwrap();
        seed(&db, dir.path()).await;
        let reconciler = Reconciler::new(PhotoStore::new(db.clone()), dir.path());

        let report = reconciler.scan().await.unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(report.existing, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.missing.len(), 2);
        assert_eq!(report.untracked, vec!["stray.png".to_string()]);

        let again = reconciler.scan().await.unwrap();
        assert_eq!(again.missing.len(), 2);
    }

    #[tokio::test]
    async fn second_run_removes_nothing() {
        for mode in [PurgeMode::Batch, PurgeMode::Individual] {
            let db = setup_db().await;
            let dir = tempfile::tempdir().unwrap();
            seed(&db, dir.path()).await;
            let reconciler = Reconciler::new(PhotoStore::new(db.clone()), dir.path());

            let first = reconciler.reconcile(mode).await.unwrap();
            assert_eq!(first.removed, 2, "{mode:?}");
            assert_eq!(first.missing, 2);
            assert_eq!(first.skipped, 1);

            let second = reconciler.reconcile(mode).await.unwrap();
            assert_eq!(second.removed, 0, "{mode:?}");
            assert_eq!(second.missing, 0);
            assert_eq!(second.skipped, 1);
            assert_eq!(second.total, 3);
        }
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let db = setup_db().await;
        insert_photo(&db, PhotoSpec { url: Some("a.jpg"), ..Default::default() }).await;
        let dir = tempfile::tempdir().unwrap();
        let reconciler = Reconciler::new(PhotoStore::new(db.clone()), dir.path().join("nope"));

        assert!(matches!(
            reconciler.reconcile(PurgeMode::Batch).await,
            Err(AppError::Filesystem(_))
        ));
        assert_eq!(PhotoStore::new(db).all_newest_first().await.unwrap().len(), 1);
    }
}
