use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::cache::Cache;
use crate::services::events::EventStore;
use crate::services::photos::PhotoStore;
use crate::services::reconcile::Reconciler;

pub const EVENTS_CACHE_KEY: &str = "events:all";

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub cache: Arc<Mutex<Cache<Value>>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(Cache::new())),
        }
    }

    pub fn photos(&self) -> PhotoStore {
        PhotoStore::new(self.db.clone())
    }

    pub fn events(&self) -> EventStore {
        EventStore::new(self.db.clone())
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.photos(), self.config.uploads_dir.clone())
    }

    /// Drops every cached entry; called after any event mutation.
    pub async fn invalidate_cache(&self) {
        self.cache.lock().await.clear();
    }
}
