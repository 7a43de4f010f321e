use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    config::Config,
    db::LocalStorage,
    error::{AppError, AppResult},
    models::ListLocation,
    services::{
        catalog::TmdbProvider, CatalogProvider, ListBackend, ListEditor, LocalBackend,
        RemoteBackend,
    },
};

/// One open editor. Operations on the same session run one at a time.
pub type EditorSession = Arc<Mutex<ListEditor>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub remote: RemoteBackend,
    pub local: LocalBackend,
    pub editors: Arc<RwLock<HashMap<Uuid, EditorSession>>>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        remote: RemoteBackend,
        local: LocalBackend,
    ) -> Self {
        Self {
            catalog,
            remote,
            local,
            editors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Builds the state from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let catalog = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.search_language.clone(),
        );
        let remote = RemoteBackend::new(config.list_api_url.clone());
        let local = LocalBackend::new(LocalStorage::open(&config.local_storage_dir)?);

        Ok(Self::new(Arc::new(catalog), remote, local))
    }

    /// Backend variant for lists stored at `location`
    pub fn backend_for(&self, location: ListLocation) -> ListBackend {
        match location {
            ListLocation::Server => ListBackend::Remote(self.remote.clone()),
            ListLocation::LocalStorage => ListBackend::Local(self.local.clone()),
        }
    }

    pub async fn insert_editor(&self, editor: ListEditor) -> Uuid {
        let session_id = Uuid::new_v4();
        self.editors
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(editor)));
        session_id
    }

    pub async fn editor(&self, session_id: Uuid) -> AppResult<EditorSession> {
        self.editors
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Editor session {}", session_id)))
    }

    /// Drops a session. Returns false if it was not open.
    pub async fn close_editor(&self, session_id: Uuid) -> bool {
        self.editors.write().await.remove(&session_id).is_some()
    }
}
