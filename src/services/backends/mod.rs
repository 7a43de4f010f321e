/// List persistence backends
///
/// A list lives in exactly one place: the account-backed list server or device-local
/// storage. The variant is picked when an editor is built and never re-checked per call.
/// Both variants take the same arguments; the local variant ignores the credential.
use crate::{
    error::AppResult,
    models::{Credential, List, ListDetails, ListLocation},
};

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

#[derive(Debug, Clone)]
pub enum ListBackend {
    Remote(RemoteBackend),
    Local(LocalBackend),
}

impl ListBackend {
    pub fn location(&self) -> ListLocation {
        match self {
            ListBackend::Remote(_) => ListLocation::Server,
            ListBackend::Local(_) => ListLocation::LocalStorage,
        }
    }

    /// Persists a new list and returns it with its assigned id and owner
    pub async fn create(
        &self,
        details: ListDetails,
        credential: Option<&Credential>,
    ) -> AppResult<List> {
        match self {
            ListBackend::Remote(remote) => remote.create(details, credential).await,
            ListBackend::Local(local) => local.blocking(move |b| b.create(details)).await,
        }
    }

    /// Replaces name, description and listings of an existing list
    pub async fn update(
        &self,
        list_id: &str,
        details: ListDetails,
        credential: Option<&Credential>,
    ) -> AppResult<()> {
        match self {
            ListBackend::Remote(remote) => remote.update(list_id, details, credential).await,
            ListBackend::Local(local) => {
                let list_id = list_id.to_string();
                local.blocking(move |b| b.update(&list_id, details)).await
            }
        }
    }

    pub async fn delete(&self, list_id: &str, credential: Option<&Credential>) -> AppResult<()> {
        match self {
            ListBackend::Remote(remote) => remote.delete(list_id, credential).await,
            ListBackend::Local(local) => {
                let list_id = list_id.to_string();
                local.blocking(move |b| b.delete(&list_id)).await
            }
        }
    }
}

impl From<RemoteBackend> for ListBackend {
    fn from(remote: RemoteBackend) -> Self {
        ListBackend::Remote(remote)
    }
}

impl From<LocalBackend> for ListBackend {
    fn from(local: LocalBackend) -> Self {
        ListBackend::Local(local)
    }
}
