use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::{
    db::LocalStorage,
    error::{AppError, AppResult},
    models::{List, ListDetails, LOCAL_OWNER},
};

/// Storage key holding the JSON array of every local list
pub const LISTS_KEY: &str = "lists";

/// Device-local list backend
///
/// The whole collection is read, modified and written back on every mutation.
/// Clones share one write lock, so mutations from this process never interleave.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    storage: LocalStorage,
    write_lock: Arc<Mutex<()>>,
}

impl LocalBackend {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Runs `f` against this backend on the blocking thread pool
    pub async fn blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&LocalBackend) -> AppResult<T> + Send + 'static,
    {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || f(&backend))
            .await
            .map_err(|e| AppError::Internal(format!("Local storage task failed: {}", e)))?
    }

    /// All lists in storage order. An unset collection reads as empty.
    pub fn lists(&self) -> AppResult<Vec<List>> {
        Ok(self.read_collection()?.unwrap_or_default())
    }

    pub fn get(&self, list_id: &str) -> AppResult<Option<List>> {
        Ok(self.lists()?.into_iter().find(|l| l.list_id == list_id))
    }

    /// Stores a new list under a freshly generated id
    pub fn create(&self, details: ListDetails) -> AppResult<List> {
        let _guard = self.lock();
        let mut lists = self.lists()?;
        let taken: HashSet<&str> = lists.iter().map(|l| l.list_id.as_str()).collect();

        let mut list_id = Uuid::new_v4().to_string();
        while taken.contains(list_id.as_str()) {
            list_id = Uuid::new_v4().to_string();
        }

        let list = details.into_list(list_id, LOCAL_OWNER.to_string());
        lists.push(list.clone());
        self.write_collection(&lists)?;

        tracing::info!(list_id = %list.list_id, listings = list.listings.len(), "Local list created");
        Ok(list)
    }

    /// Replaces the list with `list_id`, appending it if it is not stored yet
    pub fn update(&self, list_id: &str, details: ListDetails) -> AppResult<()> {
        let _guard = self.lock();
        let mut lists = self.lists()?;
        let list = details.into_list(list_id.to_string(), LOCAL_OWNER.to_string());

        match lists.iter_mut().find(|l| l.list_id == list_id) {
            Some(existing) => *existing = list,
            None => lists.push(list),
        }
        self.write_collection(&lists)?;

        tracing::info!(list_id = %list_id, "Local list saved");
        Ok(())
    }

    /// Removes the list with `list_id`. Fails if no collection has ever been stored.
    pub fn delete(&self, list_id: &str) -> AppResult<()> {
        let _guard = self.lock();
        let lists = self.read_collection()?.ok_or_else(|| {
            AppError::LocalStorage(format!(
                "Tried to delete list {} but no lists are stored",
                list_id
            ))
        })?;

        let remaining: Vec<List> = lists.into_iter().filter(|l| l.list_id != list_id).collect();
        self.write_collection(&remaining)?;

        tracing::info!(list_id = %list_id, remaining = remaining.len(), "Local list deleted");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // guards no data, so a poisoned lock is still usable
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_collection(&self) -> AppResult<Option<Vec<List>>> {
        match self.storage.get_item(LISTS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_collection(&self, lists: &[List]) -> AppResult<()> {
        let raw = serde_json::to_string(lists)?;
        self.storage.set_item(LISTS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Listing, MediaType};
    use tempfile::{tempdir, TempDir};

    fn backend() -> (TempDir, LocalBackend) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        (dir, LocalBackend::new(storage))
    }

    fn details(name: &str) -> ListDetails {
        ListDetails {
            list_name: name.to_string(),
            list_description: String::new(),
            listings: vec![Listing {
                id: 603,
                title: "The Matrix".to_string(),
                img_url: None,
                media_type: MediaType::Movie,
                id_within_list: Some("m1".to_string()),
            }],
        }
    }

    #[test]
    fn test_create_into_empty_storage() {
        let (_dir, backend) = backend();

        let list = backend.create(details("A")).unwrap();
        assert_eq!(list.owner_username, LOCAL_OWNER);
        assert!(!list.list_id.is_empty());
        assert_eq!(backend.lists().unwrap(), vec![list]);
    }

    #[test]
    fn test_create_generates_distinct_ids() {
        let (_dir, backend) = backend();

        let a = backend.create(details("A")).unwrap();
        let b = backend.create(details("B")).unwrap();
        assert_ne!(a.list_id, b.list_id);
        assert_eq!(backend.lists().unwrap().len(), 2);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let (_dir, backend) = backend();
        let a = backend.create(details("A")).unwrap();
        let b = backend.create(details("B")).unwrap();

        backend.update(&a.list_id, details("A2")).unwrap();

        let lists = backend.lists().unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].list_name, "A2");
        assert_eq!(lists[0].list_id, a.list_id);
        assert_eq!(lists[1], b);
    }

    #[test]
    fn test_update_unknown_id_appends() {
        let (_dir, backend) = backend();

        backend.update("not-yet-stored", details("A")).unwrap();
        let stored = backend.get("not-yet-stored").unwrap().unwrap();
        assert_eq!(stored.list_name, "A");
    }

    #[test]
    fn test_delete_filters_by_id() {
        let (_dir, backend) = backend();
        let a = backend.create(details("A")).unwrap();
        let b = backend.create(details("B")).unwrap();

        backend.delete(&a.list_id).unwrap();
        assert_eq!(backend.lists().unwrap(), vec![b]);

        // deleting an absent id leaves the collection alone
        backend.delete(&a.list_id).unwrap();
        assert_eq!(backend.lists().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_without_collection_fails() {
        let (_dir, backend) = backend();
        assert!(matches!(
            backend.delete("anything"),
            Err(AppError::LocalStorage(_))
        ));
    }

    #[test]
    fn test_concurrent_creates_keep_every_list() {
        let (_dir, backend) = backend();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let backend = backend.clone();
                std::thread::spawn(move || backend.create(details(&format!("L{}", i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(backend.lists().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_blocking_create_then_get() {
        let (_dir, backend) = backend();

        let list = backend
            .blocking(|b| b.create(details("A")))
            .await
            .unwrap();
        let stored = backend
            .blocking(move |b| b.get(&list.list_id))
            .await
            .unwrap();
        assert_eq!(stored.unwrap().list_name, "A");
    }

    #[test]
    fn test_corrupt_collection_is_a_serialization_error() {
        let (dir, backend) = backend();
        std::fs::write(dir.path().join("lists.json"), "{not json").unwrap();

        assert!(matches!(backend.lists(), Err(AppError::Serialization(_))));
        assert!(matches!(
            backend.delete("x"),
            Err(AppError::Serialization(_))
        ));
    }
}
