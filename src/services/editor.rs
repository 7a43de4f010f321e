//! List editor workflow
//!
//! Holds the draft of one list (name, description, ordered listings) next to the last
//! saved baseline, applies user edits to the draft and hands whole-list snapshots to the
//! bound backend on save.

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{Credential, List, ListDetails, ListLocation, Listing},
    services::{backends::ListBackend, notifications::NotificationQueue},
};

pub const BLANK_NAME_MESSAGE: &str = "List name must not be blank.";
pub const EMPTY_LIST_MESSAGE: &str = "List must have at least one movie or TV show.";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditorStatus {
    /// Draft matches the last saved baseline
    Clean,
    /// Draft has unsaved changes
    Editing,
    /// Last save or delete failed; draft untouched
    Failed,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub list_id: String,
    /// True when the save created the list
    pub created: bool,
}

#[derive(Debug)]
pub struct ListEditor {
    backend: ListBackend,
    list_id: Option<String>,
    owner_username: Option<String>,
    draft: ListDetails,
    baseline: ListDetails,
    edited: bool,
    status: EditorStatus,
    notifications: NotificationQueue,
}

impl ListEditor {
    /// Editor for a list that has not been persisted yet
    pub fn new_list(backend: ListBackend) -> Self {
        Self {
            backend,
            list_id: None,
            owner_username: None,
            draft: ListDetails::default(),
            baseline: ListDetails::default(),
            edited: false,
            status: EditorStatus::Clean,
            notifications: NotificationQueue::new(),
        }
    }

    /// Editor for a list fetched from `backend`
    ///
    /// Listings stored without an in-list id get one so they can be reordered.
    pub fn open(mut list: List, backend: ListBackend) -> Self {
        for listing in list.listings.iter_mut() {
            if listing.id_within_list.is_none() {
                *listing = listing.clone().with_new_list_id();
            }
        }

        let details = ListDetails::from(&list);
        Self {
            backend,
            list_id: Some(list.list_id),
            owner_username: Some(list.owner_username),
            draft: details.clone(),
            baseline: details,
            edited: false,
            status: EditorStatus::Clean,
            notifications: NotificationQueue::new(),
        }
    }

    pub fn location(&self) -> ListLocation {
        self.backend.location()
    }

    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }

    pub fn owner_username(&self) -> Option<&str> {
        self.owner_username.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.draft.list_name
    }

    pub fn description(&self) -> &str {
        &self.draft.list_description
    }

    pub fn listings(&self) -> &[Listing] {
        &self.draft.listings
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    /// The saved list as of the last successful save, if it has one
    pub fn saved_list(&self) -> Option<List> {
        let list_id = self.list_id.clone()?;
        let owner = self.owner_username.clone().unwrap_or_default();
        Some(self.baseline.clone().into_list(list_id, owner))
    }

    /// Local lists are always editable; server lists only by their owner
    pub fn can_edit(&self, credential: Option<&Credential>) -> bool {
        match self.location() {
            ListLocation::LocalStorage => true,
            ListLocation::Server => match (credential, self.owner_username.as_deref()) {
                (Some(credential), Some(owner)) => credential.username == owner,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }

    /// Whether the name allows saving
    pub fn can_save(&self) -> bool {
        !self.draft.list_name.is_empty()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.draft.list_name {
            self.draft.list_name = name;
            self.mark_edited();
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        if description != self.draft.list_description {
            self.draft.list_description = description;
            self.mark_edited();
        }
    }

    /// Appends a search result under a fresh in-list id and returns the stored entry
    pub fn add_listing(&mut self, listing: Listing) -> Listing {
        let listing = listing.with_new_list_id();
        self.draft.listings.push(listing.clone());
        self.mark_edited();
        listing
    }

    /// Removes the entry with the same in-list id. Returns false if it was not present.
    pub fn remove_listing(&mut self, listing: &Listing) -> bool {
        let before = self.draft.listings.len();
        self.draft.listings.retain(|l| !l.same_entry(listing));

        let removed = self.draft.listings.len() != before;
        if removed {
            self.mark_edited();
        }
        removed
    }

    /// Exchanges the entries at `a` and `b`
    ///
    /// Ignored when either index is negative or equal to the length. That guard is what
    /// boundary navigation relies on (first item up, last item down) and is kept exactly.
    /// Indices past the length are ignored as well.
    pub fn swap_listings(&mut self, a: isize, b: isize) -> bool {
        let len = self.draft.listings.len() as isize;
        if a < 0 || b < 0 || a == len || b == len {
            return false;
        }
        if a > len || b > len || a == b {
            return false;
        }

        self.draft.listings.swap(a as usize, b as usize);
        self.mark_edited();
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        self.swap_listings(index as isize, index as isize - 1)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        self.swap_listings(index as isize, index as isize + 1)
    }

    /// Moves `dragged` so it ends up at `target_index`
    ///
    /// The target is an index into the sequence with the dragged entry already removed.
    /// Targets past the end append. An entry that is not in the list is ignored.
    pub fn reorder_by_drag(&mut self, dragged: &Listing, target_index: usize) -> bool {
        let Some(prev_index) = self
            .draft
            .listings
            .iter()
            .position(|l| l.same_entry(dragged))
        else {
            tracing::warn!(
                id_within_list = ?dragged.id_within_list,
                "Dropped listing is not part of this list"
            );
            return false;
        };

        let item = self.draft.listings.remove(prev_index);
        let new_index = target_index.min(self.draft.listings.len());
        self.draft.listings.insert(new_index, item);

        if new_index != prev_index {
            self.mark_edited();
        }
        true
    }

    /// Restores name, description and listings from the last saved baseline
    pub fn revert(&mut self) {
        self.draft = self.baseline.clone();
        self.edited = false;
        self.status = EditorStatus::Clean;
    }

    /// Checks the draft can be persisted
    pub fn validate(&self) -> AppResult<()> {
        if self.draft.list_name.is_empty() {
            return Err(AppError::Validation(BLANK_NAME_MESSAGE.to_string()));
        }
        if self.draft.listings.is_empty() {
            return Err(AppError::Validation(EMPTY_LIST_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Persists the draft through the bound backend
    ///
    /// Creates the list on first save and updates it afterwards. On failure a red
    /// notification is queued, the draft and dirty flag stay as they were, and the error
    /// is returned.
    pub async fn save(&mut self, credential: Option<&Credential>) -> AppResult<SaveOutcome> {
        self.settle();

        if let Err(e) = self.validate() {
            tracing::warn!(error = %e, "List failed validation, not saving");
            return Err(self.fail_save(e));
        }

        let details = self.draft.clone();
        let result = match self.list_id.clone() {
            None => self
                .backend
                .create(details, credential)
                .await
                .map(|list| (list.list_id, Some(list.owner_username), true)),
            Some(list_id) => {
                let updated = self.backend.update(&list_id, details, credential).await;
                updated.map(|()| (list_id, self.owner_username.clone(), false))
            }
        };

        match result {
            Ok((list_id, owner_username, created)) => {
                self.list_id = Some(list_id.clone());
                self.owner_username = owner_username;
                self.baseline = self.draft.clone();
                self.edited = false;
                self.status = EditorStatus::Clean;

                tracing::info!(
                    list_id = %list_id,
                    location = %self.location(),
                    created,
                    "List saved"
                );
                Ok(SaveOutcome { list_id, created })
            }
            Err(e) => {
                tracing::error!(error = %e, location = %self.location(), "Error saving list");
                Err(self.fail_save(e))
            }
        }
    }

    /// Deletes the list through the bound backend
    ///
    /// `Ok` means the caller should navigate away from the list view. A missing or
    /// corrupt local collection is logged and still counts as deleted.
    pub async fn delete(&mut self, credential: Option<&Credential>) -> AppResult<()> {
        self.settle();

        let Some(list_id) = self.list_id.clone() else {
            tracing::debug!("Deleting a list that was never saved");
            return Ok(());
        };

        match self.backend.delete(&list_id, credential).await {
            Ok(()) => {
                tracing::info!(list_id = %list_id, location = %self.location(), "List deleted");
                Ok(())
            }
            Err(e @ (AppError::LocalStorage(_) | AppError::Serialization(_)))
                if self.location() == ListLocation::LocalStorage =>
            {
                tracing::error!(error = %e, list_id = %list_id, "Local lists unreadable during delete");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, list_id = %list_id, "Error deleting list");
                self.notifications.error(e.delete_message());
                self.status = EditorStatus::Failed;
                Err(e)
            }
        }
    }

    fn fail_save(&mut self, e: AppError) -> AppError {
        self.notifications.error(e.save_message());
        self.status = EditorStatus::Failed;
        e
    }

    fn mark_edited(&mut self) {
        self.edited = true;
        self.status = EditorStatus::Editing;
    }

    /// Leaves `Failed` for the state the draft is actually in
    fn settle(&mut self) {
        self.status = if self.edited {
            EditorStatus::Editing
        } else {
            EditorStatus::Clean
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::LocalStorage,
        models::{MediaType, LOCAL_OWNER},
        services::backends::{LocalBackend, RemoteBackend},
    };
    use tempfile::{tempdir, TempDir};

    fn listing(id: u64, title: &str) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            img_url: None,
            media_type: MediaType::Movie,
            id_within_list: None,
        }
    }

    fn local_backend() -> (TempDir, LocalBackend) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        (dir, LocalBackend::new(storage))
    }

    fn editor_with(titles: &[&str]) -> (TempDir, ListEditor) {
        let (dir, backend) = local_backend();
        let mut editor = ListEditor::new_list(backend.into());
        for (i, title) in titles.iter().enumerate() {
            editor.add_listing(listing(i as u64, title));
        }
        (dir, editor)
    }

    fn titles(editor: &ListEditor) -> Vec<&str> {
        editor.listings().iter().map(|l| l.title.as_str()).collect()
    }

    #[test]
    fn test_new_editor_is_clean() {
        let (_dir, editor) = editor_with(&[]);
        assert_eq!(editor.status(), EditorStatus::Clean);
        assert!(!editor.is_edited());
        assert!(!editor.can_save());
        assert_eq!(editor.location(), ListLocation::LocalStorage);
    }

    #[test]
    fn test_set_name_marks_edited_and_enables_save() {
        let (_dir, mut editor) = editor_with(&[]);
        editor.set_name("Weekend");
        assert!(editor.can_save());
        assert!(editor.is_edited());
        assert_eq!(editor.status(), EditorStatus::Editing);

        editor.set_name("");
        assert!(!editor.can_save());
    }

    #[test]
    fn test_add_listing_assigns_unique_ids() {
        let (_dir, mut editor) = editor_with(&[]);
        let a = editor.add_listing(listing(603, "The Matrix"));
        let b = editor.add_listing(listing(603, "The Matrix"));
        assert!(a.id_within_list.is_some());
        assert_ne!(a.id_within_list, b.id_within_list);
        assert_eq!(editor.listings().len(), 2);
    }

    #[test]
    fn test_remove_listing_is_idempotent() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c"]);
        let b = editor.listings()[1].clone();

        assert!(editor.remove_listing(&b));
        assert_eq!(titles(&editor), vec!["a", "c"]);

        assert!(!editor.remove_listing(&b));
        assert_eq!(titles(&editor), vec!["a", "c"]);
    }

    #[test]
    fn test_swap_twice_is_identity_for_all_valid_pairs() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c", "d"]);
        let original = editor.listings().to_vec();
        let len = original.len() as isize;

        for a in 0..len {
            for b in 0..len {
                editor.swap_listings(a, b);
                editor.swap_listings(a, b);
                assert_eq!(editor.listings(), original.as_slice(), "pair ({}, {})", a, b);
            }
        }
    }

    #[test]
    fn test_swap_out_of_range_is_ignored() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c"]);
        let original = editor.listings().to_vec();

        for (a, b) in [(-1, 0), (0, -1), (3, 0), (0, 3), (0, 7), (-5, 3)] {
            assert!(!editor.swap_listings(a, b));
            assert_eq!(editor.listings(), original.as_slice());
        }
    }

    #[test]
    fn test_swap_last_index_is_accepted() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c"]);
        assert!(editor.swap_listings(2, 0));
        assert_eq!(titles(&editor), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_move_up_and_down_at_boundaries() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c"]);

        assert!(!editor.move_up(0));
        assert!(!editor.move_down(2));
        assert_eq!(titles(&editor), vec!["a", "b", "c"]);

        assert!(editor.move_down(0));
        assert_eq!(titles(&editor), vec!["b", "a", "c"]);
        assert!(editor.move_up(2));
        assert_eq!(titles(&editor), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_index_is_relative_to_list_without_item() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c", "d"]);
        let a = editor.listings()[0].clone();

        // without "a" the list is [b, c, d]; index 2 lands before "d"
        editor.reorder_by_drag(&a, 2);
        assert_eq!(titles(&editor), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_reorder_past_end_appends() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c"]);
        let a = editor.listings()[0].clone();

        editor.reorder_by_drag(&a, 10);
        assert_eq!(titles(&editor), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_then_back_restores_order() {
        let (_dir, mut editor) = editor_with(&["a", "b", "c", "d", "e"]);
        let original = editor.listings().to_vec();

        for original_index in 0..original.len() {
            for target in 0..original.len() {
                let item = original[original_index].clone();
                editor.reorder_by_drag(&item, target);
                editor.reorder_by_drag(&item, original_index);
                assert_eq!(editor.listings(), original.as_slice());
            }
        }
    }

    #[test]
    fn test_reorder_unknown_listing_is_ignored() {
        let (_dir, mut editor) = editor_with(&["a", "b"]);
        let stranger = listing(9, "z").with_new_list_id();

        assert!(!editor.reorder_by_drag(&stranger, 0));
        assert_eq!(titles(&editor), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_local_save_then_read_back() {
        let (_dir, backend) = local_backend();
        let mut editor = ListEditor::new_list(backend.clone().into());
        editor.set_name("A");
        editor.add_listing(listing(603, "The Matrix"));

        let outcome = editor.save(None).await.unwrap();
        assert!(outcome.created);
        assert!(!editor.is_edited());
        assert_eq!(editor.status(), EditorStatus::Clean);

        let stored = backend.lists().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].list_id, outcome.list_id);
        assert_eq!(stored[0].owner_username, LOCAL_OWNER);
        assert_eq!(Some(stored[0].clone()), editor.saved_list());
    }

    #[tokio::test]
    async fn test_second_save_updates_same_list() {
        let (_dir, backend) = local_backend();
        let mut editor = ListEditor::new_list(backend.clone().into());
        editor.set_name("A");
        editor.add_listing(listing(603, "The Matrix"));
        let first = editor.save(None).await.unwrap();

        editor.set_description("for friday");
        let second = editor.save(None).await.unwrap();

        assert!(!second.created);
        assert_eq!(first.list_id, second.list_id);
        let stored = backend.lists().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].list_description, "for friday");
    }

    #[tokio::test]
    async fn test_empty_listings_rejected_and_storage_unchanged() {
        let (_dir, backend) = local_backend();
        let mut editor = ListEditor::new_list(backend.clone().into());
        editor.set_name("A");
        let x = editor.add_listing(listing(603, "The Matrix"));
        editor.save(None).await.unwrap();
        let before = backend.lists().unwrap();

        editor.remove_listing(&x);
        let result = editor.save(None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.lists().unwrap(), before);
        assert_eq!(editor.status(), EditorStatus::Failed);
        assert!(editor.is_edited());
        assert_eq!(
            editor.notifications().latest().unwrap().message,
            EMPTY_LIST_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (_dir, mut editor) = editor_with(&["a"]);
        let result = editor.save(None).await;
        assert!(matches!(result, Err(AppError::Validation(ref m)) if m == BLANK_NAME_MESSAGE));
    }

    #[tokio::test]
    async fn test_failed_status_clears_on_retry() {
        let (_dir, mut editor) = editor_with(&["a"]);
        assert!(editor.save(None).await.is_err());
        assert_eq!(editor.status(), EditorStatus::Failed);

        editor.set_name("A");
        editor.save(None).await.unwrap();
        assert_eq!(editor.status(), EditorStatus::Clean);
    }

    #[tokio::test]
    async fn test_revert_restores_baseline() {
        let (_dir, mut editor) = editor_with(&["a", "b"]);
        editor.set_name("A");
        editor.save(None).await.unwrap();

        editor.set_name("Renamed");
        editor.move_down(0);
        let b = editor.listings()[0].clone();
        editor.remove_listing(&b);
        assert!(editor.is_edited());

        editor.revert();
        assert_eq!(editor.name(), "A");
        assert_eq!(titles(&editor), vec!["a", "b"]);
        assert!(!editor.is_edited());
        assert_eq!(editor.status(), EditorStatus::Clean);
    }

    #[tokio::test]
    async fn test_local_delete_removes_list() {
        let (_dir, backend) = local_backend();
        let mut editor = ListEditor::new_list(backend.clone().into());
        editor.set_name("A");
        editor.add_listing(listing(1, "a"));
        editor.save(None).await.unwrap();

        editor.delete(None).await.unwrap();
        assert!(backend.lists().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_delete_with_missing_collection_still_navigates() {
        let (_dir, backend) = local_backend();
        let list = List {
            list_id: "gone".to_string(),
            list_name: "A".to_string(),
            list_description: String::new(),
            owner_username: LOCAL_OWNER.to_string(),
            listings: vec![listing(1, "a")],
        };
        let mut editor = ListEditor::open(list, backend.into());

        assert!(editor.delete(None).await.is_ok());
        assert!(editor.notifications().is_empty());
    }

    #[test]
    fn test_open_assigns_missing_list_ids() {
        let (_dir, backend) = local_backend();
        let list = List {
            list_id: "l1".to_string(),
            list_name: "A".to_string(),
            list_description: String::new(),
            owner_username: LOCAL_OWNER.to_string(),
            listings: vec![listing(1, "a"), listing(2, "b")],
        };
        let editor = ListEditor::open(list, backend.into());

        assert!(editor.listings().iter().all(|l| l.id_within_list.is_some()));
        assert!(!editor.is_edited());
        assert_eq!(editor.list_id(), Some("l1"));
    }

    #[test]
    fn test_can_edit_rules() {
        let (_dir, local) = local_backend();
        let local_editor = ListEditor::new_list(local.into());
        assert!(local_editor.can_edit(None));

        let list = List {
            list_id: "l1".to_string(),
            list_name: "A".to_string(),
            list_description: String::new(),
            owner_username: "ana".to_string(),
            listings: vec![],
        };
        let remote = RemoteBackend::new("http://127.0.0.1:9".to_string());
        let server_editor = ListEditor::open(list, remote.into());

        assert!(server_editor.can_edit(Some(&Credential::new("ana", "t"))));
        assert!(!server_editor.can_edit(Some(&Credential::new("bo", "t"))));
        assert!(!server_editor.can_edit(None));
    }

    #[tokio::test]
    async fn test_remote_save_without_credential_prompts_sign_in() {
        let remote = RemoteBackend::new("http://127.0.0.1:9".to_string());
        let mut editor = ListEditor::new_list(remote.into());
        editor.set_name("A");
        editor.add_listing(listing(1, "a"));
        let before = editor.listings().to_vec();

        let result = editor.save(None).await;

        assert!(matches!(result, Err(AppError::MissingCredential)));
        assert_eq!(editor.listings(), before.as_slice());
        assert!(editor.is_edited());
        assert_eq!(
            editor.notifications().latest().unwrap().message,
            crate::error::SIGN_IN_MESSAGE
        );
    }
}
