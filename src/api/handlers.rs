use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentCredential;
use crate::models::{Credential, List, ListLocation, Listing};
use crate::services::{EditorStatus, ListEditor, Notification, SearchQuery};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenEditorRequest {
    pub location: ListLocation,
    /// Id of a local list to open
    #[serde(default)]
    pub list_id: Option<String>,
    /// Server list already fetched by the caller
    #[serde(default)]
    pub list: Option<List>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    pub list_name: Option<String>,
    pub list_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub a: isize,
    pub b: isize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub id_within_list: String,
    pub target_index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorResponse {
    pub session_id: Uuid,
    pub location: ListLocation,
    pub list_id: Option<String>,
    pub owner_username: Option<String>,
    pub list_name: String,
    pub list_description: String,
    pub listings: Vec<Listing>,
    pub edited: bool,
    pub status: EditorStatus,
    pub can_save: bool,
    pub can_edit: bool,
}

impl EditorResponse {
    fn new(session_id: Uuid, editor: &ListEditor, credential: Option<&Credential>) -> Self {
        Self {
            session_id,
            location: editor.location(),
            list_id: editor.list_id().map(str::to_string),
            owner_username: editor.owner_username().map(str::to_string),
            list_name: editor.name().to_string(),
            list_description: editor.description().to_string(),
            listings: editor.listings().to_vec(),
            edited: editor.is_edited(),
            status: editor.status(),
            can_save: editor.can_save(),
            can_edit: editor.can_edit(credential),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub list_id: String,
    pub created: bool,
    pub editor: EditorResponse,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Search the media catalog
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = state.catalog.search(&query).await?;
    Ok(Json(listings))
}

/// Get every list in device-local storage
pub async fn get_local_lists(State(state): State<AppState>) -> AppResult<Json<Vec<List>>> {
    let lists = state.local.blocking(|local| local.lists()).await?;
    Ok(Json(lists))
}

/// Get one list from device-local storage
pub async fn get_local_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> AppResult<Json<List>> {
    let lookup = list_id.clone();
    state
        .local
        .blocking(move |local| local.get(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("List {}", list_id)))
}

/// Open an editor on a new or existing list
pub async fn open_editor(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Json(request): Json<OpenEditorRequest>,
) -> AppResult<(StatusCode, Json<EditorResponse>)> {
    let backend = state.backend_for(request.location);

    let editor = match (request.location, request.list_id, request.list) {
        (ListLocation::LocalStorage, Some(list_id), _) => {
            let lookup = list_id.clone();
            let list = state
                .local
                .blocking(move |local| local.get(&lookup))
                .await?
                .ok_or_else(|| AppError::NotFound(format!("List {}", list_id)))?;
            ListEditor::open(list, backend)
        }
        (ListLocation::LocalStorage, None, Some(_)) => {
            return Err(AppError::InvalidInput(
                "Local lists are opened by listId and re-read from storage".to_string(),
            ));
        }
        (ListLocation::Server, _, Some(list)) => ListEditor::open(list, backend),
        (ListLocation::Server, Some(_), None) => {
            return Err(AppError::InvalidInput(
                "Server lists must be opened with the fetched list".to_string(),
            ));
        }
        _ => ListEditor::new_list(backend),
    };

    let response_editor = EditorResponse::new(Uuid::nil(), &editor, credential.credential());
    let session_id = state.insert_editor(editor).await;

    tracing::info!(
        session_id = %session_id,
        location = %response_editor.location,
        list_id = ?response_editor.list_id,
        "Editor opened"
    );

    Ok((
        StatusCode::CREATED,
        Json(EditorResponse {
            session_id,
            ..response_editor
        }),
    ))
}

/// Get the current draft of an editor
pub async fn get_editor(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let editor = session.lock().await;
    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Rename or re-describe the list
pub async fn update_details(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UpdateDetailsRequest>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    if let Some(name) = request.list_name {
        editor.set_name(name);
    }
    if let Some(description) = request.list_description {
        editor.set_description(description);
    }

    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Add a search result to the list
pub async fn add_listing(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
    Json(listing): Json<Listing>,
) -> AppResult<(StatusCode, Json<EditorResponse>)> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    editor.add_listing(listing);

    Ok((
        StatusCode::CREATED,
        Json(EditorResponse::new(
            session_id,
            &editor,
            credential.credential(),
        )),
    ))
}

/// Remove an entry from the list. Unknown entries are ignored.
pub async fn remove_listing(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path((session_id, id_within_list)): Path<(Uuid, String)>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    if let Some(listing) = find_entry(&editor, &id_within_list) {
        editor.remove_listing(&listing);
    }

    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Swap two positions
pub async fn swap_listings(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SwapRequest>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    editor.swap_listings(request.a, request.b);

    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Drop an entry at a new position
pub async fn reorder_listing(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    let listing = find_entry(&editor, &request.id_within_list).ok_or_else(|| {
        AppError::NotFound(format!("Listing {} in this list", request.id_within_list))
    })?;
    editor.reorder_by_drag(&listing, request.target_index);

    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Persist the draft
pub async fn save_list(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SaveResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    let outcome = editor.save(credential.credential()).await?;

    Ok(Json(SaveResponse {
        list_id: outcome.list_id,
        created: outcome.created,
        editor: EditorResponse::new(session_id, &editor, credential.credential()),
    }))
}

/// Discard unsaved changes
pub async fn revert_list(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<EditorResponse>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    ensure_can_edit(&editor, credential.credential())?;

    editor.revert();

    Ok(Json(EditorResponse::new(
        session_id,
        &editor,
        credential.credential(),
    )))
}

/// Delete the list and close the editor
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(credential): Extension<CurrentCredential>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let session = state.editor(session_id).await?;
    {
        let mut editor = session.lock().await;
        ensure_can_edit(&editor, credential.credential())?;
        editor.delete(credential.credential()).await?;
    }

    state.close_editor(session_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Close an editor session without touching the list
pub async fn close_editor(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.close_editor(session_id).await {
        return Err(AppError::NotFound(format!("Editor session {}", session_id)));
    }
    tracing::info!(session_id = %session_id, "Editor closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Take the pending notifications of an editor
pub async fn drain_notifications(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<Vec<Notification>>> {
    let session = state.editor(session_id).await?;
    let mut editor = session.lock().await;
    Ok(Json(editor.notifications_mut().drain()))
}

/// Mutations are refused for server lists the caller does not own
fn ensure_can_edit(editor: &ListEditor, credential: Option<&Credential>) -> AppResult<()> {
    if editor.can_edit(credential) {
        return Ok(());
    }
    match credential {
        None => Err(AppError::MissingCredential),
        Some(credential) => Err(AppError::NotOwner(credential.username.clone())),
    }
}

fn find_entry(editor: &ListEditor, id_within_list: &str) -> Option<Listing> {
    editor
        .listings()
        .iter()
        .find(|l| l.id_within_list.as_deref() == Some(id_within_list))
        .cloned()
}
