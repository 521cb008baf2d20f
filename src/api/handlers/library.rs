use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::{CurrentUser, MaybeUser};
use crate::api::response::{ApiError, AppJson, JSend};
use crate::service::library::LibraryEntry;
use crate::storage::models::LibraryFolder;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub created_at: String,
    pub description: Option<String>,
    pub id: String,
    pub is_default: bool,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LibraryEntry>>,
    pub name: String,
    pub slug: String,
    pub updated_at: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddComicRequest {
    pub comic_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

// ============================================================================
// Library
// ============================================================================

pub async fn get_library(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<JSend<Vec<LibraryEntry>>>, ApiError> {
    Ok(JSend::success(state.library.get_library(&user.id)?))
}

pub async fn add_to_library(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<AddComicRequest>,
) -> Result<Json<JSend<Vec<LibraryEntry>>>, ApiError> {
    state.library.add_to_library(&user.id, &req.comic_id)?;
    Ok(JSend::success(state.library.get_library(&user.id)?))
}

pub async fn remove_from_library(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(comic_id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    state.library.remove_from_library(&user.id, &comic_id)?;
    Ok(JSend::success(()))
}

// ============================================================================
// Folders
// ============================================================================

pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<JSend<Vec<FolderResponse>>>, ApiError> {
    let folders = state
        .library
        .get_user_folders(&user.id)?
        .into_iter()
        .map(|f| folder_to_response(f, None))
        .collect();
    Ok(JSend::success(folders))
}

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<CreateFolderRequest>,
) -> Result<Json<JSend<FolderResponse>>, ApiError> {
    let folder = state
        .library
        .create_folder(&user.id, &req.name, req.description, req.is_public)?;
    Ok(JSend::success(folder_to_response(folder, Some(Vec::new()))))
}

pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<FolderResponse>>, ApiError> {
    let folder = state.library.get_folder(&user.id, &id)?;
    let items = state.library.resolve_items(&folder, Some(&user))?;
    Ok(JSend::success(folder_to_response(folder, Some(items))))
}

pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    state.library.delete_folder(&user.id, &id)?;
    Ok(JSend::success(()))
}

pub async fn add_to_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<AddComicRequest>,
) -> Result<Json<JSend<FolderResponse>>, ApiError> {
    state.library.add_to_folder(&user.id, &id, &req.comic_id)?;
    let folder = state.library.get_folder(&user.id, &id)?;
    let items = state.library.resolve_items(&folder, Some(&user))?;
    Ok(JSend::success(folder_to_response(folder, Some(items))))
}

pub async fn remove_from_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((id, comic_id)): Path<(String, String)>,
) -> Result<Json<JSend<()>>, ApiError> {
    state.library.remove_from_folder(&user.id, &id, &comic_id)?;
    Ok(JSend::success(()))
}

/// Shared folder by slug. No identity required; anonymous readers only see
/// published comics.
pub async fn get_public_folder(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
) -> Result<Json<JSend<FolderResponse>>, ApiError> {
    let folder = state.library.get_public_folder(&slug)?;
    let items = state.library.resolve_items(&folder, user.as_ref())?;
    Ok(JSend::success(folder_to_response(folder, Some(items))))
}

fn folder_to_response(folder: LibraryFolder, items: Option<Vec<LibraryEntry>>) -> FolderResponse {
    FolderResponse {
        created_at: folder.created_at.to_rfc3339(),
        description: folder.description,
        id: folder.id,
        is_default: folder.is_default,
        is_public: folder.is_public,
        items,
        name: folder.name,
        slug: folder.slug,
        updated_at: folder.updated_at.to_rfc3339(),
        user_id: folder.user_id,
    }
}
