use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::comics::{comic_to_response, ComicResponse};
use crate::api::auth::RequireAdmin;
use crate::api::response::{ApiError, AppJson, JSend};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectComicRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub chapters_deleted: u64,
    pub comics_deleted: u64,
    pub folders_deleted: u64,
    pub tags_deleted: u64,
    pub users_deleted: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<JSend<Vec<ComicResponse>>>, ApiError> {
    let items = state
        .comics
        .list_pending()?
        .into_iter()
        .map(|c| comic_to_response(&state, c, None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JSend::success(items))
}

pub async fn approve_comic(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let detail = state.comics.approve_comic(&id).await?;
    tracing::info!(comic_id = %id, admin_id = %admin.id, "Approved comic");
    Ok(JSend::success(comic_to_response(
        &state,
        detail.comic,
        Some(detail.chapters),
    )?))
}

pub async fn reject_comic(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    AppJson(req): AppJson<RejectComicRequest>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let comic = state.comics.reject_comic(&id, &req.reason)?;
    tracing::info!(comic_id = %id, admin_id = %admin.id, "Rejected comic");
    Ok(JSend::success(comic_to_response(&state, comic, None)?))
}

pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<PurgeResponse>>, ApiError> {
    let stats = state
        .db
        .purge_all()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::warn!(
        comics = stats.comics,
        chapters = stats.chapters,
        users = stats.users,
        "Purged all data"
    );

    Ok(JSend::success(PurgeResponse {
        chapters_deleted: stats.chapters,
        comics_deleted: stats.comics,
        folders_deleted: stats.folders,
        tags_deleted: stats.tags,
        users_deleted: stats.users,
    }))
}
