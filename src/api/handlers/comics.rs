use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::{CurrentUser, MaybeUser};
use crate::api::response::{ApiError, AppJson, AppQuery, JSend};
use crate::service::comics::{
    visible_to, CreateChapterInput, CreateComicInput, UpdateComicInput,
};
use crate::storage::models::{
    Chapter, Comic, ComicStatus, ComicTranslation, SerializationStatus, Tag, Visibility,
};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ComicResponse {
    pub approved_at: Option<String>,
    pub author: String,
    pub banner_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<Chapter>>,
    pub cover_image_url: Option<String>,
    pub created_at: String,
    pub creator_id: String,
    pub id: String,
    pub nsfw: bool,
    pub rejection_reason: Option<String>,
    pub schedule_publish_at: Option<String>,
    pub serialization_status: SerializationStatus,
    pub status: ComicStatus,
    pub tags: Vec<Tag>,
    pub translations: Vec<ComicTranslation>,
    pub updated_at: String,
    pub visibility: Visibility,
}

#[derive(Debug, Serialize)]
pub struct ComicPage {
    pub items: Vec<ComicResponse>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListComicsParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_comics(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListComicsParams>,
) -> Result<Json<JSend<ComicPage>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let comics = state.comics.list_published()?;
    let total = comics.len() as u64;
    let items = comics
        .into_iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .map(|c| comic_to_response(&state, c, None))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JSend::success(ComicPage {
        items,
        pagination: PageInfo {
            limit: params.limit,
            offset: params.offset,
            total,
        },
    }))
}

pub async fn create_comic(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<CreateComicInput>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let comic = state.comics.create_comic(&user.id, req)?;
    Ok(JSend::success(comic_to_response(&state, comic, None)?))
}

pub async fn my_comics(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<JSend<Vec<ComicResponse>>>, ApiError> {
    let items = state
        .comics
        .list_by_creator(&user.id)?
        .into_iter()
        .map(|c| comic_to_response(&state, c, None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JSend::success(items))
}

/// Unpublished comics are only visible to their creator and to admins.
pub async fn get_comic(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let detail = state.comics.get_comic(&id)?;
    if !visible_to(&detail.comic, user.as_ref()) {
        return Err(ApiError::not_found("Comic not found"));
    }

    Ok(JSend::success(comic_to_response(
        &state,
        detail.comic,
        Some(detail.chapters),
    )?))
}

pub async fn update_comic(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateComicInput>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let comic = state.comics.update_comic(&id, &user.id, req)?;
    Ok(JSend::success(comic_to_response(&state, comic, None)?))
}

pub async fn delete_comic(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    state.comics.delete_comic(&id, &user.id)?;
    Ok(JSend::success(()))
}

pub async fn request_publish(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<ComicResponse>>, ApiError> {
    let comic = state.comics.request_publish(&id, &user.id)?;
    Ok(JSend::success(comic_to_response(&state, comic, None)?))
}

pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<CreateChapterInput>,
) -> Result<Json<JSend<Chapter>>, ApiError> {
    let chapter = state.comics.create_chapter(&id, &user.id, req)?;
    Ok(JSend::success(chapter))
}

pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<Chapter>>, ApiError> {
    let chapter = state.comics.get_chapter(&id)?;
    let comic = state.comics.get_comic(&chapter.comic_id)?.comic;
    if !visible_to(&comic, user.as_ref()) {
        return Err(ApiError::not_found("Chapter not found"));
    }

    Ok(JSend::success(chapter))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn comic_to_response(
    state: &AppState,
    comic: Comic,
    chapters: Option<Vec<Chapter>>,
) -> Result<ComicResponse, ApiError> {
    let tags = state.comics.get_tags(&comic.tags)?;

    Ok(ComicResponse {
        approved_at: comic.approved_at.map(|t| t.to_rfc3339()),
        author: comic.author,
        banner_image_url: comic.banner_image_url,
        chapters,
        cover_image_url: comic.cover_image_url,
        created_at: comic.created_at.to_rfc3339(),
        creator_id: comic.creator_id,
        id: comic.id,
        nsfw: comic.nsfw,
        rejection_reason: comic.rejection_reason,
        schedule_publish_at: comic.schedule_publish_at.map(|t| t.to_rfc3339()),
        serialization_status: comic.serialization_status,
        status: comic.status,
        tags,
        translations: comic.translations,
        updated_at: comic.updated_at.to_rfc3339(),
        visibility: comic.visibility,
    })
}
