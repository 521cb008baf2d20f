use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::assets::{AssetTier, MEDIA_BUCKET};
use crate::gateway::StorageError;
use crate::AppState;

/// Serve a promoted object at the URL the gateway handed out.
/// Route: GET /storage/v1/object/public/:bucket/*path
///
/// Only public-tier paths in the media bucket resolve; drafts stay private
/// until approval moves them.
pub async fn serve_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let path = path.trim_start_matches('/');
    match AssetTier::parse(path) {
        Some((AssetTier::Public, _)) if bucket == MEDIA_BUCKET => {}
        _ => return Err(ApiError::not_found("Object not found")),
    }

    let data = state
        .storage
        .get(&bucket, path)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Object not found"),
            _ => ApiError::bad_gateway(format!("Failed to retrieve object: {e}")),
        })?;

    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let byte_size = data.len() as u64;

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    if let Ok(value) = content_type.as_ref().parse() {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));

    // Promoted objects are never rewritten in place
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}
