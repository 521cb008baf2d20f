use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use crate::api::auth::CurrentUser;
use crate::api::response::{ApiError, JSend};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Multipart image upload. The target bucket and folder are chosen by the
/// server; a client-supplied `bucket` field is ignored.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<JSend<UploadResponse>>, ApiError> {
    let mut file_data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut file_content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        file_name = field.file_name().map(|s| s.to_string());
        file_content_type = field.content_type().map(|s| s.to_string());
        file_data = Some(
            field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?,
        );
    }

    let data = file_data.ok_or_else(|| ApiError::bad_request("file field is required"))?;
    let file_name = file_name.ok_or_else(|| ApiError::bad_request("file name is required"))?;

    let url = state
        .uploads
        .upload_file(
            &user.id,
            &file_name,
            data,
            file_content_type.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(JSend::success(UploadResponse { url }))
}
