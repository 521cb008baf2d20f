use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::assets::{AssetTier, MEDIA_BUCKET};
use crate::error::{DomainError, DomainResult};
use crate::gateway::StorageGateway;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Validates image uploads and stores them in the draft tier of the media bucket.
pub struct UploadGatekeeper {
    storage: Arc<dyn StorageGateway>,
}

impl UploadGatekeeper {
    pub fn new(storage: Arc<dyn StorageGateway>) -> Self {
        Self { storage }
    }

    /// Store an image under `drafts/<user_id>/<uuid>.<ext>` and return its public URL.
    ///
    /// Type and size are checked before anything is sent to storage.
    pub async fn upload_file(
        &self,
        user_id: &str,
        filename: &str,
        data: Bytes,
        content_type: &str,
    ) -> DomainResult<String> {
        if user_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("user id required".to_string()));
        }
        if filename.trim().is_empty() {
            return Err(DomainError::InvalidInput("filename required".to_string()));
        }

        let extension = validate_extension(filename)?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(DomainError::FileTooLarge {
                size: data.len(),
                max: MAX_UPLOAD_BYTES,
            });
        }

        let content_type = match content_type {
            "" | "application/octet-stream" => mime_guess::from_ext(&extension)
                .first_or_octet_stream()
                .to_string(),
            other => other.to_string(),
        };

        let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());
        let path = AssetTier::Draft.object_path(user_id, &file_name);
        let byte_size = data.len();

        let url = self
            .storage
            .upload(MEDIA_BUCKET, &path, data, &content_type)
            .await?;

        debug!(user_id = %user_id, path = %path, byte_size, "Uploaded draft asset");
        Ok(url)
    }
}

/// Lowercased extension of `filename` if it is an allowed image type.
fn validate_extension(filename: &str) -> DomainResult<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(DomainError::InvalidFileType(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert_eq!(validate_extension("Cover.PNG").unwrap(), "png");
        assert_eq!(validate_extension("a.b.JpEg").unwrap(), "jpeg");
        assert_eq!(validate_extension("anim.gif").unwrap(), "gif");
    }

    #[test]
    fn rejects_non_image_extensions() {
        for name in ["script.exe", "notes.txt", "noext", "archive.png.zip"] {
            assert!(matches!(
                validate_extension(name),
                Err(DomainError::InvalidFileType(_))
            ));
        }
    }
}
