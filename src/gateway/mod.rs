mod local;
mod supabase;

pub use local::LocalGateway;
pub use supabase::SupabaseGateway;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Remote blob storage for comic media.
///
/// Paths are bucket-relative (`drafts/<user>/<uuid>.png`). Every call blocks the
/// calling request until the backend answers; there is no retry.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Store `data` at `path` and return its public URL.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Relocate an object within a bucket.
    async fn move_object(&self, bucket: &str, src: &str, dest: &str) -> Result<(), StorageError>;

    async fn get(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError>;
}

/// `{base}/storage/v1/object/public/{bucket}/{path}`
pub fn public_url(base: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{path}",
        base.trim_end_matches('/')
    )
}
