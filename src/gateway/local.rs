use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

use super::{public_url, StorageError, StorageGateway};

/// Local filesystem storage for development and testing.
/// Objects live at `<base_path>/<bucket>/<path>`.
pub struct LocalGateway {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalGateway {
    pub fn new<P: AsRef<Path>>(base_path: P, public_base_url: &str) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(bucket).join(path);
        // Keep every object inside the storage root
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Backend(format!("invalid object path: {path}")));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl StorageGateway for LocalGateway {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &data).await?;
        Ok(public_url(&self.public_base_url, bucket, path))
    }

    async fn move_object(&self, bucket: &str, src: &str, dest: &str) -> Result<(), StorageError> {
        let from = self.object_path(bucket, src)?;
        if !from.exists() {
            return Err(StorageError::NotFound(src.to_string()));
        }
        let to = self.object_path(bucket, dest)?;
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&from, &to).await?;
        Ok(())
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError> {
        let target = self.object_path(bucket, path)?;
        if !target.exists() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        let data = tokio::fs::read(&target).await?;
        Ok(Bytes::from(data))
    }
}
