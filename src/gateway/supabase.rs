use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;

use super::{public_url, StorageError, StorageGateway};

/// Supabase Storage backend, authenticated with the project's service role key.
pub struct SupabaseGateway {
    client: Client,
    project_url: String,
    service_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest<'a> {
    bucket_id: &'a str,
    source_key: &'a str,
    destination_key: &'a str,
}

impl SupabaseGateway {
    pub fn new(project_url: &str, service_key: &str) -> Result<Self, anyhow::Error> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            project_url: project_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.project_url)
    }

    fn move_url(&self) -> String {
        format!("{}/storage/v1/object/move", self.project_url)
    }
}

#[async_trait]
impl StorageGateway for SupabaseGateway {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let resp = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Backend(format!(
                "storage provider rejected upload ({status}): {body}"
            )));
        }

        Ok(public_url(&self.project_url, bucket, path))
    }

    async fn move_object(&self, bucket: &str, src: &str, dest: &str) -> Result<(), StorageError> {
        let resp = self
            .client
            .post(self.move_url())
            .bearer_auth(&self.service_key)
            .json(&MoveRequest {
                bucket_id: bucket,
                source_key: src,
                destination_key: dest,
            })
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(src.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Backend(format!(
                "storage provider rejected move ({status}): {body}"
            )));
        }

        Ok(())
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError> {
        let resp = self
            .client
            .get(self.object_url(bucket, path))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(path.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Backend(format!(
                "storage download failed ({status}): {body}"
            )));
        }

        resp.bytes()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}
