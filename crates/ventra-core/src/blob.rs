//! Blob store client (Supabase Storage).
//!
//! Only uploads: CSV ingestion drops a file into a bucket and hands the
//! object key to the processing API. Nothing here reads objects back.

use crate::error::{Result, VentraError};

/// Seam for the ingestion workflow so tests can fail uploads without a
/// storage backend.
pub trait BlobStore {
    fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub struct BlobClient {
    base_url: String,
    anon_key: String,
    bucket: String,
    http: reqwest::Client,
}

impl BlobClient {
    pub fn new(supabase_url: &str, anon_key: &str, bucket: &str) -> Self {
        Self {
            base_url: format!("{}/storage/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl BlobStore for BlobClient {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = format!("{}/object/{}/{key}", self.base_url, self.bucket);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| format!("upload failed with status {status}"));
            return Err(VentraError::Blob(message));
        }
        Ok(())
    }
}
