use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::api::http::{build_client, send};
use crate::api::traits::{ApiResult, ReelStorage};
use crate::api::types::ReelUpload;
use crate::config::{ClientConfig, StorageConfig};

/// Reel bucket on a Supabase-style storage REST API
pub struct StorageClient {
    client: Client,
    config: StorageConfig,
}

impl StorageClient {
    pub fn new(client_config: &ClientConfig, config: StorageConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(client_config)?,
            config,
        })
    }

    fn object_endpoint(&self) -> String {
        format!("{}/storage/v1/object/{}", self.config.url, self.config.bucket)
    }

    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url, self.config.bucket, object_name
        )
    }
}

/// Millisecond prefix keeps repeated uploads of the same file apart
pub(crate) fn object_name(file_name: &str, millis: i64) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    format!("{millis}_{base}")
}

/// Object name is the last path segment of the public URL
pub(crate) fn object_name_from_url(reel_url: &str) -> &str {
    let path = reel_url.split(['?', '#']).next().unwrap_or(reel_url);
    path.rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl ReelStorage for StorageClient {
    async fn store_reel(&self, upload: &ReelUpload) -> ApiResult<String> {
        let name = object_name(&upload.file_name, Utc::now().timestamp_millis());
        let endpoint = format!("{}/{}", self.object_endpoint(), name);
        let request = self
            .client
            .post(&endpoint)
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .header(CONTENT_TYPE, &upload.content_type)
            .body(upload.bytes.clone());
        send(&endpoint, request).await?;

        info!("Stored reel {} ({} bytes)", name, upload.size());
        Ok(self.public_url(&name))
    }

    async fn remove_reel(&self, reel_url: &str) -> ApiResult<()> {
        let name = object_name_from_url(reel_url);
        let endpoint = self.object_endpoint();
        let request = self
            .client
            .delete(&endpoint)
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .json(&json!({ "prefixes": [name] }));
        send(&endpoint, request).await?;

        info!("Removed reel {}", name);
        Ok(())
    }
}
