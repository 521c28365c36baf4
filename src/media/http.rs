use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{MediaError, MediaManager};

/// Talks to the media service over its REST API.
pub struct HttpMediaManager {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMediaManager {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::Failed(format!("Failed to build media client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn media_url(&self, media_id: &str) -> String {
        format!("{}/api/v1/media/{media_id}", self.base_url)
    }
}

#[async_trait]
impl MediaManager for HttpMediaManager {
    async fn delete(&self, media_id: &str) -> Result<(), MediaError> {
        let url = self.media_url(media_id);

        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| MediaError::Failed(format!("DELETE {url} failed: {e}")))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(MediaError::NotFound(media_id.to_string())),
            status if status.is_success() => {
                tracing::debug!("Deleted media {media_id}");
                Ok(())
            }
            status => Err(MediaError::Failed(format!(
                "DELETE {url} returned {status}"
            ))),
        }
    }
}
