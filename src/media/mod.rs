pub mod http;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaError {
    /// The media item does not exist (or was already removed).
    NotFound(String),
    Failed(String),
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaError::NotFound(id) => write!(f, "media {id} not found"),
            MediaError::Failed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MediaError {}

/// Deletes media items owned by the media service.
#[async_trait]
pub trait MediaManager: Send + Sync {
    async fn delete(&self, media_id: &str) -> Result<(), MediaError>;
}
