//! Media storage port - where uploaded post images live.

use async_trait::async_trait;

use crate::forms::ImageUpload;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store an uploaded image and return its stored name, e.g. `posts/small.gif`.
    async fn save(&self, upload: &ImageUpload) -> Result<String, MediaError>;

    /// Read a stored file. `Ok(None)` when it does not exist.
    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, MediaError>;

    /// Public URL of a stored file.
    fn url(&self, name: &str) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid media name: {0}")]
    InvalidName(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}
