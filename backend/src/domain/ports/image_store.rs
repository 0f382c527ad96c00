//! Port for storing uploaded image bytes.

use async_trait::async_trait;

use crate::domain::RecipeImagePath;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The backing store could not be reached.
        Unavailable { message } => "image store unavailable: {message}",
        /// Reading or writing a file failed.
        Io { path, message } => "image store i/o failed for {path}: {message}",
    }
}

/// Byte storage keyed by relative image paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` to `path`, creating parent directories as needed and
    /// replacing any existing file.
    async fn save(&self, path: &RecipeImagePath, bytes: &[u8]) -> Result<(), ImageStoreError>;

    /// Remove the file at `path`. Missing files are not an error.
    async fn remove(&self, path: &RecipeImagePath) -> Result<(), ImageStoreError>;
}
