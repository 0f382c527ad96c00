//! Image store adapters.
//!
//! [`CapStdImageStore`] confines every write to a media root opened as a
//! capability-scoped [`Dir`], so a stored path can never escape it.
//! [`InMemoryImageStore`] keeps bytes in a map for tests and database-less
//! local runs.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::RecipeImagePath;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Filesystem image store rooted at a media directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
}

impl CapStdImageStore {
    /// Open (creating when missing) the media root at `path`.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self::from_dir(root))
    }

    /// Wrap an already opened directory.
    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    fn write_file(root: &Dir, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            root.create_dir_all(parent)?;
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::other("image path has no file name"))?;
        let staged = path.with_file_name(format!(
            ".{}.tmp.{}",
            file_name.to_string_lossy(),
            Uuid::new_v4().simple()
        ));
        root.write(&staged, bytes)?;
        if let Err(error) = root.rename(&staged, root, path) {
            let _cleanup = root.remove_file(&staged);
            return Err(error);
        }
        Ok(())
    }

    fn remove_file(root: &Dir, path: &Path) -> io::Result<()> {
        match root.remove_file(path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
            _ => Ok(()),
        }
    }

    async fn run_blocking<F>(&self, path: &RecipeImagePath, op: F) -> Result<(), ImageStoreError>
    where
        F: FnOnce(&Dir, &Path) -> io::Result<()> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let relative = path.as_str().to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || op(root.as_ref(), Path::new(&relative)))
                .await
                .map_err(|error| ImageStoreError::unavailable(error.to_string()))?;
        outcome.map_err(|error| ImageStoreError::io(path.as_str(), error.to_string()))
    }
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn save(&self, path: &RecipeImagePath, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let bytes = bytes.to_vec();
        self.run_blocking(path, move |root, relative| {
            Self::write_file(root, relative, &bytes)
        })
        .await
    }

    async fn remove(&self, path: &RecipeImagePath) -> Result<(), ImageStoreError> {
        self.run_blocking(path, Self::remove_file).await
    }
}

/// Image store keeping files in memory.
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// Stored paths in lexical order.
    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, path: &RecipeImagePath, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ImageStoreError::unavailable("image store lock poisoned"))?;
        files.insert(path.as_str().to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, path: &RecipeImagePath) -> Result<(), ImageStoreError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ImageStoreError::unavailable("image store lock poisoned"))?;
        files.remove(path.as_str());
        Ok(())
    }
}
