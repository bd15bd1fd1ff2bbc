use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    local::LocalFileSystem, memory::InMemory, path::Path as ObjectPath,
    ObjectStore as ApacheObjectStore, PutPayload,
};
use std::{path::Path, sync::Arc};
use tracing::debug;

use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        value_objects::ImageRef,
    },
    ports::storage::ImageStore,
};

/// Adapter that implements ImageStore using Apache object_store.
///
/// Image references are used verbatim as object paths, so a local store
/// rooted at the public directory serves uploads at `/<imageRef>`.
pub struct ObjectStoreImageAdapter {
    inner: Arc<dyn ApacheObjectStore>,
}

impl ObjectStoreImageAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self { inner: store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Store images on disk below `root`, creating the directory if needed
    pub fn local(root: impl AsRef<Path>) -> ListingResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| {
            ListingError::persistence(
                format!("Failed to create image directory {}", root.display()),
                e,
            )
        })?;

        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
            ListingError::persistence(
                format!("Failed to open image directory {}", root.display()),
                e,
            )
        })?;

        debug!(root = %root.display(), "Opened local image store");
        Ok(Self::new(Arc::new(store)))
    }
}

#[async_trait]
impl ImageStore for ObjectStoreImageAdapter {
    async fn put_image(&self, image: &ImageRef, data: Bytes) -> ListingResult<()> {
        let path = ObjectPath::from(image.as_str());
        let payload = PutPayload::from(data);

        self.inner
            .put(&path, payload)
            .await
            .map_err(|e| ListingError::persistence(format!("Failed to store image {}", image), e))?;

        Ok(())
    }

    async fn get_image(&self, image: &ImageRef) -> ListingResult<Bytes> {
        let path = ObjectPath::from(image.as_str());

        let result = self.inner.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => ListingError::Persistence {
                message: format!("Image not found: {}", image),
                cause: None,
            },
            _ => ListingError::persistence(format!("Failed to read image {}", image), e),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| ListingError::persistence(format!("Failed to read image bytes {}", image), e))
    }
}
