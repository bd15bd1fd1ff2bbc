use bytes::Bytes;

use crate::domain::{errors::ListingResult, value_objects::ImageRef};
use async_trait::async_trait;

/// Port for the image storage location.
///
/// The location is append-only: callers generate unique references, so
/// implementations may overwrite without checking.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Write image bytes at the given reference
    async fn put_image(&self, image: &ImageRef, data: Bytes) -> ListingResult<()>;

    /// Read image bytes back
    async fn get_image(&self, image: &ImageRef) -> ListingResult<Bytes>;
}
