use crate::domain::{
    errors::ListingResult,
    models::{ImageUpload, Listing, ListingPayload},
};
use async_trait::async_trait;

/// Port for listing catalog operations.
///
/// Ids arrive as raw strings from the boundary; the service decides
/// whether they are well-formed for the configured repository.
#[async_trait]
pub trait ListingService: Send + Sync + 'static {
    /// Validate (full mode), resolve the image and store a new listing
    async fn create_listing(
        &self,
        payload: ListingPayload,
        image: Option<ImageUpload>,
    ) -> ListingResult<Listing>;

    /// All listings in storage order
    async fn list_listings(&self) -> ListingResult<Vec<Listing>>;

    /// Fetch one listing
    async fn get_listing(&self, id: &str) -> ListingResult<Listing>;

    /// Validate (partial mode) and merge into an existing listing
    async fn update_listing(&self, id: &str, payload: ListingPayload) -> ListingResult<Listing>;

    /// Remove a listing
    async fn delete_listing(&self, id: &str) -> ListingResult<()>;
}
