use crate::domain::{
    errors::ListingResult,
    models::{Listing, ListingPatch, NewListing},
    value_objects::ListingId,
};
use async_trait::async_trait;

/// Repository owning the durable set of listings.
///
/// Implementations decide the id format. `update` and `delete` must apply
/// atomically with respect to the record they target: a concurrent delete
/// either happens before the update (the update returns `None`) or after
/// it.
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
    /// Interpret a client-supplied id; `None` if it cannot be one of ours
    fn parse_id(&self, raw: &str) -> Option<ListingId>;

    /// Assign an id and persist a new listing
    async fn create(&self, listing: NewListing) -> ListingResult<Listing>;

    /// All listings in storage order
    async fn get_all(&self) -> ListingResult<Vec<Listing>>;

    /// Look up a single listing
    async fn get_by_id(&self, id: &ListingId) -> ListingResult<Option<Listing>>;

    /// Merge `patch` over the stored listing; `None` if it does not exist
    async fn update(&self, id: &ListingId, patch: &ListingPatch)
        -> ListingResult<Option<Listing>>;

    /// Hard delete; `false` if the listing did not exist
    async fn delete(&self, id: &ListingId) -> ListingResult<bool>;

    /// Number of stored listings
    async fn count(&self) -> ListingResult<usize> {
        Ok(self.get_all().await?.len())
    }
}
