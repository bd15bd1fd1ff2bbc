use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::ListingResult,
        models::{Listing, ListingPatch, NewListing},
        value_objects::ListingId,
    },
    ports::repositories::ListingRepository,
};

/// In-memory implementation of ListingRepository for testing and development.
///
/// Listings live in insertion order and ids come from a counter that is
/// never rewound, so ids are not reused after a delete. Nothing survives a
/// restart.
#[derive(Clone)]
pub struct InMemoryListingRepository {
    data: Arc<RwLock<RepositoryData>>,
}

struct RepositoryData {
    listings: Vec<Listing>,
    next_id: u64,
}

impl Default for RepositoryData {
    fn default() -> Self {
        Self {
            listings: Vec::new(),
            next_id: 1,
        }
    }
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(RepositoryData::default())),
        }
    }
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    fn parse_id(&self, raw: &str) -> Option<ListingId> {
        ListingId::parse_sequence(raw)
    }

    async fn create(&self, listing: NewListing) -> ListingResult<Listing> {
        let mut data = self.data.write().await;

        let id = ListingId::from_sequence(data.next_id);
        data.next_id += 1;

        let stored = listing.into_listing(id);
        data.listings.push(stored.clone());

        Ok(stored)
    }

    async fn get_all(&self) -> ListingResult<Vec<Listing>> {
        let data = self.data.read().await;
        Ok(data.listings.clone())
    }

    async fn get_by_id(&self, id: &ListingId) -> ListingResult<Option<Listing>> {
        let data = self.data.read().await;
        Ok(data.listings.iter().find(|l| &l.id == id).cloned())
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> ListingResult<Option<Listing>> {
        // Lookup and merge under one write guard
        let mut data = self.data.write().await;

        Ok(data
            .listings
            .iter_mut()
            .find(|l| &l.id == id)
            .map(|listing| {
                listing.details.apply(patch);
                listing.clone()
            }))
    }

    async fn delete(&self, id: &ListingId) -> ListingResult<bool> {
        let mut data = self.data.write().await;

        match data.listings.iter().position(|l| &l.id == id) {
            Some(index) => {
                data.listings.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> ListingResult<usize> {
        Ok(self.data.read().await.listings.len())
    }
}
