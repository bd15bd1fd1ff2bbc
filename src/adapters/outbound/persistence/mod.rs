mod in_memory_listing_repository;
mod sample_listings;
mod sql_listing_repository;

pub use in_memory_listing_repository::InMemoryListingRepository;
pub use sample_listings::{sample_listings, seed_sample_listings};
pub use sql_listing_repository::SqlListingRepository;
