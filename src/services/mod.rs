mod listing_service_impl;

pub use listing_service_impl::{ListingServiceBuilder, ListingServiceImpl, DEFAULT_IMAGE_ROOT};
