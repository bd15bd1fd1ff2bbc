pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::ListingRepository;
pub use services::ListingService;
pub use storage::ImageStore;
