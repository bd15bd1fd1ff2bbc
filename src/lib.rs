pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    ImageRef,
    ImageUpload,
    // Models
    Listing,
    ListingDetails,
    // Errors
    ListingError,
    ListingPatch,
    ListingPayload,
    ListingResult,
    ListingStatus,
    // Value objects
    ListingId,
    NewListing,
    PropertyType,
    ValidationError,
};

// Rules - validation and image naming
pub use domain::rules::{ImageNamer, ListingSchema, ValidationMode};

// Port types - interfaces for external systems
pub use ports::{ImageStore, ListingRepository, ListingService};

// Service implementations - business logic
pub use services::{ListingServiceBuilder, ListingServiceImpl};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, AppBuilder, AppConfig, AppDependencies, AppError,
    AppServices, ImageBackend, RepositoryBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    persistence::{InMemoryListingRepository, SqlListingRepository},
    storage::ObjectStoreImageAdapter,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, AppBuilder, AppConfig, AppServices, ImageRef, InMemoryListingRepository,
        Listing, ListingError, ListingId, ListingRepository, ListingService, ListingServiceImpl,
        ObjectStoreImageAdapter, SqlListingRepository,
    };
}
