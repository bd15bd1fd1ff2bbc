pub mod errors;
pub mod models;
pub mod rules;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{ListingError, ListingResult, ValidationError};
pub use models::*;
pub use value_objects::*;
