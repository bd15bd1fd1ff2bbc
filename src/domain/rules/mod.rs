pub mod image_naming;
pub mod listing_schema;

pub use image_naming::{resolve_image_ref, unique_file_name, Clock, ImageNamer, SystemClock};
pub use listing_schema::{ListingSchema, ValidationMode, MIN_YEAR_BUILT};
