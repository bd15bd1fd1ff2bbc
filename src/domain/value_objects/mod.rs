mod image_ref;
mod listing_id;

pub use image_ref::ImageRef;
pub use listing_id::ListingId;
