mod listing_errors;
mod validation_errors;

pub use listing_errors::*;
pub use validation_errors::*;
