use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{errors::ListingError, models::Listing};

/// DTO for a stored listing, as returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    pub id: String,
    pub image_ref: String,
    pub price: String,
    pub beds: u32,
    pub baths: u32,
    pub sqft: u32,
    pub address: String,
    pub features: Vec<String>,
    pub year_built: i32,
    pub property_type: String,
    pub listing_status: String,
}

/// Envelope used by the mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEnvelopeDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<ListingDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// Conversion implementations

impl From<&Listing> for ListingDto {
    fn from(listing: &Listing) -> Self {
        let details = &listing.details;
        ListingDto {
            id: listing.id.to_string(),
            image_ref: listing.image_ref.to_string(),
            price: details.price.clone(),
            beds: details.beds,
            baths: details.baths,
            sqft: details.sqft,
            address: details.address.clone(),
            features: details.features.clone(),
            year_built: details.year_built,
            property_type: details.property_type.as_str().to_string(),
            listing_status: details.listing_status.as_str().to_string(),
        }
    }
}

impl From<Listing> for ListingDto {
    fn from(listing: Listing) -> Self {
        ListingDto::from(&listing)
    }
}

impl From<&ListingError> for http::StatusCode {
    fn from(err: &ListingError) -> Self {
        match err {
            ListingError::Validation(_) | ListingError::InvalidId { .. } => {
                http::StatusCode::BAD_REQUEST
            }
            ListingError::NotFound { .. } => http::StatusCode::NOT_FOUND,
            ListingError::Persistence { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ListingEnvelopeDto {
    pub fn with_listing(listing: Listing) -> Self {
        Self {
            success: true,
            listing: Some(listing.into()),
            message: None,
        }
    }

    pub fn with_message(message: &str) -> Self {
        Self {
            success: true,
            listing: None,
            message: Some(message.to_string()),
        }
    }
}

impl ErrorResponseDto {
    pub fn from_listing_error(error: &ListingError) -> Self {
        let message = match error {
            // The bare field message reads better than the wrapped display
            ListingError::Validation(validation) => validation.to_string(),
            ListingError::Persistence { message, .. } => message.clone(),
            other => other.to_string(),
        };

        Self {
            success: false,
            error: error.kind().to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            success: false,
            error: "ValidationError".to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}
