use bytes::Bytes;

use crate::domain::value_objects::{ImageRef, ListingId};

/// Untyped listing fields as submitted by a client
pub type ListingPayload = serde_json::Map<String, serde_json::Value>;

/// Kind of property being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    SingleFamilyHome,
    Townhouse,
    Condo,
    Apartment,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::SingleFamilyHome,
        PropertyType::Townhouse,
        PropertyType::Condo,
        PropertyType::Apartment,
        PropertyType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::SingleFamilyHome => "Single-Family Home",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Condo => "Condo",
            PropertyType::Apartment => "Apartment",
            PropertyType::Other => "Other",
        }
    }

    /// Exact-literal lookup; anything else is unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub fn literals() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.as_str()).collect()
    }
}

/// Market status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    ForSale,
    Sold,
    Pending,
    OffMarket,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 4] = [
        ListingStatus::ForSale,
        ListingStatus::Sold,
        ListingStatus::Pending,
        ListingStatus::OffMarket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::ForSale => "For Sale",
            ListingStatus::Sold => "Sold",
            ListingStatus::Pending => "Pending",
            ListingStatus::OffMarket => "Off Market",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn literals() -> Vec<&'static str> {
        Self::ALL.iter().map(|status| status.as_str()).collect()
    }
}

/// Descriptive fields of a listing, everything except identity and image
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    /// Free-form, stored verbatim
    pub price: String,
    pub beds: u32,
    pub baths: u32,
    pub sqft: u32,
    pub address: String,
    pub features: Vec<String>,
    pub year_built: i32,
    pub property_type: PropertyType,
    pub listing_status: ListingStatus,
}

impl ListingDetails {
    /// Merge the fields present in `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: &ListingPatch) {
        if let Some(price) = &patch.price {
            self.price = price.clone();
        }
        if let Some(beds) = patch.beds {
            self.beds = beds;
        }
        if let Some(baths) = patch.baths {
            self.baths = baths;
        }
        if let Some(sqft) = patch.sqft {
            self.sqft = sqft;
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(features) = &patch.features {
            self.features = features.clone();
        }
        if let Some(year_built) = patch.year_built {
            self.year_built = year_built;
        }
        if let Some(property_type) = patch.property_type {
            self.property_type = property_type;
        }
        if let Some(listing_status) = patch.listing_status {
            self.listing_status = listing_status;
        }
    }
}

/// A listing as held by a repository
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub image_ref: ImageRef,
    pub details: ListingDetails,
}

/// A validated listing that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub image_ref: ImageRef,
    pub details: ListingDetails,
}

impl NewListing {
    pub fn into_listing(self, id: ListingId) -> Listing {
        Listing {
            id,
            image_ref: self.image_ref,
            details: self.details,
        }
    }
}

/// Field-level changes for a partial update.
///
/// `None` means "leave as is". The image reference is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub price: Option<String>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub sqft: Option<u32>,
    pub address: Option<String>,
    pub features: Option<Vec<String>>,
    pub year_built: Option<i32>,
    pub property_type: Option<PropertyType>,
    pub listing_status: Option<ListingStatus>,
}

/// An uploaded image file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}
