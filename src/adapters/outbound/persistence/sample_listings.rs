use tracing::info;

use crate::{
    domain::{
        errors::ListingResult,
        models::{ListingDetails, ListingStatus, NewListing, PropertyType},
        value_objects::ImageRef,
    },
    ports::repositories::ListingRepository,
};

struct Sample {
    image: &'static str,
    price: &'static str,
    beds: u32,
    baths: u32,
    sqft: u32,
    address: &'static str,
    features: [&'static str; 3],
    year_built: i32,
    property_type: PropertyType,
}

// Bath counts are whole numbers in the schema; half baths round down.
const SAMPLES: [Sample; 8] = [
    Sample {
        image: "images/house0.jpg",
        price: "$400,000",
        beds: 3,
        baths: 2,
        sqft: 2200,
        address: "1234 Oak St, Columbia, SC, 29203",
        features: ["Garage", "Backyard", "Fireplace"],
        year_built: 2005,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house.jpeg",
        price: "$535,000",
        beds: 4,
        baths: 3,
        sqft: 3100,
        address: "5678 Pine Ave, Columbia, SC, 29203",
        features: ["Swimming Pool", "Patio", "Modern Kitchen"],
        year_built: 2010,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house2.jpg",
        price: "$315,000",
        beds: 2,
        baths: 1,
        sqft: 1600,
        address: "910 Birch Rd, Columbia, SC, 29203",
        features: ["Open Floor Plan", "Granite Countertops", "Hardwood Floors"],
        year_built: 2000,
        property_type: PropertyType::Townhouse,
    },
    Sample {
        image: "images/house3.jpg",
        price: "$390,000",
        beds: 3,
        baths: 2,
        sqft: 2050,
        address: "4321 Elm St, Columbia, SC, 29203",
        features: ["Finished Basement", "Walk-in Closet", "Energy-efficient Windows"],
        year_built: 2008,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house4.jpg",
        price: "$315,000",
        beds: 2,
        baths: 1,
        sqft: 1400,
        address: "7890 Maple Dr, Columbia, SC, 29203",
        features: ["Fenced Yard", "Stainless Steel Appliances", "Renovated Bathroom"],
        year_built: 1995,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house5.jpg",
        price: "$405,000",
        beds: 3,
        baths: 2,
        sqft: 1850,
        address: "6789 Cedar Blvd, Columbia, SC, 29203",
        features: ["Sunroom", "Large Backyard", "2-Car Garage"],
        year_built: 2003,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house0.jpg",
        price: "$500,000",
        beds: 4,
        baths: 3,
        sqft: 2500,
        address: "3456 Palm St, Columbia, SC, 29203",
        features: ["Private Deck", "Fire Pit", "In-law Suite"],
        year_built: 2015,
        property_type: PropertyType::SingleFamilyHome,
    },
    Sample {
        image: "images/house2.jpg",
        price: "$330,000",
        beds: 2,
        baths: 2,
        sqft: 1750,
        address: "9876 Spruce Ln, Columbia, SC, 29203",
        features: ["New Roof", "Updated Kitchen", "Built-in Bookshelves"],
        year_built: 2012,
        property_type: PropertyType::Townhouse,
    },
];

/// The demo catalog, all listed for sale
pub fn sample_listings() -> Vec<NewListing> {
    SAMPLES
        .iter()
        .map(|sample| NewListing {
            image_ref: ImageRef::new(sample.image),
            details: ListingDetails {
                price: sample.price.to_string(),
                beds: sample.beds,
                baths: sample.baths,
                sqft: sample.sqft,
                address: sample.address.to_string(),
                features: sample.features.iter().map(|f| f.to_string()).collect(),
                year_built: sample.year_built,
                property_type: sample.property_type,
                listing_status: ListingStatus::ForSale,
            },
        })
        .collect()
}

/// Insert the demo catalog into an empty repository; returns how many
/// listings were added.
///
/// A repository that already holds listings is left alone, so seeding a
/// durable store on every start does not duplicate the demo data.
pub async fn seed_sample_listings(repository: &dyn ListingRepository) -> ListingResult<usize> {
    let existing = repository.count().await?;
    if existing > 0 {
        info!(existing, "Repository already holds listings; skipping sample seed");
        return Ok(0);
    }

    let listings = sample_listings();
    let count = listings.len();

    for listing in listings {
        repository.create(listing).await?;
    }

    info!(count, "Seeded sample listings");
    Ok(count)
}
