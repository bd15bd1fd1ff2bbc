use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::domain::{
    errors::ValidationError,
    models::{ListingDetails, ListingPatch, ListingPayload, ListingStatus, PropertyType},
};

/// Earliest accepted construction year
pub const MIN_YEAR_BUILT: i32 = 1800;

/// Which rule set a payload is checked against.
///
/// `Full` is used on create: every field is required and every constraint
/// applies. `Partial` is used on update: only `price` and `address` are
/// required, other supplied fields only have to convert to their stored
/// type, and range constraints (`yearBuilt` bounds) are not enforced. A
/// record patched this way can therefore hold values that `Full` would
/// reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Full,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Always,
    OnCreate,
}

struct SchemaField {
    name: &'static str,
    aliases: &'static [&'static str],
    presence: Presence,
}

impl SchemaField {
    const fn new(name: &'static str, presence: Presence) -> Self {
        Self {
            name,
            aliases: &[],
            presence,
        }
    }

    const fn with_alias(
        name: &'static str,
        aliases: &'static [&'static str],
        presence: Presence,
    ) -> Self {
        Self {
            name,
            aliases,
            presence,
        }
    }

    fn lookup<'a>(&self, payload: &'a ListingPayload) -> Option<&'a Value> {
        payload
            .get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| payload.get(*alias)))
    }

    fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.iter().any(|alias| *alias == key)
    }

    fn required_in(&self, mode: ValidationMode) -> bool {
        match self.presence {
            Presence::Always => true,
            Presence::OnCreate => mode == ValidationMode::Full,
        }
    }
}

const PRICE: SchemaField = SchemaField::new("price", Presence::Always);
const BEDS: SchemaField = SchemaField::new("beds", Presence::OnCreate);
const BATHS: SchemaField = SchemaField::new("baths", Presence::OnCreate);
const SQFT: SchemaField = SchemaField::new("sqft", Presence::OnCreate);
const ADDRESS: SchemaField = SchemaField::new("address", Presence::Always);
const FEATURES: SchemaField = SchemaField::new("features", Presence::OnCreate);
const YEAR_BUILT: SchemaField =
    SchemaField::with_alias("yearBuilt", &["year_built"], Presence::OnCreate);
const PROPERTY_TYPE: SchemaField =
    SchemaField::with_alias("propertyType", &["property_type"], Presence::OnCreate);
const LISTING_STATUS: SchemaField =
    SchemaField::with_alias("listingStatus", &["listing_status"], Presence::OnCreate);

const SCHEMA_FIELDS: [&SchemaField; 9] = [
    &PRICE,
    &BEDS,
    &BATHS,
    &SQFT,
    &ADDRESS,
    &FEATURES,
    &YEAR_BUILT,
    &PROPERTY_TYPE,
    &LISTING_STATUS,
];

// Assigned by the server. Rejected on create, ignored on update so a
// client can send back a record it previously fetched.
const SERVER_OWNED_KEYS: [&str; 5] = ["id", "_id", "imageRef", "imgName", "img_name"];

/// Checks listing payloads and normalizes them into typed fields
#[derive(Debug, Clone, Copy)]
pub struct ListingSchema {
    current_year: i32,
}

impl ListingSchema {
    /// Schema bounded by the current calendar year (UTC)
    pub fn new() -> Self {
        Self::with_current_year(Utc::now().year())
    }

    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Check a payload under `mode`, stopping at the first failing field.
    ///
    /// Fields are checked in schema order, then unrecognized keys.
    pub fn validate(
        &self,
        payload: &ListingPayload,
        mode: ValidationMode,
    ) -> Result<ListingPatch, ValidationError> {
        let patch = ListingPatch {
            price: read(payload, &PRICE, mode, non_empty_text)?,
            beds: read(payload, &BEDS, mode, count)?,
            baths: read(payload, &BATHS, mode, count)?,
            sqft: read(payload, &SQFT, mode, count)?,
            address: read(payload, &ADDRESS, mode, non_empty_text)?,
            features: read(payload, &FEATURES, mode, features)?,
            year_built: read(payload, &YEAR_BUILT, mode, |field, value| {
                self.year_built(field, value, mode)
            })?,
            property_type: read(payload, &PROPERTY_TYPE, mode, |field, value| {
                one_of(field, value, PropertyType::parse, PropertyType::literals)
            })?,
            listing_status: read(payload, &LISTING_STATUS, mode, |field, value| {
                one_of(field, value, ListingStatus::parse, ListingStatus::literals)
            })?,
        };

        reject_unknown_keys(payload, mode)?;

        Ok(patch)
    }

    /// Full validation for a listing about to be created
    pub fn validate_new(
        &self,
        payload: &ListingPayload,
    ) -> Result<ListingDetails, ValidationError> {
        let patch = self.validate(payload, ValidationMode::Full)?;
        complete(patch)
    }

    /// Partial validation for an update
    pub fn validate_patch(
        &self,
        payload: &ListingPayload,
    ) -> Result<ListingPatch, ValidationError> {
        self.validate(payload, ValidationMode::Partial)
    }

    fn year_built(
        &self,
        field: &'static str,
        value: &Value,
        mode: ValidationMode,
    ) -> Result<i32, ValidationError> {
        let year = integer(field, value)?;

        let (min, max) = match mode {
            ValidationMode::Full => (i64::from(MIN_YEAR_BUILT), i64::from(self.current_year)),
            ValidationMode::Partial => (i64::from(i32::MIN), i64::from(i32::MAX)),
        };

        if year < min {
            return Err(ValidationError::BelowMinimum { field, min });
        }
        if year > max {
            return Err(ValidationError::AboveMaximum { field, max });
        }

        i32::try_from(year).map_err(|_| ValidationError::NotAnInteger { field })
    }
}

impl Default for ListingSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(
    payload: &ListingPayload,
    field: &SchemaField,
    mode: ValidationMode,
    parse: impl FnOnce(&'static str, &Value) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    match field.lookup(payload) {
        Some(value) => parse(field.name, value).map(Some),
        None if field.required_in(mode) => Err(ValidationError::MissingField { field: field.name }),
        None => Ok(None),
    }
}

fn reject_unknown_keys(
    payload: &ListingPayload,
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    for key in payload.keys() {
        if SCHEMA_FIELDS.iter().any(|field| field.matches(key)) {
            continue;
        }
        let server_owned = SERVER_OWNED_KEYS.iter().any(|owned| *owned == key.as_str());
        if server_owned && mode == ValidationMode::Partial {
            continue;
        }
        return Err(ValidationError::UnknownField { field: key.clone() });
    }
    Ok(())
}

fn complete(patch: ListingPatch) -> Result<ListingDetails, ValidationError> {
    fn take<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
        value.ok_or(ValidationError::MissingField { field })
    }

    Ok(ListingDetails {
        price: take(patch.price, PRICE.name)?,
        beds: take(patch.beds, BEDS.name)?,
        baths: take(patch.baths, BATHS.name)?,
        sqft: take(patch.sqft, SQFT.name)?,
        address: take(patch.address, ADDRESS.name)?,
        features: take(patch.features, FEATURES.name)?,
        year_built: take(patch.year_built, YEAR_BUILT.name)?,
        property_type: take(patch.property_type, PROPERTY_TYPE.name)?,
        listing_status: take(patch.listing_status, LISTING_STATUS.name)?,
    })
}

fn non_empty_text(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) if text.trim().is_empty() => Err(ValidationError::EmptyField { field }),
        Value::String(text) => Ok(text.clone()),
        _ => Err(ValidationError::NotAString { field }),
    }
}

/// Integers arrive as JSON numbers or, from form posts, numeric strings
fn integer(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole_number))
            .ok_or(ValidationError::NotAnInteger { field }),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
                .ok_or(ValidationError::NotAnInteger { field })
        }
        _ => Err(ValidationError::NotAnInteger { field }),
    }
}

/// `1500.0` counts as an integer, `1500.5` does not
fn whole_number(float: f64) -> Option<i64> {
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    if float.is_finite() && float.fract() == 0.0 && in_range {
        Some(float as i64)
    } else {
        None
    }
}

fn count(field: &'static str, value: &Value) -> Result<u32, ValidationError> {
    let int = integer(field, value)?;
    if int < 0 {
        return Err(ValidationError::BelowMinimum { field, min: 0 });
    }
    u32::try_from(int).map_err(|_| ValidationError::AboveMaximum {
        field,
        max: i64::from(u32::MAX),
    })
}

/// Either an array of strings or one comma-separated string
fn features(field: &'static str, value: &Value) -> Result<Vec<String>, ValidationError> {
    let items: Vec<&str> = match value {
        Value::String(text) => text.split(',').collect(),
        Value::Array(values) => values
            .iter()
            .map(|item| item.as_str().ok_or(ValidationError::InvalidFeatures { field }))
            .collect::<Result<_, _>>()?,
        _ => return Err(ValidationError::InvalidFeatures { field }),
    };

    Ok(items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

fn one_of<T>(
    field: &'static str,
    value: &Value,
    parse: fn(&str) -> Option<T>,
    literals: fn() -> Vec<&'static str>,
) -> Result<T, ValidationError> {
    value
        .as_str()
        .and_then(parse)
        .ok_or_else(|| ValidationError::NotOneOf {
            field,
            allowed: literals(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YEAR: i32 = 2026;

    fn schema() -> ListingSchema {
        ListingSchema::with_current_year(YEAR)
    }

    fn payload(value: Value) -> ListingPayload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid() -> ListingPayload {
        payload(json!({
            "price": "$400,000",
            "beds": 3,
            "baths": 2,
            "sqft": 2000,
            "address": "1 Main St",
            "features": ["Garage"],
            "yearBuilt": 2005,
            "propertyType": "Single-Family Home",
            "listingStatus": "For Sale"
        }))
    }

    fn with(key: &str, value: Value) -> ListingPayload {
        let mut p = valid();
        p.insert(key.to_string(), value);
        p
    }

    fn without(key: &str) -> ListingPayload {
        let mut p = valid();
        p.remove(key);
        p
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let details = schema().validate_new(&valid()).unwrap();

        assert_eq!(details.price, "$400,000");
        assert_eq!(details.beds, 3);
        assert_eq!(details.baths, 2);
        assert_eq!(details.sqft, 2000);
        assert_eq!(details.address, "1 Main St");
        assert_eq!(details.features, vec!["Garage".to_string()]);
        assert_eq!(details.year_built, 2005);
        assert_eq!(details.property_type, PropertyType::SingleFamilyHome);
        assert_eq!(details.listing_status, ListingStatus::ForSale);
    }

    #[test]
    fn test_every_field_is_required_on_create() {
        for field in [
            "price",
            "beds",
            "baths",
            "sqft",
            "address",
            "features",
            "yearBuilt",
            "propertyType",
            "listingStatus",
        ] {
            let err = schema().validate_new(&without(field)).unwrap_err();
            assert_eq!(err.field(), Some(field), "missing {field}");
            assert!(matches!(err, ValidationError::MissingField { .. }));
        }
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let mut p = without("address");
        p.insert("beds".to_string(), json!("many"));

        let err = schema().validate_new(&p).unwrap_err();
        assert_eq!(err, ValidationError::NotAnInteger { field: "beds" });
    }

    #[test]
    fn test_empty_strings_rejected() {
        let err = schema().validate_new(&with("price", json!(""))).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "price" });

        let err = schema().validate_new(&with("address", json!("   "))).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "address" });

        let err = schema().validate_new(&with("price", json!(400000))).unwrap_err();
        assert_eq!(err, ValidationError::NotAString { field: "price" });
    }

    #[test]
    fn test_counts_coerce_numeric_strings() {
        let mut p = with("beds", json!("4"));
        p.insert("baths".to_string(), json!(" 3 "));
        p.insert("sqft".to_string(), json!(1500.0));

        let details = schema().validate_new(&p).unwrap();
        assert_eq!((details.beds, details.baths, details.sqft), (4, 3, 1500));
    }

    #[test]
    fn test_whole_number_strings_match_whole_numbers() {
        let details = schema().validate_new(&with("sqft", json!("1500.0"))).unwrap();
        assert_eq!(details.sqft, 1500);

        let details = schema().validate_new(&with("yearBuilt", json!(" 1950.0 "))).unwrap();
        assert_eq!(details.year_built, 1950);

        for bad in ["2.5", "NaN", "inf", "1e400", "3 beds"] {
            let err = schema().validate_new(&with("baths", json!(bad))).unwrap_err();
            assert_eq!(err, ValidationError::NotAnInteger { field: "baths" }, "{bad}");
        }
    }

    #[test]
    fn test_counts_must_be_non_negative_integers() {
        let err = schema().validate_new(&with("beds", json!(-1))).unwrap_err();
        assert_eq!(err, ValidationError::BelowMinimum { field: "beds", min: 0 });

        let err = schema().validate_new(&with("baths", json!(1.5))).unwrap_err();
        assert_eq!(err, ValidationError::NotAnInteger { field: "baths" });

        let err = schema().validate_new(&with("sqft", json!(true))).unwrap_err();
        assert_eq!(err, ValidationError::NotAnInteger { field: "sqft" });

        assert!(schema().validate_new(&with("beds", json!(0))).is_ok());
    }

    #[test]
    fn test_year_built_bounds() {
        assert!(schema().validate_new(&with("yearBuilt", json!(1800))).is_ok());
        assert!(schema().validate_new(&with("yearBuilt", json!(YEAR))).is_ok());
        assert!(schema().validate_new(&with("yearBuilt", json!("1950"))).is_ok());

        let err = schema().validate_new(&with("yearBuilt", json!(1799))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BelowMinimum {
                field: "yearBuilt",
                min: 1800
            }
        );

        let err = schema()
            .validate_new(&with("yearBuilt", json!(YEAR + 1)))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::AboveMaximum {
                field: "yearBuilt",
                max: i64::from(YEAR)
            }
        );
    }

    #[test]
    fn test_enums_accept_only_exact_literals() {
        for kind in PropertyType::literals() {
            let details = schema().validate_new(&with("propertyType", json!(kind))).unwrap();
            assert_eq!(details.property_type.as_str(), kind);
        }
        for status in ListingStatus::literals() {
            let details = schema()
                .validate_new(&with("listingStatus", json!(status)))
                .unwrap();
            assert_eq!(details.listing_status.as_str(), status);
        }

        for bad in ["Castle", "condo", "Single-family", ""] {
            let err = schema().validate_new(&with("propertyType", json!(bad))).unwrap_err();
            assert_eq!(err.field(), Some("propertyType"));
        }
        let err = schema()
            .validate_new(&with("listingStatus", json!("Rented")))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"listingStatus\" must be one of [For Sale, Sold, Pending, Off Market]"
        );
    }

    #[test]
    fn test_features_from_comma_separated_string() {
        let details = schema()
            .validate_new(&with("features", json!(" Garage ,Pool,  Fireplace,,")))
            .unwrap();
        assert_eq!(details.features, vec!["Garage", "Pool", "Fireplace"]);
    }

    #[test]
    fn test_features_keep_order_and_duplicates() {
        let details = schema()
            .validate_new(&with("features", json!(["Pool", "Deck", "Pool"])))
            .unwrap();
        assert_eq!(details.features, vec!["Pool", "Deck", "Pool"]);

        let details = schema().validate_new(&with("features", json!([]))).unwrap();
        assert!(details.features.is_empty());

        let err = schema()
            .validate_new(&with("features", json!(["Pool", 3])))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidFeatures { field: "features" });
    }

    #[test]
    fn test_snake_case_aliases_accepted() {
        let mut p = without("yearBuilt");
        p.remove("propertyType");
        p.remove("listingStatus");
        p.insert("year_built".to_string(), json!(1999));
        p.insert("property_type".to_string(), json!("Condo"));
        p.insert("listing_status".to_string(), json!("Sold"));

        let details = schema().validate_new(&p).unwrap();
        assert_eq!(details.year_built, 1999);
        assert_eq!(details.property_type, PropertyType::Condo);
        assert_eq!(details.listing_status, ListingStatus::Sold);
    }

    #[test]
    fn test_unknown_and_server_owned_keys_rejected_on_create() {
        let err = schema().validate_new(&with("color", json!("red"))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownField {
                field: "color".to_string()
            }
        );

        let err = schema()
            .validate_new(&with("imgName", json!("images/x.jpg")))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"imgName\" is not allowed");
    }

    #[test]
    fn test_partial_requires_price_and_address_only() {
        let patch = schema()
            .validate_patch(&payload(json!({"price": "$410,000", "address": "1 Main St"})))
            .unwrap();
        assert_eq!(patch.price.as_deref(), Some("$410,000"));
        assert_eq!(patch.address.as_deref(), Some("1 Main St"));
        assert_eq!(patch.beds, None);
        assert_eq!(patch.features, None);

        let err = schema()
            .validate_patch(&payload(json!({"price": "$410,000"})))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "address" });

        let err = schema()
            .validate_patch(&payload(json!({"price": "", "address": "1 Main St"})))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "price" });
    }

    #[test]
    fn test_partial_skips_range_constraints() {
        let patch = schema()
            .validate_patch(&payload(json!({
                "price": "$1",
                "address": "Old Mill",
                "yearBuilt": 1650
            })))
            .unwrap();
        assert_eq!(patch.year_built, Some(1650));

        let err = schema()
            .validate(
                &payload(json!({"price": "$1", "address": "Old Mill", "yearBuilt": 1650})),
                ValidationMode::Full,
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "beds" });
    }

    #[test]
    fn test_partial_still_requires_storable_types() {
        let err = schema()
            .validate_patch(&payload(json!({
                "price": "$1",
                "address": "A",
                "propertyType": "Castle"
            })))
            .unwrap_err();
        assert_eq!(err.field(), Some("propertyType"));

        let err = schema()
            .validate_patch(&payload(json!({"price": "$1", "address": "A", "beds": -2})))
            .unwrap_err();
        assert_eq!(err, ValidationError::BelowMinimum { field: "beds", min: 0 });
    }

    #[test]
    fn test_partial_ignores_server_owned_keys() {
        let patch = schema()
            .validate_patch(&payload(json!({
                "id": "7",
                "imageRef": "images/other.jpg",
                "price": "$1",
                "address": "A"
            })))
            .unwrap();
        assert_eq!(patch.price.as_deref(), Some("$1"));

        let err = schema()
            .validate_patch(&payload(json!({"price": "$1", "address": "A", "garage": true})))
            .unwrap_err();
        assert_eq!(err.field(), Some("garage"));
    }
}
