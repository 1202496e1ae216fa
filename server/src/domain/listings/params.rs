//! Query parameter normalization
//!
//! Turns the raw query-string map of a search request into a [`FilterRequest`]:
//! resolves alias parameters, drops blank values and percent-decodes the
//! free-text location fields. Numeric values are kept as raw strings here;
//! they are validated when the filter is built.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Recognized query parameter names
pub mod names {
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const COUNTRY: &str = "country";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    /// Preferred first, alias second
    pub const BEDROOMS: &[&str] = &["bedrooms", "Bedrooms"];
    pub const BATHROOMS: &[&str] = &["bathrooms", "Bathrooms"];
    pub const POSTAL_CODE: &[&str] = &["postalCode", "zip"];
    pub const PROPERTY: &str = "property";
    pub const LISTING_TYPE: &str = "listingType";
    pub const STREET: &str = "street";
    pub const STREET_NUMBER: &str = "streetNumber";
    pub const ADDRESS: &str = "address";
}

/// Buy/Rent switch. Matching is case-sensitive; anything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingType {
    Buy,
    Rent,
    Other(String),
}

impl ListingType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Buy" => Self::Buy,
            "Rent" => Self::Rent,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A value and the query parameter it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplied {
    pub param: &'static str,
    pub value: String,
}

impl Supplied {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Normalized search constraints. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<Supplied>,
    pub bathrooms: Option<Supplied>,
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

impl FilterRequest {
    /// Build from already URL-decoded query pairs. Unknown keys are ignored.
    pub fn from_query(raw: &HashMap<String, String>) -> Self {
        let get = |key: &str| present(raw, key);
        let first = |keys: &[&'static str]| {
            keys.iter()
                .find_map(|&param| present(raw, param).map(|value| Supplied { param, value }))
        };

        Self {
            city: get(names::CITY).map(decode),
            state: get(names::STATE).map(decode),
            country: get(names::COUNTRY).map(decode),
            min_price: get(names::MIN),
            max_price: get(names::MAX),
            bedrooms: first(names::BEDROOMS),
            bathrooms: first(names::BATHROOMS),
            property_type: get(names::PROPERTY).map(decode),
            listing_type: get(names::LISTING_TYPE).map(|s| ListingType::parse(&s)),
            street: get(names::STREET),
            street_number: get(names::STREET_NUMBER),
            postal_code: first(names::POSTAL_CODE).map(|s| s.value),
            address: get(names::ADDRESS),
        }
    }
}

/// Blank values count as absent
fn present(raw: &HashMap<String, String>, key: &str) -> Option<String> {
    raw.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Second percent-decode pass for values that clients double-encode
/// (e.g. `S%2520Charleston`). Malformed escapes are left as-is.
fn decode(value: String) -> String {
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}
