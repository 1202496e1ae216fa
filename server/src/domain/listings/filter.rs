//! Filter expression builder
//!
//! Maps a [`FilterRequest`] onto OData predicates over RESO field names.

use super::error::FilterError;
use super::odata::{Literal, Number, Operand, Predicate};
use super::params::{FilterRequest, ListingType, names};

/// RESO field names used by the builder and the post-filter
pub mod fields {
    pub const CITY: &str = "City";
    pub const STATE: &str = "StateOrProvince";
    pub const COUNTRY: &str = "Country";
    pub const PROPERTY_TYPE: &str = "PropertyType";
    pub const LIST_PRICE: &str = "ListPrice";
    pub const BEDROOMS: &str = "BedroomsTotal";
    pub const BATHROOMS: &str = "BathroomsTotalInteger";
    pub const STREET_NAME: &str = "StreetName";
    pub const STREET_NUMBER: &str = "StreetNumber";
    pub const STREET_DIR_PREFIX: &str = "StreetDirPrefix";
    pub const STREET_SUFFIX: &str = "StreetSuffix";
    pub const UNPARSED_ADDRESS: &str = "UnparsedAddress";
    pub const POSTAL_CODE: &str = "PostalCode";
}

/// Property types offered under "Buy"
pub const BUY_PROPERTY_TYPES: &[&str] = &[
    "Residential",
    "Residential Income",
    "Land",
    "Commercial Sale",
    "Farm",
    "Multi-Family",
];

/// Property types offered under "Rent"
pub const RENT_PROPERTY_TYPES: &[&str] = &["Residential Lease", "Commercial Lease"];

/// Build the clause list for a request. Clauses are joined with `and` by the caller.
pub fn build_clauses(req: &FilterRequest) -> Result<Vec<Predicate>, FilterError> {
    let mut clauses = Vec::new();

    if let Some(city) = &req.city {
        clauses.push(city_clause(city));
    }
    if let Some(state) = &req.state {
        clauses.push(Predicate::eq_text(fields::STATE, state.as_str()));
    }
    if let Some(country) = &req.country {
        clauses.push(Predicate::eq_text(fields::COUNTRY, country.as_str()));
    }

    // An explicit property type overrides the Buy/Rent grouping
    if let Some(property) = &req.property_type {
        clauses.push(Predicate::eq_text(fields::PROPERTY_TYPE, property.as_str()));
    } else if let Some(clause) = req.listing_type.as_ref().and_then(listing_type_clause) {
        clauses.push(clause);
    }

    if let Some(clause) = price_clause(req)? {
        clauses.push(clause);
    }

    if let Some(bedrooms) = &req.bedrooms {
        let n = Number::parse(bedrooms.param, bedrooms.as_str())?;
        clauses.push(Predicate::Eq(
            Operand::Field(fields::BEDROOMS),
            Literal::Number(n),
        ));
    }
    if let Some(bathrooms) = &req.bathrooms {
        let n = Number::parse(bathrooms.param, bathrooms.as_str())?;
        clauses.push(Predicate::Eq(
            Operand::Field(fields::BATHROOMS),
            Literal::Number(n),
        ));
    }

    if let Some(street) = &req.street {
        clauses.push(Predicate::starts_with(fields::STREET_NAME, street.as_str()));
    }
    if let Some(number) = &req.street_number {
        clauses.push(Predicate::StartsWith(
            Operand::StringCast(fields::STREET_NUMBER),
            number.clone(),
        ));
    }
    if let Some(postal) = &req.postal_code {
        clauses.push(Predicate::starts_with(fields::POSTAL_CODE, postal.as_str()));
    }
    if let Some(address) = &req.address {
        clauses.push(address_clause(address));
    }

    Ok(clauses)
}

/// Prefix match on the city as typed and upper-cased, plus exact equality
fn city_clause(city: &str) -> Predicate {
    Predicate::AnyOf(vec![
        Predicate::starts_with(fields::CITY, city),
        Predicate::starts_with(fields::CITY, city.to_uppercase()),
        Predicate::eq_text(fields::CITY, city),
    ])
}

/// OR-group over the property types of a listing type. `Other` yields nothing.
pub fn listing_type_clause(listing_type: &ListingType) -> Option<Predicate> {
    let types = match listing_type {
        ListingType::Buy => BUY_PROPERTY_TYPES,
        ListingType::Rent => RENT_PROPERTY_TYPES,
        ListingType::Other(_) => return None,
    };
    Some(Predicate::AnyOf(
        types
            .iter()
            .map(|t| Predicate::eq_text(fields::PROPERTY_TYPE, *t))
            .collect(),
    ))
}

fn price_clause(req: &FilterRequest) -> Result<Option<Predicate>, FilterError> {
    let operand = Operand::Field(fields::LIST_PRICE);
    let min = req
        .min_price
        .as_deref()
        .map(|v| Number::parse(names::MIN, v))
        .transpose()?;
    let max = req
        .max_price
        .as_deref()
        .map(|v| Number::parse(names::MAX, v))
        .transpose()?;

    Ok(match (min, max) {
        (Some(min), Some(max)) => Some(Predicate::Range { operand, min, max }),
        (Some(min), None) => Some(Predicate::Ge(operand, min)),
        (None, Some(max)) => Some(Predicate::Le(operand, max)),
        (None, None) => None,
    })
}

/// Free-text address: prefix match across every address component
fn address_clause(address: &str) -> Predicate {
    Predicate::AnyOf(vec![
        Predicate::starts_with(fields::STREET_NAME, address),
        Predicate::StartsWith(
            Operand::StringCast(fields::STREET_NUMBER),
            address.to_string(),
        ),
        Predicate::starts_with(fields::STREET_DIR_PREFIX, address),
        Predicate::starts_with(fields::STREET_SUFFIX, address),
        Predicate::starts_with(fields::UNPARSED_ADDRESS, address),
        Predicate::starts_with(fields::POSTAL_CODE, address),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::odata::render_all;
    use super::*;

    fn build(pairs: &[(&str, &str)]) -> Result<Option<String>, FilterError> {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let req = FilterRequest::from_query(&raw);
        Ok(render_all(&build_clauses(&req)?))
    }

    fn filter(pairs: &[(&str, &str)]) -> String {
        build(pairs).unwrap().unwrap()
    }

    #[test]
    fn test_no_params_no_filter() {
        assert_eq!(build(&[]).unwrap(), None);
    }

    #[test]
    fn test_city_clause() {
        assert_eq!(
            filter(&[("city", "dublin")]),
            "(startswith(City, 'dublin') or startswith(City, 'DUBLIN') or City eq 'dublin')"
        );
    }

    #[test]
    fn test_city_with_apostrophe() {
        let f = filter(&[("city", "O'Fallon")]);
        assert!(f.contains("City eq 'O''Fallon'"));
        assert!(f.contains("startswith(City, 'O''FALLON')"));
    }

    #[test]
    fn test_state_and_country() {
        assert_eq!(
            filter(&[("state", "OH"), ("country", "US")]),
            "StateOrProvince eq 'OH' and Country eq 'US'"
        );
    }

    #[test]
    fn test_buy_group_has_six_types() {
        let f = filter(&[("listingType", "Buy")]);
        assert!(f.starts_with('(') && f.ends_with(')'));
        assert_eq!(f.matches("PropertyType eq ").count(), 6);
        assert_eq!(f.matches(" or ").count(), 5);
        for t in BUY_PROPERTY_TYPES {
            assert!(f.contains(&format!("PropertyType eq '{}'", t)));
        }
    }

    #[test]
    fn test_rent_group_has_two_types() {
        assert_eq!(
            filter(&[("listingType", "Rent")]),
            "(PropertyType eq 'Residential Lease' or PropertyType eq 'Commercial Lease')"
        );
    }

    #[test]
    fn test_unknown_listing_type_ignored() {
        assert_eq!(build(&[("listingType", "Lease")]).unwrap(), None);
    }

    #[test]
    fn test_property_overrides_listing_type() {
        assert_eq!(
            filter(&[("property", "Land"), ("listingType", "Rent"), ("min", "50000")]),
            "PropertyType eq 'Land' and ListPrice ge 50000"
        );
    }

    #[test]
    fn test_price_range() {
        assert_eq!(
            filter(&[("min", "100000"), ("max", "200000")]),
            "ListPrice ge 100000 and ListPrice le 200000"
        );
        assert_eq!(filter(&[("min", "100000")]), "ListPrice ge 100000");
        assert_eq!(filter(&[("max", "200000")]), "ListPrice le 200000");
    }

    #[test]
    fn test_invalid_price_rejected() {
        let err = build(&[("min", "0 or true")]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidNumber {
                param: "min",
                value: "0 or true".to_string(),
            }
        );
    }

    #[test]
    fn test_bedroom_alias_precedence() {
        assert_eq!(
            filter(&[("bedrooms", "3"), ("Bedrooms", "4")]),
            "BedroomsTotal eq 3"
        );
    }

    #[test]
    fn test_invalid_count_names_supplied_alias() {
        assert_eq!(
            build(&[("Bedrooms", "two")]).unwrap_err(),
            FilterError::InvalidNumber {
                param: "Bedrooms",
                value: "two".to_string(),
            }
        );
        assert_eq!(
            build(&[("bathrooms", "x")]).unwrap_err(),
            FilterError::InvalidNumber {
                param: "bathrooms",
                value: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_bathrooms() {
        assert_eq!(
            filter(&[("Bathrooms", "2")]),
            "BathroomsTotalInteger eq 2"
        );
    }

    #[test]
    fn test_street_parts() {
        assert_eq!(
            filter(&[("street", "Main"), ("streetNumber", "12"), ("zip", "430")]),
            "startswith(StreetName, 'Main') and \
             startswith(cast(StreetNumber, 'Edm.String'), '12') and \
             startswith(PostalCode, '430')"
        );
    }

    #[test]
    fn test_address_group() {
        let f = filter(&[("address", "5 Oak")]);
        assert_eq!(
            f,
            "(startswith(StreetName, '5 Oak') or \
             startswith(cast(StreetNumber, 'Edm.String'), '5 Oak') or \
             startswith(StreetDirPrefix, '5 Oak') or \
             startswith(StreetSuffix, '5 Oak') or \
             startswith(UnparsedAddress, '5 Oak') or \
             startswith(PostalCode, '5 Oak'))"
        );
    }

    #[test]
    fn test_address_is_escaped() {
        let f = filter(&[("address", "St Mary's')")]);
        assert!(f.contains("startswith(StreetName, 'St Mary''s'')')"));
    }

    #[test]
    fn test_clause_order() {
        let f = filter(&[
            ("address", "Oak"),
            ("bedrooms", "2"),
            ("city", "Dublin"),
            ("max", "5"),
        ]);
        let city = f.find("City eq").unwrap();
        let price = f.find("ListPrice").unwrap();
        let beds = f.find("BedroomsTotal").unwrap();
        let addr = f.find("UnparsedAddress").unwrap();
        assert!(city < price && price < beds && beds < addr);
    }
}
