//! Listing search
//!
//! Turns frontend query parameters into a RESO OData query, runs it through a
//! [`ListingSource`](crate::data::upstream::ListingSource) and re-applies the
//! exact-count filters the MLS does not enforce.
//!
//! ```text
//! query string → FilterRequest → Vec<Predicate> → $filter → MLS → post-filter
//! ```

mod error;
pub mod filter;
pub mod odata;
pub mod params;
pub mod postfilter;
mod query;
mod service;

pub use error::{FilterError, ListingError};
pub use params::{FilterRequest, ListingType};
pub use query::ListingQuery;
pub use service::{ListingService, search_query};
