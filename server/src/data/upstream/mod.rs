//! Upstream MLS access
//!
//! `ListingSource` is the seam between the listing service and the network;
//! `SparkClient` is the RESO OData implementation used in production.

mod client;
mod error;
mod source;

pub use client::SparkClient;
pub use error::UpstreamError;
pub use source::ListingSource;
