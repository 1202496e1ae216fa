use thiserror::Error;

use crate::data::upstream::UpstreamError;

/// Rejected filter input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Parameter '{param}' must be a number, got '{value}'")]
    InvalidNumber { param: &'static str, value: String },
}

/// Listing service error
#[derive(Error, Debug)]
pub enum ListingError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
