use async_trait::async_trait;
use serde_json::Value;

use super::error::UpstreamError;
use crate::domain::listings::ListingQuery;

/// Executes listing queries against the MLS
#[async_trait]
pub trait ListingSource: Send + Sync + std::fmt::Debug {
    /// Run one query and return the raw JSON body
    async fn fetch(&self, query: &ListingQuery) -> Result<Value, UpstreamError>;

    /// Human-readable backend name
    fn name(&self) -> &'static str;
}
