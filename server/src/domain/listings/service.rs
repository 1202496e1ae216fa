use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::error::{FilterError, ListingError};
use super::filter::{build_clauses, fields, listing_type_clause};
use super::odata::{Predicate, render_all};
use super::params::{FilterRequest, ListingType};
use super::postfilter::{self, leading_integer};
use super::query::ListingQuery;
use crate::data::upstream::{ListingSource, UpstreamError};

/// Number of records sampled into the trace log after a search
const LOCATION_SAMPLE_SIZE: usize = 5;

/// Listing search: normalize, build, fetch, post-filter
#[derive(Debug, Clone)]
pub struct ListingService {
    source: Arc<dyn ListingSource>,
    feed_page_size: u32,
    search_page_size: u32,
}

impl ListingService {
    pub fn new(source: Arc<dyn ListingSource>, feed_page_size: u32, search_page_size: u32) -> Self {
        Self {
            source,
            feed_page_size,
            search_page_size,
        }
    }

    /// Query for the landing feed: newest "Buy" listings
    pub fn recent_query(&self) -> ListingQuery {
        let filter = listing_type_clause(&ListingType::Buy).map(|p| p.render());
        ListingQuery::new(filter, self.feed_page_size)
    }

    /// Translate a normalized request into the upstream query
    pub fn search_query(&self, req: &FilterRequest) -> Result<ListingQuery, ListingError> {
        Ok(search_query(req, self.search_page_size)?)
    }

    /// Recent listings feed, passed through unchanged
    pub async fn recent(&self) -> Result<Value, UpstreamError> {
        let query = self.recent_query();
        self.source.fetch(&query).await
    }

    /// Filtered search over raw query-string pairs
    pub async fn search(&self, raw: &HashMap<String, String>) -> Result<Value, ListingError> {
        let req = FilterRequest::from_query(raw);
        let query = self.search_query(&req)?;
        tracing::debug!(
            source = self.source.name(),
            filter = query.filter.as_deref().unwrap_or(""),
            "Searching listings"
        );

        let mut body = self.source.fetch(&query).await?;
        log_location_sample(&body);

        let constraints = exact_count_constraints(&req);
        if !constraints.is_empty() {
            let before = record_count(&body);
            postfilter::apply(&mut body, &constraints);
            tracing::debug!(
                before = ?before,
                after = ?record_count(&body),
                "Applied exact-count post-filter"
            );
        }
        Ok(body)
    }
}

/// Upstream query for a filtered search returning at most `top` records
pub fn search_query(req: &FilterRequest, top: u32) -> Result<ListingQuery, FilterError> {
    let clauses: Vec<Predicate> = build_clauses(req)?;
    Ok(ListingQuery::new(render_all(&clauses), top))
}

/// Bedroom/bathroom counts the upstream may have applied loosely.
/// A supplied count without a representable integer yields `None`.
fn exact_count_constraints(req: &FilterRequest) -> Vec<(&'static str, Option<i64>)> {
    let mut out = Vec::new();
    if let Some(bedrooms) = &req.bedrooms {
        out.push((fields::BEDROOMS, leading_integer(bedrooms.as_str())));
    }
    if let Some(bathrooms) = &req.bathrooms {
        out.push((fields::BATHROOMS, leading_integer(bathrooms.as_str())));
    }
    out
}

fn record_count(body: &Value) -> Option<usize> {
    body.get("value").and_then(Value::as_array).map(Vec::len)
}

fn log_location_sample(body: &Value) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    let Some(records) = body.get("value").and_then(Value::as_array) else {
        return;
    };
    for record in records.iter().take(LOCATION_SAMPLE_SIZE) {
        tracing::trace!(
            city = %record[fields::CITY],
            state = %record[fields::STATE],
            country = %record[fields::COUNTRY],
            "Sample listing location"
        );
    }
}
