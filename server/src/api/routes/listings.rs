//! Property listing endpoints

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::types::{ApiError, ErrorBody};
use crate::domain::listings::ListingService;

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct ListingsApiState {
    pub service: Arc<ListingService>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(service: Arc<ListingService>) -> Router<()> {
    let state = ListingsApiState { service };
    Router::new()
        .route("/listings", get(list_recent))
        .route("/filter", get(filter_listings))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Most recently modified listings for sale
#[utoipa::path(
    get,
    path = "/property-listings/listings",
    tag = "listings",
    responses(
        (status = 200, description = "OData response body from the MLS"),
        (status = 500, description = "MLS request failed", body = ErrorBody)
    )
)]
pub async fn list_recent(
    State(state): State<ListingsApiState>,
) -> Result<Json<Value>, ApiError> {
    let body = state.service.recent().await.map_err(ApiError::from_feed)?;
    Ok(Json(body))
}

/// Search listings by location, price, rooms, type and address
#[utoipa::path(
    get,
    path = "/property-listings/filter",
    tag = "listings",
    params(
        ("city" = Option<String>, Query, description = "City, case-insensitive"),
        ("state" = Option<String>, Query, description = "State or province"),
        ("country" = Option<String>, Query, description = "Country"),
        ("min" = Option<String>, Query, description = "Minimum list price"),
        ("max" = Option<String>, Query, description = "Maximum list price"),
        ("bedrooms" = Option<String>, Query, description = "Exact bedroom count (alias: Bedrooms)"),
        ("bathrooms" = Option<String>, Query, description = "Exact bathroom count (alias: Bathrooms)"),
        ("property" = Option<String>, Query, description = "Property type; overrides listingType"),
        ("listingType" = Option<String>, Query, description = "Buy or Rent; other values add no constraint"),
        ("street" = Option<String>, Query, description = "Street name prefix"),
        ("streetNumber" = Option<String>, Query, description = "Street number prefix"),
        ("postalCode" = Option<String>, Query, description = "Postal code prefix (alias: zip)"),
        ("address" = Option<String>, Query, description = "Free-text address prefix")
    ),
    responses(
        (status = 200, description = "OData response body, post-filtered on exact room counts"),
        (status = 400, description = "Non-numeric price or room count", body = ErrorBody),
        (status = 500, description = "MLS request failed", body = ErrorBody)
    )
)]
pub async fn filter_listings(
    State(state): State<ListingsApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .service
        .search(&params)
        .await
        .map_err(ApiError::from_search)?;
    Ok(Json(body))
}
