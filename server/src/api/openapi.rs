//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, listings};
use crate::api::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MLS Proxy API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Listing search over a RESO OData MLS feed"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "listings", description = "Property listing feed and search")
    ),
    paths(
        health::health,
        listings::list_recent,
        listings::filter_listings,
    ),
    components(schemas(health::HealthResponse, ErrorBody))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
