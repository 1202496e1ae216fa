//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::{health, listings};
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::core::{ServerConfig, ShutdownService};
use crate::domain::listings::ListingService;

pub struct ApiServer {
    host: String,
    port: u16,
    router: Router,
    shutdown: ShutdownService,
}

impl ApiServer {
    pub fn new(
        config: &ServerConfig,
        listings: Arc<ListingService>,
        shutdown: ShutdownService,
    ) -> Self {
        let allowed_origins = AllowedOrigins::new(&config.allowed_origins);
        Self {
            host: config.host.trim_matches(['[', ']']).to_string(),
            port: config.port,
            router: router(listings, &allowed_origins),
            shutdown,
        }
    }

    /// Serve until the shutdown signal fires
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.host, self.port))?;
        tracing::info!(addr = %listener.local_addr()?, "Listening");

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(self.shutdown.wait())
        .await?;

        tracing::debug!("Server stopped");
        Ok(())
    }
}

/// Full application router
pub fn router(listings: Arc<ListingService>, allowed_origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/property-listings", listings::routes(listings))
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::data::upstream::{ListingSource, UpstreamError};
    use crate::domain::listings::ListingQuery;

    #[derive(Debug)]
    struct EmptySource;

    #[async_trait]
    impl ListingSource for EmptySource {
        async fn fetch(&self, _query: &ListingQuery) -> Result<Value, UpstreamError> {
            Ok(json!({"value": []}))
        }

        fn name(&self) -> &'static str {
            "empty"
        }
    }

    fn test_router(origins: &[String]) -> Router {
        let service = Arc::new(ListingService::new(Arc::new(EmptySource), 18, 300));
        router(service, &AllowedOrigins::new(origins))
    }

    #[tokio::test]
    async fn test_health() {
        let resp = test_router(&[])
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_listing_routes_are_nested() {
        let resp = test_router(&[])
            .oneshot(
                Request::get("/property-listings/listings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let resp = test_router(&[])
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let resp = test_router(&[])
            .oneshot(Request::get("/api/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_any_origin_by_default() {
        let resp = test_router(&[])
            .oneshot(
                Request::get("/api/v1/health")
                    .header(header::ORIGIN, "https://homes.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let router = test_router(&["https://homes.example".to_string()]);
        let resp = router
            .oneshot(
                Request::get("/api/v1/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
