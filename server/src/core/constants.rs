// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "MLS Proxy";

/// Crate log target used in the default filter
pub const LOG_TARGET: &str = "mls_proxy_server";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".mls-proxy";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "mls-proxy.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "MLS_PROXY_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "MLS_PROXY_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "MLS_PROXY_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "MLS_PROXY_LOG";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "MLS_PROXY_DEBUG";

// =============================================================================
// Environment Variables - Upstream MLS
// =============================================================================

/// Environment variable for the OData property resource URL
pub const ENV_UPSTREAM_URL: &str = "MLS_PROXY_UPSTREAM_URL";

/// Environment variable for the upstream bearer token
pub const ENV_UPSTREAM_TOKEN: &str = "MLS_PROXY_UPSTREAM_TOKEN";

/// Token variable used by existing Spark deployments, read as a fallback
pub const ENV_SPARK_API_KEY: &str = "SPARK_API_KEY";

/// Environment variable for the upstream request timeout
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "MLS_PROXY_UPSTREAM_TIMEOUT_SECS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 1337;

/// Request body limit; every route is GET
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Upstream Defaults
// =============================================================================

/// Spark RESO replication endpoint for the Property resource
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://replication.sparkapi.com/Version/3/Reso/OData/Property";

/// Upstream request deadline in seconds (0 = none)
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Page size of the unfiltered landing feed
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 18;

/// Page size of filtered searches; large enough to survive post-filtering
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 300;

/// Upper bound accepted by the OData `$top` parameter on Spark
pub const MAX_PAGE_SIZE: u32 = 1000;
