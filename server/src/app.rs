//! Core application

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::core::shutdown::ShutdownService;
use crate::data::upstream::SparkClient;
use crate::domain::listings::{FilterRequest, ListingService, search_query};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub listings: Arc<ListingService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Preview { query }) => return Self::preview(&cli_config, &query),
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        Self::from_config(AppConfig::load(cli)?)
    }

    fn from_config(config: AppConfig) -> Result<Self> {
        let client = SparkClient::new(&config.upstream).context(
            "Failed to initialize MLS client (set MLS_PROXY_UPSTREAM_TOKEN or SPARK_API_KEY)",
        )?;
        let listings = Arc::new(ListingService::new(
            Arc::new(client),
            config.upstream.feed_page_size,
            config.upstream.search_page_size,
        ));

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            listings,
        })
    }

    /// Print the upstream URL a filter request would produce
    fn preview(cli: &CliConfig, query: &str) -> Result<()> {
        let config = AppConfig::load(cli)?;
        println!("{}", render_preview(&config, query)?);
        Ok(())
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug,tower_http=debug", LOG_TARGET)
        } else {
            format!("info,{}=info", LOG_TARGET)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.upstream.base_url,
        );

        let server = ApiServer::new(&app.config.server, app.listings.clone(), app.shutdown.clone());
        server.start().await?;

        tracing::debug!("Shutdown complete");
        Ok(())
    }
}

/// `$filter` line followed by the full upstream URL
fn render_preview(config: &AppConfig, query: &str) -> Result<String> {
    let raw = parse_query_string(query)?;
    let request = FilterRequest::from_query(&raw);
    let listing_query = search_query(&request, config.upstream.search_page_size)?;

    let filter = listing_query.filter.as_deref().unwrap_or("(none)");
    Ok(format!(
        "$filter: {}\n{}",
        filter,
        listing_query.to_url(&config.upstream.base_url)
    ))
}

/// Decode a raw `a=1&b=2` query string; a leading `?` is ignored
fn parse_query_string(query: &str) -> Result<HashMap<String, String>> {
    let url = reqwest::Url::parse(&format!(
        "http://preview.invalid/?{}",
        query.trim().trim_start_matches('?')
    ))
    .with_context(|| format!("Invalid query string: {}", query))?;
    Ok(url.query_pairs().into_owned().collect())
}
