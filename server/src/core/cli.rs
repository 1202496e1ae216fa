use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_UPSTREAM_TIMEOUT_SECS, ENV_UPSTREAM_TOKEN,
    ENV_UPSTREAM_URL,
};

#[derive(Parser)]
#[command(name = "mls-proxy")]
#[command(version, about = "Listing search proxy for RESO OData MLS feeds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// OData Property resource URL of the MLS
    #[arg(long, global = true, env = ENV_UPSTREAM_URL)]
    pub upstream_url: Option<String>,

    /// Bearer token for the MLS API
    #[arg(long, global = true, env = ENV_UPSTREAM_TOKEN, hide_env_values = true)]
    pub upstream_token: Option<String>,

    /// Upstream request timeout in seconds (0 = no timeout)
    #[arg(long, global = true, env = ENV_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout: Option<u64>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the upstream URL a filter request would produce
    Preview {
        /// Query string as sent to /property-listings/filter, e.g. "city=Dublin&min=100000"
        query: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub upstream_url: Option<String>,
    pub upstream_token: Option<String>,
    pub upstream_timeout: Option<u64>,
}

impl From<Cli> for (CliConfig, Option<Commands>) {
    fn from(cli: Cli) -> Self {
        let config = CliConfig {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            upstream_url: cli.upstream_url,
            upstream_token: cli.upstream_token,
            upstream_timeout: cli.upstream_timeout,
        };
        (config, cli.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    Cli::parse().into()
}
