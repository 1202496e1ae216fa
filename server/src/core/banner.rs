//! Startup banner and URL display

use super::constants::APP_NAME;

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, upstream_url: &str) {
    // Use localhost for display when binding to all interfaces
    let display_host = if matches!(host, "0.0.0.0" | "::" | "[::]") {
        "localhost"
    } else {
        host
    };
    let base = format!("http://{}:{}", display_host, port);

    // Label width: "Listings feed:" is 14 chars, pad to 16 for alignment
    const W: usize = 16;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/property-listings/listings",
        "Listings feed:", base
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/property-listings/filter",
        "Search:", base
    );
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/api/openapi.json",
        "OpenAPI:", base
    );
    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    }
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Upstream:", upstream_url);
    println!();
}
