//! usuarios-server entry point.
//!
//! Parses configuration, runs the server, prints errors to stderr and exits
//! non-zero on failure.

use clap::Parser;
use usuarios_server::ServerConfig;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    if let Err(err) = usuarios_server::run(config).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
