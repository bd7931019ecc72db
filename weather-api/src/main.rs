//! Binary crate for the `weather-api` HTTP server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Routing and per-route request handling
//! - Mapping domain errors onto HTTP responses

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod error;
mod handlers;
mod routes;
mod server;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_api=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
