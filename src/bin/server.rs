//! chunkwire Reference Server Binary
//!
//! Serves the chunk protocol from memory. Useful for trying the CLI locally.

use std::process;
use std::sync::Arc;

use chunkwire::network::{ChunkStore, Server};
use chunkwire::Config;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// chunkwire reference server
#[derive(Parser, Debug)]
#[command(name = "chunkwire-server")]
#[command(about = "In-memory chunk server speaking the chunkwire protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8111")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chunkwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("chunkwire server v{}", chunkwire::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .server_workers(args.workers)
        .build();

    let server = match Server::bind(config, Arc::new(ChunkStore::new())) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }

    tracing::info!("Server stopped");
}
