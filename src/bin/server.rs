//! docstore Server Binary
//!
//! Starts the TCP server for docstore.

use std::sync::Arc;

use clap::Parser;
use docstore::network::Server;
use docstore::protocol::DEFAULT_MAX_FRAME_SIZE;
use docstore::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// docstore Server
#[derive(Parser, Debug)]
#[command(name = "docstore-server")]
#[command(about = "JSON document store served over TCP")]
#[command(version)]
struct Args {
    /// Port to listen on (takes precedence over --port)
    #[arg(value_name = "PORT")]
    listen_port: Option<u16>,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Root directory holding one sub-directory per database
    #[arg(short, long, default_value = "./docstore_data")]
    db_dir: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Largest request frame accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_SIZE)]
    max_frame_size: u32,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,docstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let port = args.listen_port.unwrap_or(args.port);
    let listen_addr = format!("{}:{}", args.host, port);

    tracing::info!("docstore server v{}", docstore::VERSION);
    tracing::info!("Data directory: {}", args.db_dir);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.db_dir)
        .listen_addr(listen_addr)
        .max_connections(args.max_connections)
        .max_frame_size(args.max_frame_size)
        .build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    // SIGINT / SIGTERM stop the accept loop; in-flight requests finish first
    let handle = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || handle.shutdown()) {
        tracing::warn!("Could not install signal handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
