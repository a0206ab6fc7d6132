//! docstore CLI Client
//!
//! Command-line interface for interacting with docstore, either through a
//! running server or directly against a data directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docstore::protocol::{Request, Response};
use docstore::{Client, Config, Engine};
use serde_json::{json, Map, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// docstore CLI
#[derive(Parser, Debug)]
#[command(name = "docstore-cli")]
#[command(about = "CLI for the docstore document store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Work on this data directory directly instead of contacting a server
    #[arg(long, conflicts_with = "server")]
    db_dir: Option<PathBuf>,

    /// Database name
    #[arg(short, long, default_value = "default")]
    database: String,

    /// Collection name (server default when omitted)
    #[arg(short, long)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a JSON object, or an array of objects
    Insert {
        /// Document(s) as JSON
        json: String,
    },

    /// Find documents matching a JSON query (all documents when omitted)
    Find {
        /// Query as JSON
        json: Option<String>,
    },

    /// Delete documents matching a JSON query
    Delete {
        /// Query as JSON
        json: String,
    },

    /// Record an index on a field
    #[command(alias = "create_index")]
    CreateIndex {
        /// Field name
        field: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(response) => {
            print_response(&response);
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Response, String> {
    let default_collection = Config::default().default_collection;
    let request = build_request(args)?;
    let request = Request::from_value(&request, &default_collection).map_err(|e| e.to_string())?;

    match &args.db_dir {
        Some(dir) => {
            let config = Config::builder().data_dir(dir).build();
            let engine = Engine::open(config).map_err(|e| e.to_string())?;
            Ok(engine.handle(&request))
        }
        None => {
            let mut client = Client::connect(&args.server)
                .map_err(|e| format!("Connection failed to {}: {}", args.server, e))?;
            client.send(&request).map_err(|e| e.to_string())
        }
    }
}

/// Assemble the wire request object from the command line
fn build_request(args: &Args) -> Result<Value, String> {
    let mut request = Map::new();
    request.insert("database".into(), json!(args.database));
    if let Some(collection) = &args.collection {
        request.insert("collection".into(), json!(collection));
    }

    let (operation, key, argument) = match &args.command {
        Commands::Insert { json } => ("insert", "data", parse_json(json)?),
        Commands::Find { json } => {
            let query = match json {
                Some(text) => parse_json(text)?,
                None => json!({}),
            };
            ("find", "query", query)
        }
        Commands::Delete { json } => ("delete", "query", parse_json(json)?),
        Commands::CreateIndex { field } => ("create_index", "field", json!(field)),
    };
    request.insert("operation".into(), json!(operation));
    request.insert(key.into(), argument);

    Ok(Value::Object(request))
}

fn parse_json(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| format!("Invalid JSON '{}': {}", text, e))
}

fn print_response(response: &Response) {
    println!("[{}] {}", response.status, response.message);
    for (i, document) in response.data.iter().enumerate() {
        let rendered = serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string());
        println!("\nDocument {}:\n{}", i + 1, rendered);
    }
}
