//! PyroKV CLI Client
//!
//! Command-line interface for interacting with a PyroKV server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pyrokv::config::ClientConfigBuilder;
use pyrokv::{Client, ClientConfig, PyroError};
use tracing_subscriber::{fmt, EnvFilter};

/// PyroKV CLI
#[derive(Parser, Debug)]
#[command(name = "pyrokv-cli")]
#[command(about = "CLI for the PyroKV key-value store")]
#[command(version)]
struct Args {
    /// Server host (defaults to $MCQUEEN_HOST, then localhost)
    #[arg(long)]
    host: Option<String>,

    /// Server port (defaults to $MCQUEEN_PORT, then 8001)
    #[arg(short, long)]
    port: Option<u16>,

    /// Per-request timeout in milliseconds
    #[arg(short, long, default_value = "2000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,

        /// Print the value as hex instead of text
        #[arg(long)]
        hex: bool,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expire the key after this many seconds
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,pyrokv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_key_not_found() => {
            eprintln!("(not found)");
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<(), PyroError> {
    let config = build_config(&args)?;
    tracing::debug!("Connecting to {}", config.addr());

    let client = Client::connect(config)?;

    let outcome = match args.command {
        Commands::Get { key, hex } => client.get_bytes(&key).map(|value| {
            if hex {
                let encoded: String = value.iter().map(|b| format!("{:02x}", b)).collect();
                println!("{}", encoded);
            } else {
                println!("{}", String::from_utf8_lossy(&value));
            }
        }),
        Commands::Set { key, value, ttl } => {
            let stored = match ttl {
                Some(secs) => {
                    client.set_with_ttl(&key, value.as_bytes(), Duration::from_secs(secs))
                }
                None => client.set(&key, value.as_bytes()),
            };
            stored.map(|()| println!("OK"))
        }
        Commands::Del { key } => client.delete(&key).map(|()| println!("OK")),
    };

    finish(outcome, client.close())
}

/// The operation's result wins; a failed close is only logged
fn finish(outcome: Result<(), PyroError>, closed: Result<(), PyroError>) -> Result<(), PyroError> {
    if let Err(e) = closed {
        tracing::warn!("Failed to close connection: {}", e);
    }
    outcome
}

fn build_config(args: &Args) -> Result<ClientConfig, PyroError> {
    let mut builder =
        ClientConfigBuilder::from_config(ClientConfig::from_env()?).request_timeout_ms(args.timeout_ms);

    if let Some(host) = &args.host {
        builder = builder.host(host.as_str());
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }

    Ok(builder.build())
}
