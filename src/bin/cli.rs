//! FineDB CLI Client
//!
//! Command-line interface for interacting with a FineDB server.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use finedb::{Client, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// FineDB CLI
#[derive(Parser, Debug)]
#[command(name = "finedb-cli")]
#[command(about = "CLI for the FineDB key-value store")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long)]
    port: u16,

    /// Database to select before running the command
    #[arg(short, long)]
    db: Option<String>,

    /// Connect/read/write timeout in milliseconds
    #[arg(short, long, default_value = "1000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Select a database (omit the name for the default database)
    Setdb {
        /// Database name
        name: Option<String>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let mut client = Client::with_config(config);

    match run(&mut client, &args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute the command; `Ok(false)` means the server answered negatively
fn run(client: &mut Client, args: &Args) -> finedb::Result<bool> {
    if let Some(db) = &args.db {
        if !client.set_db(Some(db.as_str()))? {
            eprintln!("(server refused database {})", db);
            return Ok(false);
        }
    }

    let ok = match &args.command {
        Commands::Ping => report(client.ping()?, "PONG"),
        Commands::Get { key } => match client.get(key)? {
            Some(value) => {
                println!("{}", String::from_utf8_lossy(&value));
                true
            }
            None => {
                println!("(nil)");
                false
            }
        },
        Commands::Put { key, value } => report(client.put(key, value.as_bytes())?, "OK"),
        Commands::Del { key } => report(client.del(key)?, "OK"),
        Commands::Setdb { name } => report(client.set_db(name.as_deref())?, "OK"),
    };

    Ok(ok)
}

fn report(ok: bool, message: &str) -> bool {
    if ok {
        println!("{}", message);
    } else {
        println!("(failed)");
    }
    ok
}
