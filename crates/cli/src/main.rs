//! Storefront CLI - migrations, seeding, and schema inspection.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! store-cli migrate
//!
//! # Load collections, promotions and products from YAML
//! store-cli seed --file crates/cli/fixtures/catalog.yaml
//!
//! # Check a seed file without touching the database
//! store-cli seed --file catalog.yaml --check
//!
//! # Log every table and foreign key with its deletion policy
//! store-cli schema
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (see `StoreConfig`)
//! - `RUST_LOG` - Log filter (default: `store_cli=info,storefront_store=info`)
//! - `LOG_FORMAT` - Set to `json` for JSON log lines

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "store-cli")]
#[command(author, version, about = "Storefront schema tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog from a YAML file
    Seed {
        /// Path to the catalog YAML file
        #[arg(short, long)]
        file: String,

        /// Validate the file and exit without connecting to the database
        #[arg(long)]
        check: bool,
    },
    /// Describe tables and relationships
    Schema,
}

/// Log filter used when `RUST_LOG` is unset. The first directive is this
/// binary's own target (`store_cli`).
const DEFAULT_LOG_FILTER: &str = concat!(env!("CARGO_CRATE_NAME"), "=info,storefront_store=info");

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, check } => commands::seed::catalog(&file, check).await?,
        Commands::Schema => commands::schema::describe(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_log_filter_enables_cli_target() {
        let target = module_path!().split("::").next().unwrap_or_default();
        assert_eq!(target, "store_cli");
        assert!(
            DEFAULT_LOG_FILTER
                .split(',')
                .any(|directive| directive == format!("{target}=info")),
            "{DEFAULT_LOG_FILTER}"
        );
        assert!(DEFAULT_LOG_FILTER.parse::<tracing_subscriber::EnvFilter>().is_ok());
    }

    #[test]
    fn test_parse_seed_args() {
        let cli = Cli::parse_from(["store-cli", "seed", "--file", "catalog.yaml", "--check"]);
        assert!(matches!(
            cli.command,
            Commands::Seed { ref file, check: true } if file == "catalog.yaml"
        ));
    }
}
