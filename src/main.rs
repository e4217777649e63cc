//! Gatekeeper - accounts and RBAC behind JWT authentication

use clap::{Parser, Subcommand};
use gatekeeper::auth::AuthSystem;
use gatekeeper::auth::seeder::SeedDataset;
use gatekeeper::config::{Config, DEFAULT_CONFIG_PATH, LoggingConfig};
use gatekeeper::server;
use gatekeeper::storage::StorageLayer;
use gatekeeper::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gatekeeper", version)]
#[command(about = "User accounts and role-based access control service", long_about = None)]
struct Cli {
    /// YAML configuration file; environment variables override it
    #[arg(short, long, env = "GATEKEEPER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Seed roles, permissions and the admin account, then exit
    Seed {
        /// YAML dataset; the built-in dataset when omitted
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.logging());

    match execute(cli.command.unwrap_or(Commands::Serve), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn execute(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Serve => server::builder::run_server(config).await,
        Commands::Migrate => {
            StorageLayer::new(config.storage()).await?;
            info!("Database is up to date");
            Ok(())
        }
        Commands::Seed { dataset } => {
            let storage = Arc::new(StorageLayer::new(config.storage()).await?);
            let auth = AuthSystem::new(config.auth(), storage)?;

            let dataset = match dataset.or_else(|| config.seed().dataset.clone()) {
                Some(path) => SeedDataset::from_file(path).await?,
                None => SeedDataset::builtin(),
            };
            let report = auth.seeder().run(&dataset).await?;
            info!(
                "Seeded dataset v{}: {} permissions, {} roles created, {} roles updated, {} users",
                report.version,
                report.permissions_created,
                report.roles_created,
                report.roles_updated,
                report.users_created
            );
            Ok(())
        }
    }
}
