//! PIM API - HTTP server and maintenance commands.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service_lib::MigrateAction;
use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "pim-api")]
#[command(author, version, about = "Product information management API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },

    /// Insert or rename the lookup rows (roles, statuses, product types)
    Seed,
}

#[derive(Args)]
struct ServeArgs {
    /// Host to bind to (overrides GATEWAY_HOST)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides GATEWAY_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let mut config = GatewayConfig::from_env();
            if let Some(host) = args.host {
                config.host = host;
            }
            if let Some(port) = args.port {
                config.port = port;
            }
            gateway_lib::run(config).await?;
        }
        Commands::Migrate { action } => {
            catalog_service_lib::run_migrations(action.into()).await?;
        }
        Commands::Seed => {
            let report = catalog_service_lib::seed().await?;
            tracing::info!(
                created = report.created,
                renamed = report.renamed,
                "Lookup tables seeded"
            );
        }
    }

    Ok(())
}
