//! Leave ledger HTTP service.

use std::path::PathBuf;

use clap::Parser;
use conges_ledger::api::{AppState, create_router};
use conges_ledger::config::ConfigLoader;
use conges_ledger::ledger::LeaveLedger;
use conges_ledger::storage::InMemoryEmployeeRepository;
use tracing::info;

/// Paid-leave ledger for home-care employees.
#[derive(Parser)]
#[command(name = "conges-ledger")]
struct Cli {
    /// Directory holding server.yaml and employees.yaml
    #[arg(long, default_value = "config")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(config = %cli.config.display(), "Loading configuration");
    let config = ConfigLoader::load(&cli.config)?.into_config();

    let ledger = LeaveLedger::new(InMemoryEmployeeRepository::new());
    for employee in config.seed_employees() {
        ledger.create_employee(employee.clone())?;
    }
    info!(employees = config.seed_employees().len(), "Seed records loaded");

    let state = AppState::new(ledger, config.server().default_page_size);
    let router = create_router(state);

    let address = config.server().bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Leave ledger listening");
    axum::serve(listener, router).await?;

    Ok(())
}
