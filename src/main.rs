//! `deduction-registry` server binary.
//!
//! Usage:
//!   deduction-registry --config ./config/default --listen 127.0.0.1:8080

use clap::Parser;
use tracing::info;

use deduction_registry::api::{AppState, create_router};
use deduction_registry::config::ConfigLoader;

/// Payroll deduction registry server.
#[derive(Parser, Debug)]
#[command(name = "deduction-registry", about = "Payroll deduction registry server")]
struct Cli {
    /// Directory holding service.yaml, roster.yaml and deductions.yaml.
    #[arg(short = 'c', long = "config", env = "DEDUCTIONS_CONFIG", default_value = "./config/default")]
    config: String,

    /// Address to listen on.
    #[arg(long = "listen", default_value = "127.0.0.1:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {}", cli.config);
    let config = ConfigLoader::load(&cli.config)?;
    info!(
        employees = config.roster().len(),
        selected = config.initial_selection().len(),
        deductions = config.deductions().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Deduction registry listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
