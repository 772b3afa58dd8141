//! # LookAt CLI
//!
//! Command-line front end over the posts repository.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod state;
mod telemetry;
mod view_model;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    // Load configuration
    let config = AppConfig::from_env();

    telemetry::init_telemetry(&config.telemetry, cli.verbose);

    // Build application state
    let state = AppState::new(&config).await;

    commands::run_command(cli, &state).await
}
