//! Travel Worker - route planning and trip allowance service
//!
//! This worker connects to NATS and answers trip planning requests from the
//! orchestrator. It can also plan a single trip from the command line.

mod cli;
mod config;
mod defaults;
mod error;
mod handlers;
mod services;
mod types;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::cli::{Cli, Command};
use crate::services::allowance::CostEstimator;
use crate::services::locations::RegionTable;
use crate::services::planner::RoutePlanner;
use crate::services::trip::{TripService, TripSettings};
use crate::types::FuelRateSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "travel-worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // stdout carries the JSON quote in CLI mode, so console logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,travel_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))  // file
        .init();

    let cli = Cli::parse();

    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    let service = Arc::new(build_trip_service(&config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, service).await,
        Command::Plan(args) => {
            let quote = service.quote(&args.into_request())?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
            Ok(())
        }
        Command::Regions { region } => {
            let regions = service
                .table()
                .summaries(region.as_deref())
                .ok_or_else(|| anyhow::anyhow!("unknown region '{}'", region.unwrap_or_default()))?;
            println!("{}", serde_json::to_string_pretty(&regions)?);
            Ok(())
        }
    }
}

fn build_trip_service(config: &config::Config) -> Result<TripService> {
    let table = match &config.region_table_path {
        Some(path) => RegionTable::load(path)?,
        None => RegionTable::builtin()?,
    };
    info!(
        "Region table loaded: {} regions ({})",
        table.regions().len(),
        config.region_table_path.as_deref().unwrap_or("built-in")
    );

    if config.fuel_rate_source == FuelRateSource::Fallback {
        warn!(
            "FUEL_RATE_PER_KM not set, using fallback fuel rate {} per km",
            config.fuel_rate_per_km
        );
    }

    Ok(TripService::new(
        Arc::new(table),
        RoutePlanner::new(config.route_strategy),
        CostEstimator::new(config.incidental_allowance),
        TripSettings {
            headquarters: config.headquarters.clone(),
            fuel_rate_per_km: config.fuel_rate_per_km,
            fuel_rate_source: config.fuel_rate_source,
            allow_empty_trip: config.allow_empty_trip,
        },
    ))
}

async fn serve(config: &config::Config, service: Arc<TripService>) -> Result<()> {
    info!("Starting Travel Worker...");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (&config.nats_user, &config.nats_password) {
        (Some(user), Some(password)) => {
            async_nats::ConnectOptions::new()
                .user_and_password(user.clone(), password.clone())
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    let handler_result = handlers::start_handlers(nats_client, service).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}
