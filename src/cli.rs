//! CLI argument parsing for the travel-worker binary.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::types::{GeoPoint, RouteStrategy, TripRequest};

#[derive(Parser)]
#[command(name = "travel-worker", about = "Field trip route planning and allowance worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a single trip and print the quote as JSON
    Plan(PlanArgs),
    /// List regions and their known stops
    Regions {
        /// Only list this region
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Region identifier
    #[arg(long)]
    pub region: String,

    /// Stop name (repeat for several stops)
    #[arg(long = "stop", required = true)]
    pub stops: Vec<String>,

    /// Flat service fee
    #[arg(long)]
    pub fee: Option<Decimal>,

    /// Fuel rate per km, overrides the configured rate
    #[arg(long)]
    pub fuel_rate: Option<Decimal>,

    /// Start latitude (defaults to the configured HQ)
    #[arg(long, requires = "start_lng", allow_hyphen_values = true)]
    pub start_lat: Option<f64>,

    /// Start longitude
    #[arg(long, requires = "start_lat", allow_hyphen_values = true)]
    pub start_lng: Option<f64>,

    /// Label for an explicit start point
    #[arg(long, default_value = "Start")]
    pub start_label: String,

    /// Ordering strategy: nearest_neighbor, exact or auto
    #[arg(long)]
    pub strategy: Option<RouteStrategy>,
}

impl PlanArgs {
    pub fn into_request(self) -> TripRequest {
        let start = match (self.start_lat, self.start_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(self.start_label, lat, lng)),
            _ => None,
        };

        TripRequest {
            region: self.region,
            stop_names: self.stops,
            start,
            flat_service_fee: self.fee,
            fuel_rate_per_km: self.fuel_rate,
            strategy: self.strategy,
        }
    }
}
