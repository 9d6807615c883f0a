//! NATS message handlers

pub mod ping;
pub mod trip;

use std::sync::Arc;
use anyhow::Result;
use async_nats::Client;
use tracing::{info, error};
use tokio::select;

use crate::services::trip::TripService;

pub const SUBJECT_PING: &str = "travel.ping";
pub const SUBJECT_TRIP_PLAN: &str = "travel.trip.plan";
pub const SUBJECT_REGION_LIST: &str = "travel.region.list";

/// Start all message handlers
pub async fn start_handlers(client: Client, service: Arc<TripService>) -> Result<()> {
    info!("Starting message handlers...");

    let ping_sub = client.subscribe(SUBJECT_PING).await?;
    let trip_plan_sub = client.subscribe(SUBJECT_TRIP_PLAN).await?;
    let region_list_sub = client.subscribe(SUBJECT_REGION_LIST).await?;

    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let client_trip_plan = client.clone();
    let client_region_list = client.clone();

    let service_trip_plan = Arc::clone(&service);
    let service_region_list = Arc::clone(&service);

    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let trip_plan_handle = tokio::spawn(async move {
        trip::handle_plan(client_trip_plan, trip_plan_sub, service_trip_plan).await
    });

    let region_list_handle = tokio::spawn(async move {
        trip::handle_region_list(client_region_list, region_list_sub, service_region_list).await
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which would indicate an error)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = trip_plan_handle => {
            error!("Trip plan handler finished: {:?}", result);
        }
        result = region_list_handle => {
            error!("Region list handler finished: {:?}", result);
        }
    }

    Ok(())
}
