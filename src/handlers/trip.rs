//! Trip planning message handlers

use std::sync::Arc;
use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde_json::json;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::TripError;
use crate::services::trip::TripService;
use crate::types::{
    ErrorResponse, RegionListRequest, RegionListResponse, Request, SuccessResponse,
    TripRequest,
};

/// Handle travel.trip.plan messages
///
/// Resolves the requested stops, plans the round trip and replies with the
/// allowance quote.
pub async fn handle_plan(
    client: Client,
    mut subscriber: Subscriber,
    service: Arc<TripService>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received trip.plan message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let response = plan_reply(&service, &msg.payload)?;
        if let Err(e) = client.publish(reply, response.into()).await {
            error!("Failed to publish trip.plan reply: {}", e);
        }
    }

    Ok(())
}

/// Handle travel.region.list messages
pub async fn handle_region_list(
    client: Client,
    mut subscriber: Subscriber,
    service: Arc<TripService>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received region.list message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let response = region_list_reply(&service, &msg.payload)?;
        if let Err(e) = client.publish(reply, response.into()).await {
            error!("Failed to publish region.list reply: {}", e);
        }
    }

    Ok(())
}

/// Build the serialized reply for a trip.plan payload
pub fn plan_reply(service: &TripService, payload: &[u8]) -> Result<Vec<u8>> {
    let request: Request<TripRequest> = match serde_json::from_slice(payload) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse trip.plan request: {}", e);
            let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
            return Ok(serde_json::to_vec(&error)?);
        }
    };

    match service.quote(&request.payload) {
        Ok(quote) => Ok(serde_json::to_vec(&SuccessResponse::new(request.id, quote))?),
        Err(e) => {
            warn!("Trip quote rejected ({}): {}", e.code(), e);
            Ok(serde_json::to_vec(&trip_error_response(request.id, &e))?)
        }
    }
}

/// Build the serialized reply for a region.list payload
pub fn region_list_reply(service: &TripService, payload: &[u8]) -> Result<Vec<u8>> {
    let request: Request<RegionListRequest> = match serde_json::from_slice(payload) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse region.list request: {}", e);
            let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
            return Ok(serde_json::to_vec(&error)?);
        }
    };

    let region = request.payload.region;
    let regions = match service.table().summaries(region.as_deref()) {
        Some(regions) => regions,
        None => {
            let err = TripError::InvalidRegion(region.unwrap_or_default());
            return Ok(serde_json::to_vec(&trip_error_response(request.id, &err))?);
        }
    };

    let response = SuccessResponse::new(request.id, RegionListResponse { regions });
    Ok(serde_json::to_vec(&response)?)
}

fn trip_error_response(request_id: Uuid, err: &TripError) -> ErrorResponse {
    let error = ErrorResponse::new(request_id, err.code(), err.to_string());
    match err {
        TripError::NoResolvableStops { unresolved, .. } => {
            error.with_details(json!({ "unresolvedStopNames": unresolved }))
        }
        _ => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::FALLBACK_FUEL_RATE_PER_KM;
    use crate::services::allowance::CostEstimator;
    use crate::services::locations::RegionTable;
    use crate::services::planner::RoutePlanner;
    use crate::services::trip::TripSettings;
    use crate::types::{Coordinates, FuelRateSource, GeoPoint};
    use serde_json::Value;

    fn service(allow_empty_trip: bool) -> TripService {
        let mut table = RegionTable::new();
        table
            .insert("tunis", "CNSS Tunis", Some(Coordinates::new(36.8142, 10.1789)))
            .insert("tunis", "Ministry of Finance", Some(Coordinates::new(36.8008, 10.1717)))
            .insert("sfax", "CNSS Sfax", Some(Coordinates::new(34.7394, 10.7547)));

        TripService::new(
            Arc::new(table),
            RoutePlanner::default(),
            CostEstimator::default(),
            TripSettings {
                headquarters: GeoPoint::new("HQ", 36.8065, 10.1815),
                fuel_rate_per_km: FALLBACK_FUEL_RATE_PER_KM,
                fuel_rate_source: FuelRateSource::Fallback,
                allow_empty_trip,
            },
        )
    }

    fn call_plan(service: &TripService, body: Value) -> Value {
        let bytes = plan_reply(service, body.to_string().as_bytes()).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn call_regions(service: &TripService, body: Value) -> Value {
        let bytes = region_list_reply(service, body.to_string().as_bytes()).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const REQUEST_ID: &str = "6b1e3c1a-2f4d-4b8e-9a51-0c8d1f2e3a4b";

    #[test]
    fn test_plan_success_envelope() {
        let response = call_plan(
            &service(true),
            json!({
                "id": REQUEST_ID,
                "payload": {
                    "region": "tunis",
                    "stopNames": ["Ministry of Finance", "CNSS Tunis", "Unknown Office"],
                    "flatServiceFee": "5.000"
                }
            }),
        );

        assert_eq!(response["id"], REQUEST_ID);
        let payload = &response["payload"];
        assert_eq!(payload["plan"]["orderedStops"].as_array().unwrap().len(), 2);
        assert_eq!(payload["unresolvedStopNames"], json!(["Unknown Office"]));
        assert_eq!(payload["hasUnresolved"], true);
        assert_eq!(payload["fuelRateSource"], "fallback");
        assert_eq!(payload["costs"]["lines"][0]["kind"], "service_fee");
        assert!(payload["description"].as_str().unwrap().contains(" -> "));
    }

    #[test]
    fn test_plan_invalid_json() {
        let bytes = plan_reply(&service(true), b"not json").unwrap();
        let response: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(response["error"]["code"], "INVALID_REQUEST");
        assert_eq!(response["id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_plan_unknown_region() {
        let response = call_plan(
            &service(true),
            json!({ "id": REQUEST_ID, "payload": { "region": "gabes", "stopNames": ["X"] } }),
        );

        assert_eq!(response["id"], REQUEST_ID);
        assert_eq!(response["error"]["code"], "INVALID_REGION");
    }

    #[test]
    fn test_plan_validation_error() {
        let response = call_plan(
            &service(true),
            json!({ "id": REQUEST_ID, "payload": { "region": "tunis", "stopNames": [] } }),
        );

        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_plan_no_resolvable_stops_lists_names() {
        let response = call_plan(
            &service(false),
            json!({ "id": REQUEST_ID, "payload": { "region": "tunis", "stopNames": ["Ghost"] } }),
        );

        assert_eq!(response["error"]["code"], "NO_RESOLVABLE_STOPS");
        assert_eq!(response["error"]["details"]["unresolvedStopNames"], json!(["Ghost"]));
    }

    #[test]
    fn test_plan_out_of_range_amounts_reply_with_error() {
        let svc = service(true);

        let response = call_plan(
            &svc,
            json!({
                "id": REQUEST_ID,
                "payload": {
                    "region": "tunis",
                    "stopNames": ["CNSS Tunis"],
                    "flatServiceFee": "79228162514264337593543950335"
                }
            }),
        );
        assert_eq!(response["id"], REQUEST_ID);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");

        let response = call_plan(
            &svc,
            json!({
                "id": REQUEST_ID,
                "payload": {
                    "region": "sfax",
                    "stopNames": ["CNSS Sfax"],
                    "fuelRatePerKm": "1000000000000000000000000000"
                }
            }),
        );
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_plan_rejects_sub_millime_fee() {
        let response = call_plan(
            &service(true),
            json!({
                "id": REQUEST_ID,
                "payload": { "region": "tunis", "stopNames": ["CNSS Tunis"], "flatServiceFee": "0.0004" }
            }),
        );

        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_region_list_all() {
        let response = call_regions(&service(true), json!({ "id": REQUEST_ID, "payload": {} }));

        let regions = response["payload"]["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0]["region"], "sfax");
        assert_eq!(regions[1]["stopNames"], json!(["CNSS Tunis", "Ministry of Finance"]));
    }

    #[test]
    fn test_region_list_single_and_unknown() {
        let svc = service(true);

        let response = call_regions(&svc, json!({ "id": REQUEST_ID, "payload": { "region": "sfax" } }));
        assert_eq!(response["payload"]["regions"][0]["stopNames"], json!(["CNSS Sfax"]));

        let response = call_regions(&svc, json!({ "id": REQUEST_ID, "payload": { "region": "kef" } }));
        assert_eq!(response["error"]["code"], "INVALID_REGION");
    }
}
