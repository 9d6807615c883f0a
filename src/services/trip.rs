//! Trip quoting: resolve stops, plan the round trip, estimate allowances

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::defaults::MONEY_SCALE;
use crate::error::TripError;
use crate::services::allowance::CostEstimator;
use crate::services::locations::RegionTable;
use crate::services::planner::RoutePlanner;
use crate::types::{FuelRateSource, GeoPoint, TripPlan, TripQuote, TripRequest};

/// Settings applied to every quote
#[derive(Debug, Clone)]
pub struct TripSettings {
    /// Start/end point when the request names none
    pub headquarters: GeoPoint,
    pub fuel_rate_per_km: Decimal,
    /// `Fallback` when no rate was configured
    pub fuel_rate_source: FuelRateSource,
    /// Whether a trip where no stop resolves is still quoted
    pub allow_empty_trip: bool,
}

/// Stateless trip quoting over a shared read-only region table
#[derive(Debug, Clone)]
pub struct TripService {
    table: Arc<RegionTable>,
    planner: RoutePlanner,
    estimator: CostEstimator,
    settings: TripSettings,
}

impl TripService {
    pub fn new(
        table: Arc<RegionTable>,
        planner: RoutePlanner,
        estimator: CostEstimator,
        settings: TripSettings,
    ) -> Self {
        Self {
            table,
            planner,
            estimator,
            settings,
        }
    }

    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    /// Quote a trip request.
    ///
    /// Stops that cannot be located in the region are reported in the quote,
    /// not as an error. Only when none resolve does `allow_empty_trip` decide
    /// between an empty trip and `NoResolvableStops`.
    pub fn quote(&self, request: &TripRequest) -> Result<TripQuote, TripError> {
        validate_request(request)?;

        if !self.table.has_region(&request.region) {
            warn!("Trip requested for unknown region '{}'", request.region);
            return Err(TripError::InvalidRegion(request.region.clone()));
        }

        let stop_names = dedup_preserving_order(&request.stop_names);
        if stop_names.len() != request.stop_names.len() {
            debug!(
                "Removed {} duplicate stop names",
                request.stop_names.len() - stop_names.len()
            );
        }

        let resolution = self.table.resolve(&request.region, &stop_names);
        if !resolution.unresolved.is_empty() {
            warn!(
                "Could not locate {} stops in region '{}': {:?}",
                resolution.unresolved.len(),
                request.region,
                resolution.unresolved
            );
        }

        if resolution.resolved.is_empty() && !self.settings.allow_empty_trip {
            return Err(TripError::NoResolvableStops {
                region: request.region.clone(),
                unresolved: resolution.unresolved,
            });
        }

        let start = request
            .start
            .clone()
            .unwrap_or_else(|| self.settings.headquarters.clone());

        let strategy = request.strategy.unwrap_or(self.planner.strategy());
        let mut plan = self.planner.plan_with(strategy, &start, &resolution.resolved)?;
        plan.unresolved_stop_names = resolution.unresolved.clone();

        let (fuel_rate_per_km, fuel_rate_source) = match request.fuel_rate_per_km {
            Some(rate) => (rate, FuelRateSource::Request),
            None => (self.settings.fuel_rate_per_km, self.settings.fuel_rate_source),
        };

        let costs = self.estimator.estimate(
            plan.total_distance_km,
            request.flat_service_fee,
            fuel_rate_per_km,
        )?;

        info!(
            "Quoted trip in '{}': {} stops planned, {} unresolved, {} {:.2} km, total {}",
            request.region,
            plan.ordered_stops.len(),
            resolution.unresolved.len(),
            plan.algorithm,
            plan.total_distance_km,
            costs.grand_total
        );

        Ok(TripQuote {
            description: describe(&plan),
            start,
            has_unresolved: !resolution.unresolved.is_empty(),
            unresolved_stop_names: resolution.unresolved,
            plan,
            costs,
            fuel_rate_per_km,
            fuel_rate_source,
        })
    }
}

fn validate_request(request: &TripRequest) -> Result<(), TripError> {
    if request.stop_names.is_empty() {
        return Err(TripError::EmptyStopList);
    }
    if let Some(fee) = request.flat_service_fee {
        if fee < Decimal::ZERO {
            return Err(TripError::NegativeServiceFee(fee));
        }
        if fee.normalize().scale() > MONEY_SCALE {
            return Err(TripError::ServiceFeeTooPrecise(fee));
        }
    }
    if let Some(rate) = request.fuel_rate_per_km {
        if rate < Decimal::ZERO {
            return Err(TripError::NegativeFuelRate(rate));
        }
    }
    if let Some(start) = &request.start {
        if !start.coordinates.is_valid() {
            return Err(TripError::InvalidCoordinates {
                name: start.name.clone(),
                lat: start.coordinates.lat,
                lng: start.coordinates.lng,
            });
        }
    }
    Ok(())
}

/// Keep the first occurrence of every name
fn dedup_preserving_order(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Human-readable summary, e.g. `A -> B -> C, round-trip distance 12.34 km`
pub fn describe(plan: &TripPlan) -> String {
    if plan.ordered_stops.is_empty() {
        return "no mapped destinations".to_string();
    }

    let route = plan
        .ordered_stops
        .iter()
        .map(|stop| stop.name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ");

    format!("{}, round-trip distance {:.2} km", route, plan.total_distance_km)
}
