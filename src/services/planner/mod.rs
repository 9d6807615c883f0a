//! Round-trip route planner
//!
//! Orders resolved stops into a closed tour starting and ending at the trip
//! origin. Distances are great-circle (haversine), so planning needs no
//! routing service.
//!
//! Nearest neighbor is the default. Exact search is available for small stop
//! counts and falls back to nearest neighbor above `EXACT_MAX_STOPS`.

mod exact;

use tracing::{debug, info, warn};

use crate::defaults::EXACT_MAX_STOPS;
use crate::error::TripError;
use crate::services::geo::{distance_matrix, round_trip_distance};
use crate::types::{Coordinates, GeoPoint, RouteStrategy, TripLeg, TripPlan};

pub const ALGORITHM_NEAREST_NEIGHBOR: &str = "nearest_neighbor";
pub const ALGORITHM_EXACT: &str = "exact";
pub const ALGORITHM_EXACT_FALLBACK: &str = "nearest_neighbor_fallback";

/// Route planner over haversine distances
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    strategy: RouteStrategy,
    exact_max_stops: usize,
}

impl RoutePlanner {
    pub fn new(strategy: RouteStrategy) -> Self {
        Self {
            strategy,
            exact_max_stops: EXACT_MAX_STOPS,
        }
    }

    pub fn with_exact_limit(mut self, exact_max_stops: usize) -> Self {
        self.exact_max_stops = exact_max_stops;
        self
    }

    pub fn strategy(&self) -> RouteStrategy {
        self.strategy
    }

    /// Plan with the configured strategy
    pub fn plan(&self, start: &GeoPoint, stops: &[GeoPoint]) -> Result<TripPlan, TripError> {
        self.plan_with(self.strategy, start, stops)
    }

    /// Plan a round trip from `start` through every stop and back.
    ///
    /// Ties between equally distant candidates go to the stop that comes
    /// first in `stops`, so the result is fully determined by the input.
    pub fn plan_with(
        &self,
        strategy: RouteStrategy,
        start: &GeoPoint,
        stops: &[GeoPoint],
    ) -> Result<TripPlan, TripError> {
        validate_point(start)?;
        for stop in stops {
            validate_point(stop)?;
        }

        if stops.is_empty() {
            debug!("No stops to plan, returning empty plan");
            return Ok(TripPlan::empty());
        }

        let mut points: Vec<Coordinates> = Vec::with_capacity(stops.len() + 1);
        points.push(start.coordinates);
        points.extend(stops.iter().map(|s| s.coordinates));
        let matrix = distance_matrix(&points);

        let (order, algorithm) = self.choose_order(strategy, &matrix, stops.len());

        let total_distance_km = round_trip_distance(&matrix, &order);
        let legs = build_legs(start, stops, &matrix, &order);
        let ordered_stops = order.iter().map(|&idx| stops[idx - 1].clone()).collect();

        info!(
            "Planned round trip over {} stops with {}: {:.2} km",
            stops.len(),
            algorithm,
            total_distance_km
        );

        Ok(TripPlan {
            ordered_stops,
            legs,
            total_distance_km,
            unresolved_stop_names: vec![],
            algorithm: algorithm.to_string(),
        })
    }

    fn choose_order(
        &self,
        strategy: RouteStrategy,
        matrix: &[Vec<f64>],
        stop_count: usize,
    ) -> (Vec<usize>, &'static str) {
        let small = stop_count <= self.exact_max_stops;

        match strategy {
            RouteStrategy::NearestNeighbor => (nearest_neighbor(matrix), ALGORITHM_NEAREST_NEIGHBOR),
            RouteStrategy::Auto if small => (exact::exact_order(matrix), ALGORITHM_EXACT),
            RouteStrategy::Auto => (nearest_neighbor(matrix), ALGORITHM_NEAREST_NEIGHBOR),
            RouteStrategy::Exact if small => (exact::exact_order(matrix), ALGORITHM_EXACT),
            RouteStrategy::Exact => {
                warn!(
                    "Exact planning requested for {} stops (limit {}), falling back to nearest neighbor",
                    stop_count, self.exact_max_stops
                );
                (nearest_neighbor(matrix), ALGORITHM_EXACT_FALLBACK)
            }
        }
    }
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(RouteStrategy::default())
    }
}

fn validate_point(point: &GeoPoint) -> Result<(), TripError> {
    if point.coordinates.is_valid() {
        Ok(())
    } else {
        Err(TripError::InvalidCoordinates {
            name: point.name.clone(),
            lat: point.coordinates.lat,
            lng: point.coordinates.lng,
        })
    }
}

/// Nearest neighbor heuristic
/// Returns indices of stops in visit order (0 = origin, 1..n = stops)
fn nearest_neighbor(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    if n <= 1 {
        return vec![];
    }

    let mut visited = vec![false; n];
    let mut route = Vec::with_capacity(n - 1);

    // Start from origin (index 0)
    visited[0] = true;
    let mut current = 0;

    for _ in 1..n {
        let mut best_next = None;
        let mut best_distance = f64::INFINITY;

        for j in 1..n {
            // Strict comparison keeps the earliest stop on ties
            if !visited[j] && matrix[current][j] < best_distance {
                best_distance = matrix[current][j];
                best_next = Some(j);
            }
        }

        if let Some(next) = best_next {
            visited[next] = true;
            route.push(next);
            current = next;
        }
    }

    route
}

fn build_legs(
    start: &GeoPoint,
    stops: &[GeoPoint],
    matrix: &[Vec<f64>],
    order: &[usize],
) -> Vec<TripLeg> {
    let name_of = |idx: usize| -> String {
        if idx == 0 {
            start.name.clone()
        } else {
            stops[idx - 1].name.clone()
        }
    };

    let mut legs = Vec::with_capacity(order.len() + 1);
    let mut prev = 0;
    for &idx in order.iter().chain(std::iter::once(&0)) {
        legs.push(TripLeg {
            from: name_of(prev),
            to: name_of(idx),
            distance_km: matrix[prev][idx],
        });
        prev = idx;
    }

    legs
}
