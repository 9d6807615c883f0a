//! Trip planning types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Request to plan a round trip and quote its allowances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub region: String,
    /// Stop names as chosen upstream; may contain duplicates
    pub stop_names: Vec<String>,
    /// Explicit start/end point; the configured HQ when omitted
    #[serde(default)]
    pub start: Option<GeoPoint>,
    #[serde(default)]
    pub flat_service_fee: Option<Decimal>,
    /// Per-request override of the configured fuel rate
    #[serde(default)]
    pub fuel_rate_per_km: Option<Decimal>,
    #[serde(default)]
    pub strategy: Option<RouteStrategy>,
}

/// How the visiting order is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Greedy: always go to the closest unvisited stop
    #[default]
    NearestNeighbor,
    /// Full permutation search, limited to small stop counts
    Exact,
    /// Exact for small stop counts, nearest neighbor otherwise
    Auto,
}

impl std::str::FromStr for RouteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest_neighbor" | "nearest-neighbor" | "nn" => Ok(RouteStrategy::NearestNeighbor),
            "exact" => Ok(RouteStrategy::Exact),
            "auto" => Ok(RouteStrategy::Auto),
            other => Err(format!("unknown route strategy '{}'", other)),
        }
    }
}

/// One hop of the round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripLeg {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
}

/// Planned visiting order over the resolved stops.
/// Start and end are implicit and not part of `ordered_stops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub ordered_stops: Vec<GeoPoint>,
    pub legs: Vec<TripLeg>,
    pub total_distance_km: f64,
    pub unresolved_stop_names: Vec<String>,
    /// Ordering algorithm that actually ran
    pub algorithm: String,
}

impl TripPlan {
    /// Plan with no destinations
    pub fn empty() -> Self {
        Self {
            ordered_stops: vec![],
            legs: vec![],
            total_distance_km: 0.0,
            unresolved_stop_names: vec![],
            algorithm: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceKind {
    ServiceFee,
    Fuel,
    Incidental,
}

impl AllowanceKind {
    pub const fn description(self) -> &'static str {
        match self {
            AllowanceKind::ServiceFee => "Service fee",
            AllowanceKind::Fuel => "Fuel allowance",
            AllowanceKind::Incidental => "Incidental allowance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceLine {
    pub kind: AllowanceKind,
    pub description: String,
    pub amount: Decimal,
}

impl AllowanceLine {
    pub fn new(kind: AllowanceKind, amount: Decimal) -> Self {
        Self {
            kind,
            description: kind.description().to_string(),
            amount,
        }
    }
}

/// Allowance lines and their total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub lines: Vec<AllowanceLine>,
    pub grand_total: Decimal,
}

/// Where the fuel rate of a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelRateSource {
    Request,
    Configured,
    Fallback,
}

/// Full answer for a trip request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuote {
    pub description: String,
    pub start: GeoPoint,
    pub plan: TripPlan,
    pub costs: CostBreakdown,
    pub unresolved_stop_names: Vec<String>,
    pub has_unresolved: bool,
    pub fuel_rate_per_km: Decimal,
    pub fuel_rate_source: FuelRateSource,
}

/// Request for region discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionListRequest {
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: String,
    pub stop_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionListResponse {
    pub regions: Vec<RegionSummary>,
}
