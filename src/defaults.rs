use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::GeoPoint;

/// Fuel rate used when FUEL_RATE_PER_KM is not configured (currency units per km)
pub const FALLBACK_FUEL_RATE_PER_KM: Decimal = dec!(0.040);

/// Fixed per-trip refreshment allowance
pub const DEFAULT_INCIDENTAL_ALLOWANCE: Decimal = dec!(2.000);

/// Decimal places kept on money amounts
pub const MONEY_SCALE: u32 = 3;

/// Largest stop count the exact planner will search
pub const EXACT_MAX_STOPS: usize = 8;

pub const DEFAULT_HQ_LABEL: &str = "HQ";
pub const DEFAULT_HQ_LAT: f64 = 36.8065;
pub const DEFAULT_HQ_LNG: f64 = 10.1815;

pub fn default_headquarters() -> GeoPoint {
    GeoPoint::new(DEFAULT_HQ_LABEL, DEFAULT_HQ_LAT, DEFAULT_HQ_LNG)
}
