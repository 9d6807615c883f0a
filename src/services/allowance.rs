//! Trip allowance estimation
//!
//! Turns a round-trip distance into reimbursable money lines. Amounts are
//! `Decimal` with `MONEY_SCALE` places and the grand total is the sum of the
//! emitted lines, so it always matches them exactly.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::defaults::{DEFAULT_INCIDENTAL_ALLOWANCE, MONEY_SCALE};
use crate::error::TripError;
use crate::types::{AllowanceKind, AllowanceLine, CostBreakdown};

/// Allowance calculator with a fixed per-trip incidental amount
#[derive(Debug, Clone)]
pub struct CostEstimator {
    incidental_allowance: Decimal,
}

impl CostEstimator {
    pub fn new(incidental_allowance: Decimal) -> Self {
        Self { incidental_allowance }
    }

    /// Build the allowance lines for one trip.
    ///
    /// Inputs must already be validated as non-negative. Lines are emitted
    /// as service fee (only when > 0), fuel (only when distance > 0) and the
    /// incidental allowance, which is always present. Fails with
    /// `AmountOverflow` when a line or the total leaves the `Decimal` range.
    pub fn estimate(
        &self,
        total_distance_km: f64,
        flat_service_fee: Option<Decimal>,
        fuel_rate_per_km: Decimal,
    ) -> Result<CostBreakdown, TripError> {
        let mut lines = Vec::with_capacity(3);

        if let Some(fee) = flat_service_fee
            .map(round_money)
            .filter(|fee| *fee > Decimal::ZERO)
        {
            lines.push(AllowanceLine::new(AllowanceKind::ServiceFee, fee));
        }

        if total_distance_km > 0.0 {
            lines.push(AllowanceLine::new(
                AllowanceKind::Fuel,
                fuel_allowance(total_distance_km, fuel_rate_per_km)?,
            ));
        }

        lines.push(AllowanceLine::new(
            AllowanceKind::Incidental,
            round_money(self.incidental_allowance),
        ));

        let grand_total = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.amount))
            .ok_or(TripError::AmountOverflow)?;

        Ok(CostBreakdown { lines, grand_total })
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_INCIDENTAL_ALLOWANCE)
    }
}

/// Distance times rate, rounded to money precision
pub fn fuel_allowance(total_distance_km: f64, fuel_rate_per_km: Decimal) -> Result<Decimal, TripError> {
    // Distances come out of the planner finite and non-negative
    let distance = Decimal::from_f64(total_distance_km).unwrap_or(Decimal::ZERO);
    distance
        .checked_mul(fuel_rate_per_km)
        .map(round_money)
        .ok_or(TripError::AmountOverflow)
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
