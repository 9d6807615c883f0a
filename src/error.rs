//! Trip planning errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned to the caller of a trip quote.
/// All of them are synchronous and not worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("unknown region '{0}'")]
    InvalidRegion(String),

    #[error("stop list must not be empty")]
    EmptyStopList,

    #[error("flat service fee must not be negative (got {0})")]
    NegativeServiceFee(Decimal),

    #[error("flat service fee has more than 3 decimal places (got {0})")]
    ServiceFeeTooPrecise(Decimal),

    #[error("fuel rate must not be negative (got {0})")]
    NegativeFuelRate(Decimal),

    #[error("allowance amount is out of range")]
    AmountOverflow,

    #[error("invalid coordinates for '{name}': lat={lat}, lng={lng}")]
    InvalidCoordinates { name: String, lat: f64, lng: f64 },

    #[error("none of the requested stops could be located in region '{region}'")]
    NoResolvableStops {
        region: String,
        unresolved: Vec<String>,
    },
}

impl TripError {
    /// Error code used in `ErrorResponse`
    pub const fn code(&self) -> &'static str {
        match self {
            TripError::InvalidRegion(_) => "INVALID_REGION",
            TripError::EmptyStopList
            | TripError::NegativeServiceFee(_)
            | TripError::ServiceFeeTooPrecise(_)
            | TripError::NegativeFuelRate(_)
            | TripError::AmountOverflow
            | TripError::InvalidCoordinates { .. } => "VALIDATION_ERROR",
            TripError::NoResolvableStops { .. } => "NO_RESOLVABLE_STOPS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(TripError::InvalidRegion("x".into()).code(), "INVALID_REGION");
        assert_eq!(TripError::EmptyStopList.code(), "VALIDATION_ERROR");
        assert_eq!(TripError::NegativeServiceFee(dec!(-1)).code(), "VALIDATION_ERROR");
        assert_eq!(TripError::ServiceFeeTooPrecise(dec!(0.0004)).code(), "VALIDATION_ERROR");
        assert_eq!(TripError::AmountOverflow.code(), "VALIDATION_ERROR");
        assert_eq!(
            TripError::NoResolvableStops { region: "x".into(), unresolved: vec![] }.code(),
            "NO_RESOLVABLE_STOPS"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = TripError::InvalidCoordinates { name: "HQ".into(), lat: f64::NAN, lng: 10.0 };
        assert!(err.to_string().contains("'HQ'"));

        let err = TripError::NegativeServiceFee(dec!(-5.000));
        assert_eq!(err.to_string(), "flat service fee must not be negative (got -5.000)");
    }
}
