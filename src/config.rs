//! Configuration management

use std::str::FromStr;

use anyhow::{self, Context, Result};
use rust_decimal::Decimal;

use crate::defaults::{
    default_headquarters, DEFAULT_INCIDENTAL_ALLOWANCE, FALLBACK_FUEL_RATE_PER_KM,
};
use crate::types::{FuelRateSource, GeoPoint, RouteStrategy};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Optional NATS credentials
    pub nats_user: Option<String>,
    pub nats_password: Option<String>,

    /// Region table JSON file; the built-in table is used when unset
    pub region_table_path: Option<String>,

    /// Fuel allowance per km
    pub fuel_rate_per_km: Decimal,

    /// Whether `fuel_rate_per_km` was configured or is the fallback constant
    pub fuel_rate_source: FuelRateSource,

    /// Fixed per-trip incidental allowance
    pub incidental_allowance: Decimal,

    /// Default start/end point of every trip
    pub headquarters: GeoPoint,

    /// Quote trips where no stop could be located instead of rejecting them
    pub allow_empty_trip: bool,

    /// Default ordering strategy
    pub route_strategy: RouteStrategy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let nats_url = get("NATS_URL")
            .unwrap_or_else(|| "nats://localhost:4222".to_string());

        let nats_user = get("NATS_USER");
        let nats_password = get("NATS_PASSWORD");

        let region_table_path = get("REGION_TABLE_PATH");

        let (fuel_rate_per_km, fuel_rate_source) = match get("FUEL_RATE_PER_KM") {
            Some(raw) => (
                parse_non_negative_decimal("FUEL_RATE_PER_KM", &raw)?,
                FuelRateSource::Configured,
            ),
            None => (FALLBACK_FUEL_RATE_PER_KM, FuelRateSource::Fallback),
        };

        let incidental_allowance = match get("INCIDENTAL_ALLOWANCE") {
            Some(raw) => parse_non_negative_decimal("INCIDENTAL_ALLOWANCE", &raw)?,
            None => DEFAULT_INCIDENTAL_ALLOWANCE,
        };

        let mut headquarters = default_headquarters();
        if let Some(label) = get("HQ_LABEL") {
            headquarters.name = label;
        }
        match (get("HQ_LAT"), get("HQ_LNG")) {
            (Some(lat), Some(lng)) => {
                headquarters.coordinates.lat = lat
                    .trim()
                    .parse()
                    .with_context(|| format!("HQ_LAT is not a number: {}", lat))?;
                headquarters.coordinates.lng = lng
                    .trim()
                    .parse()
                    .with_context(|| format!("HQ_LNG is not a number: {}", lng))?;
            }
            (None, None) => {}
            _ => anyhow::bail!("HQ_LAT and HQ_LNG must be set together"),
        }
        if !headquarters.coordinates.is_valid() {
            anyhow::bail!(
                "HQ coordinates out of range: lat={}, lng={}",
                headquarters.coordinates.lat,
                headquarters.coordinates.lng
            );
        }

        let allow_empty_trip = match get("ALLOW_EMPTY_TRIP") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("ALLOW_EMPTY_TRIP must be true or false, got '{}'", raw))?,
            None => true,
        };

        let route_strategy = match get("ROUTE_STRATEGY") {
            Some(raw) => RouteStrategy::from_str(&raw).map_err(anyhow::Error::msg)?,
            None => RouteStrategy::default(),
        };

        Ok(Self {
            nats_url,
            nats_user,
            nats_password,
            region_table_path,
            fuel_rate_per_km,
            fuel_rate_source,
            incidental_allowance,
            headquarters,
            allow_empty_trip,
            route_strategy,
        })
    }
}

fn parse_non_negative_decimal(key: &str, raw: &str) -> Result<Decimal> {
    let value = Decimal::from_str(raw.trim())
        .with_context(|| format!("{} is not a decimal number: {}", key, raw))?;
    if value < Decimal::ZERO {
        anyhow::bail!("{} must not be negative (got {})", key, value);
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: {}", other),
    }
}
