//! Regional location lookup
//!
//! Maps stop names to coordinates per region using a static table that is
//! loaded once at startup and shared read-only afterwards. Names that have no
//! coordinates in the requested region are returned separately instead of
//! being dropped.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Coordinates, GeoPoint, RegionSummary};

const BUILTIN_TABLE: &str = include_str!("../../data/regions.json");

/// Region id -> stop name -> coordinates (None when the stop is known but unmapped)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionTable {
    regions: BTreeMap<String, BTreeMap<String, Option<Coordinates>>>,
}

/// Outcome of resolving a list of stop names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub resolved: Vec<GeoPoint>,
    /// Unresolved names in input order
    pub unresolved: Vec<String>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TABLE).context("Built-in region table is invalid")
    }

    /// Load a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read region table {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse region table {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let table: RegionTable = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        for (region, stops) in &self.regions {
            for (name, coordinates) in stops {
                if let Some(c) = coordinates {
                    if !c.is_valid() {
                        bail!(
                            "Invalid coordinates for '{}' in region '{}': lat={}, lng={}",
                            name, region, c.lat, c.lng
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Add or replace a stop entry
    #[cfg(test)]
    pub fn insert(
        &mut self,
        region: impl Into<String>,
        name: impl Into<String>,
        coordinates: Option<Coordinates>,
    ) -> &mut Self {
        self.regions
            .entry(region.into())
            .or_default()
            .insert(name.into(), coordinates);
        self
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// Region ids in sorted order
    pub fn regions(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    /// Stop names of a region in sorted order, None for an unknown region
    pub fn stop_names(&self, region: &str) -> Option<Vec<String>> {
        self.regions
            .get(region)
            .map(|stops| stops.keys().cloned().collect())
    }

    /// Stop listing for one region, or for every region when `region` is None.
    /// None when the named region is unknown.
    pub fn summaries(&self, region: Option<&str>) -> Option<Vec<RegionSummary>> {
        match region {
            Some(region) => {
                let stop_names = self.stop_names(region)?;
                Some(vec![RegionSummary {
                    region: region.to_string(),
                    stop_names,
                }])
            }
            None => Some(
                self.regions
                    .iter()
                    .map(|(region, stops)| RegionSummary {
                        region: region.clone(),
                        stop_names: stops.keys().cloned().collect(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn lookup(&self, region: &str, name: &str) -> Option<Coordinates> {
        self.regions.get(region)?.get(name).copied().flatten()
    }

    /// Split `stop_names` into located points and unresolved names.
    ///
    /// An unknown region leaves every name unresolved. Resolved points keep
    /// input order, which the planner relies on for tie-breaking.
    pub fn resolve(&self, region: &str, stop_names: &[String]) -> Resolution {
        let mut resolution = Resolution::default();

        for name in stop_names {
            match self.lookup(region, name) {
                Some(coordinates) => resolution.resolved.push(GeoPoint {
                    name: name.clone(),
                    coordinates,
                }),
                None => resolution.unresolved.push(name.clone()),
            }
        }

        debug!(
            "Resolved {} of {} stops in region '{}'",
            resolution.resolved.len(),
            stop_names.len(),
            region
        );

        resolution
    }
}
