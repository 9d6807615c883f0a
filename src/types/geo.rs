//! Geographic value types

use serde::{Deserialize, Serialize};

/// WGS84 coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A named location.
///
/// Two points are equal when their coordinates are equal; `name` is the
/// identity used for display and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(lat, lng),
        }
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_valid_range() {
        assert!(Coordinates::new(36.8, 10.18).is_valid());
        assert!(Coordinates::new(-33.9, -70.6).is_valid());
        assert!(Coordinates::new(90.0, 180.0).is_valid());
    }

    #[test]
    fn test_coordinates_rejects_nan_and_out_of_range() {
        assert!(!Coordinates::new(f64::NAN, 10.0).is_valid());
        assert!(!Coordinates::new(10.0, f64::INFINITY).is_valid());
        assert!(!Coordinates::new(91.0, 10.0).is_valid());
        assert!(!Coordinates::new(10.0, -180.5).is_valid());
    }

    #[test]
    fn test_geo_point_equality_ignores_name() {
        let a = GeoPoint::new("Office A", 36.8, 10.18);
        let b = GeoPoint::new("Office B", 36.8, 10.18);
        let c = GeoPoint::new("Office A", 36.9, 10.18);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_geo_point_serializes_flat() {
        let point = GeoPoint::new("HQ", 36.8, 10.18);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["name"], "HQ");
        assert_eq!(json["lat"], 36.8);
        assert_eq!(json["lng"], 10.18);
    }
}
