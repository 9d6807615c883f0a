//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` marginally above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Calculate distance matrix between all points
/// Returns a 2D vector where matrix[i][j] is distance from point i to point j
pub fn distance_matrix(points: &[Coordinates]) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let distance = haversine_distance(&points[i], &points[j]);
            matrix[i][j] = distance;
            matrix[j][i] = distance;
        }
    }

    matrix
}

/// Length of the closed tour `0 -> order[0] -> ... -> order[n-1] -> 0`
/// over a distance matrix whose index 0 is the origin.
pub fn round_trip_distance(matrix: &[Vec<f64>], order: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut current = 0;

    for &next in order {
        total += matrix[current][next];
        current = next;
    }

    if !order.is_empty() {
        total += matrix[current][0];
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_tunis_sfax() {
        let tunis = Coordinates { lat: 36.8065, lng: 10.1815 };
        let sfax = Coordinates { lat: 34.7406, lng: 10.7603 };

        let distance = haversine_distance(&tunis, &sfax);

        // Tunis to Sfax is approximately 235 km in a straight line
        assert!((distance - 235.0).abs() < 5.0, "got {} km", distance);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates { lat: 36.0, lng: 10.0 };
        let distance = haversine_distance(&point, &point);
        assert!((distance - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_haversine_one_degree_on_equator() {
        let a = Coordinates { lat: 0.0, lng: 0.0 };
        let b = Coordinates { lat: 0.0, lng: 1.0 };

        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_antipodal_points() {
        let a = Coordinates { lat: 0.0, lng: 0.0 };
        let b = Coordinates { lat: 0.0, lng: 180.0 };

        let distance = haversine_distance(&a, &b);
        assert!(distance.is_finite());
        assert!((distance - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_distance_matrix() {
        let points = vec![
            Coordinates { lat: 36.8, lng: 10.1 },
            Coordinates { lat: 36.9, lng: 10.2 },
            Coordinates { lat: 37.0, lng: 10.3 },
        ];

        let matrix = distance_matrix(&points);

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix[0].len(), 3);

        // Diagonal should be zero
        for i in 0..3 {
            assert_eq!(matrix[i][i], 0.0);
        }

        // Should be symmetric
        assert_eq!(matrix[0][1], matrix[1][0]);
        assert_eq!(matrix[1][2], matrix[2][1]);
    }

    #[test]
    fn test_round_trip_distance() {
        let matrix = vec![
            vec![0.0, 10.0, 20.0],
            vec![10.0, 0.0, 15.0],
            vec![20.0, 15.0, 0.0],
        ];

        assert_eq!(round_trip_distance(&matrix, &[]), 0.0);
        assert_eq!(round_trip_distance(&matrix, &[1]), 20.0);
        assert_eq!(round_trip_distance(&matrix, &[1, 2]), 45.0);
        assert_eq!(round_trip_distance(&matrix, &[2, 1]), 45.0);
    }
}
