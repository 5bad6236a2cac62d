use std::f64::consts::PI;

use super::point::LatLng;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in meters
pub const EARTH_R: f64 = 6_371_000.0;

/// Calculates spherical (equirectangular) distance between two points
///
/// Accurate for the short spans clustering deals with; it degrades across
/// the antimeridian and near the poles.
///
/// # Returns
///
/// Distance in meters
pub fn distance_spherical(p1: &LatLng, p2: &LatLng) -> f64 {
    let v1 = (p1.lat - p2.lat) * DEGREE_RAD;
    let v1 = v1 * v1;

    let v2 = (p1.lng - p2.lng) * DEGREE_RAD * ((p1.lat + p2.lat) / 2.0 * DEGREE_RAD).cos();
    let v2 = v2 * v2;

    EARTH_R * (v1 + v2).sqrt()
}
