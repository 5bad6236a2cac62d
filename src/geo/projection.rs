//! Conversion between geographic coordinates and world pixel offsets

use std::f64::consts::PI;

use super::distance::{DEGREE_RAD, distance_spherical};
use super::point::{LatLng, Offset};

/// Tile edge length in pixels at zoom 0
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Web-Mercator world
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Projection converts between geographic and pixel space for one zoom level
///
/// Offsets must follow the world-pixel convention of [`Offset`]: `x` grows
/// eastward and `y` grows southward.
pub trait Projection {
    fn coord_to_offset(&self, coord: LatLng) -> Offset;

    fn offset_to_coord(&self, offset: Offset) -> LatLng;

    /// Projected-plane distance between two coordinates, in meters
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        distance_spherical(&a, &b)
    }
}

/// Spherical Web-Mercator projection with 256 px tiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    scale: f64,
}

impl WebMercator {
    pub fn new(zoom: f64) -> Self {
        Self {
            scale: TILE_SIZE * 2f64.powf(zoom),
        }
    }

    /// World width in pixels
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Projection for WebMercator {
    fn coord_to_offset(&self, coord: LatLng) -> Offset {
        let lat = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * DEGREE_RAD).sin();

        let x = (coord.lng + 180.0) / 360.0 * self.scale;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * self.scale;

        Offset::new(x, y)
    }

    fn offset_to_coord(&self, offset: Offset) -> LatLng {
        let lng = offset.x / self.scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * offset.y / self.scale;
        let lat = n.sinh().atan() / DEGREE_RAD;

        LatLng::new(lat, lng)
    }
}
