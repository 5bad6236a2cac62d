//! Geographic primitives shared by the map boundary and the clustering engine
pub mod distance;
pub mod point;
pub mod projection;

#[cfg(test)]
mod projection_test;

pub use distance::{DEGREE_RAD, EARTH_R, distance_spherical};
pub use point::{LatLng, LatLngBounds, Offset};
pub use projection::{MAX_LATITUDE, Projection, TILE_SIZE, WebMercator};
