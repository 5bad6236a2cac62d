//! Grid-based marker clustering for web maps
//!
//! [`MarkerClusterer`] groups the markers inside the current viewport into
//! [`Cluster`]s of at most one grid cell around their first member, and shows
//! either the members or a single representative marker per cluster. The
//! engine talks to the map only through [`map::MapProvider`];
//! [`map::InMemoryMap`] is a ready-made provider without rendering.
pub mod cluster;
pub mod error;
pub mod geo;
pub mod map;

pub use cluster::{
    Cluster, ClusterOption, ClusterOptions, IndexRule, MarkerClusterer, OptionKey, Visibility,
};
pub use error::{Error, Result};
pub use geo::{LatLng, LatLngBounds, Offset, Projection, WebMercator};
pub use map::{InMemoryMap, MapEvent, MapProvider, MarkerId, Viewport};
