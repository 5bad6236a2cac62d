//! Package cluster groups map markers on a pixel grid and keeps the groups in
//! sync with the viewport
pub mod clusterer;
pub mod group;
pub mod options;
pub mod visibility;

#[cfg(test)]
mod group_test;

pub use clusterer::MarkerClusterer;
pub use group::Cluster;
pub use options::{
    ClusterOption, ClusterOptions, DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_CLUSTER_SIZE,
    DEFAULT_THRESHOLDS, IndexFn, IndexRule, OptionKey, Refresh, StylingFn,
};
pub use visibility::Visibility;
