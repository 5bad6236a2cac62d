//! Owner of all clusters of one map

use std::collections::HashSet;
use std::mem;

use crate::geo::{LatLng, Projection};
use crate::map::{
    EventKind, EventTarget, ListenerId, MapEvent, MapProvider, MarkerId, Subscription,
    unsubscribe_all,
};

use super::group::Cluster;
use super::options::{ClusterOption, ClusterOptions, IndexRule, OptionKey, Refresh, StylingFn};

/// MarkerClusterer keeps the clusters of a map consistent with its viewport,
/// its markers and its configuration
///
/// Every viewport idle and every marker drag end rebuilds all clusters from
/// scratch. Configuration changes either rebuild or patch the existing
/// clusters, see [`OptionKey::refresh`].
pub struct MarkerClusterer<M: MapProvider> {
    map: Option<M>,
    options: ClusterOptions<M>,
    clusters: Vec<Cluster>,
    idle: Option<Subscription>,
    drag: Vec<Subscription>,
}

impl<M: MapProvider> MarkerClusterer<M> {
    /// Creates a clusterer that is not bound to any map
    pub fn new(options: ClusterOptions<M>) -> Self {
        Self {
            map: None,
            options,
            clusters: Vec::new(),
            idle: None,
            drag: Vec::new(),
        }
    }

    /// Creates a clusterer bound and attached to `map`
    pub fn with_map(map: M, options: ClusterOptions<M>) -> Self {
        let mut clusterer = Self::new(options);
        clusterer.set_map(Some(map));
        clusterer
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    /// Detaches from the current map, binds `map` and attaches to it
    ///
    /// Returns the previously bound map.
    pub fn set_map(&mut self, map: Option<M>) -> Option<M> {
        self.detach();
        let previous = mem::replace(&mut self.map, map);
        self.attach();
        previous
    }

    /// Detaches and hands the map back
    pub fn into_map(mut self) -> Option<M> {
        self.detach();
        self.map.take()
    }

    /// Subscribes to map idle and clusters the markers right away if there are any
    pub fn attach(&mut self) {
        let Some(map) = self.map.as_mut() else {
            log::debug!("attach skipped: no map bound");
            return;
        };
        if self.idle.is_some() {
            return;
        }

        self.idle = Some(Subscription::subscribe(
            map,
            EventTarget::Map,
            EventKind::Idle,
        ));

        if !self.options.markers.is_empty() {
            self.redraw();
        }
    }

    /// Unsubscribes from everything and destroys every cluster
    pub fn detach(&mut self) {
        if let (Some(map), Some(idle)) = (self.map.as_mut(), self.idle.take()) {
            idle.unsubscribe(map);
        }
        self.clear_clusters();
    }

    pub fn is_attached(&self) -> bool {
        self.idle.is_some()
    }

    /// Routes a fired event by the listener it was delivered to
    ///
    /// Returns false when the listener does not belong to this clusterer.
    pub fn handle_event(&mut self, listener: ListenerId, event: MapEvent) -> bool {
        if self.map.is_none() {
            return false;
        }

        match event {
            MapEvent::Idle if self.idle.as_ref().is_some_and(|s| s.id() == listener) => {
                self.redraw();
                true
            }
            MapEvent::DragEnd if self.drag.iter().any(|s| s.id() == listener) => {
                self.redraw();
                true
            }
            MapEvent::Click { coord } => self.zoom_on_click(listener, coord),
            _ => false,
        }
    }

    /// Dispatches every `(listener, event)` pair, returning how many were handled
    pub fn handle_events<I>(&mut self, dispatches: I) -> usize
    where
        I: IntoIterator<Item = (ListenerId, MapEvent)>,
    {
        dispatches
            .into_iter()
            .filter(|&(listener, event)| self.handle_event(listener, event))
            .count()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster a marker currently belongs to
    pub fn cluster_of(&self, marker: MarkerId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.members().contains(&marker))
    }

    /// Full configuration snapshot
    pub fn options(&self) -> &ClusterOptions<M> {
        &self.options
    }

    pub fn option(&self, key: OptionKey) -> ClusterOption<M> {
        self.options.get(key)
    }

    /// Stores one option and brings the clusters up to date
    pub fn set_option(&mut self, option: ClusterOption<M>) {
        let key = option.key();
        self.options.apply(option);
        self.refresh(key.refresh());
    }

    /// Stores several options, refreshing after each one
    pub fn set_options<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = ClusterOption<M>>,
    {
        for option in options {
            self.set_option(option);
        }
    }

    pub fn markers(&self) -> &[MarkerId] {
        &self.options.markers
    }

    pub fn set_markers(&mut self, markers: Vec<MarkerId>) {
        self.set_option(ClusterOption::Markers(markers));
    }

    pub fn disable_click_zoom(&self) -> bool {
        self.options.disable_click_zoom
    }

    pub fn set_disable_click_zoom(&mut self, disable: bool) {
        self.set_option(ClusterOption::DisableClickZoom(disable));
    }

    pub fn min_cluster_size(&self) -> usize {
        self.options.min_cluster_size
    }

    pub fn set_min_cluster_size(&mut self, size: usize) {
        self.set_option(ClusterOption::MinClusterSize(size));
    }

    pub fn max_zoom(&self) -> f64 {
        self.options.max_zoom
    }

    pub fn set_max_zoom(&mut self, zoom: f64) {
        self.set_option(ClusterOption::MaxZoom(zoom));
    }

    pub fn grid_size(&self) -> f64 {
        self.options.grid_size
    }

    pub fn set_grid_size(&mut self, pixels: f64) {
        self.set_option(ClusterOption::GridSize(pixels));
    }

    pub fn icons(&self) -> &[M::Icon] {
        &self.options.icons
    }

    pub fn set_icons(&mut self, icons: Vec<M::Icon>) {
        self.set_option(ClusterOption::Icons(icons));
    }

    pub fn index_rule(&self) -> &IndexRule {
        &self.options.index_rule
    }

    pub fn set_index_rule(&mut self, rule: IndexRule) {
        self.set_option(ClusterOption::IndexRule(rule));
    }

    pub fn average_center(&self) -> bool {
        self.options.average_center
    }

    pub fn set_average_center(&mut self, average: bool) {
        self.set_option(ClusterOption::AverageCenter(average));
    }

    pub fn styling(&self) -> Option<&StylingFn<M>> {
        self.options.styling.as_ref()
    }

    pub fn set_styling(&mut self, styling: Option<StylingFn<M>>) {
        self.set_option(ClusterOption::Styling(styling));
    }

    /// Discards every cluster and clusters the markers in view again
    pub fn redraw(&mut self) {
        self.clear_clusters();
        self.create_clusters();
        self.update_clusters();
    }

    fn refresh(&mut self, refresh: Refresh) {
        let Some(map) = self.map.as_mut() else {
            return;
        };

        match refresh {
            Refresh::Rebuild => self.redraw(),
            Refresh::Icons => {
                for cluster in &self.clusters {
                    cluster.update_icon(map, &self.options);
                }
            }
            Refresh::Visibility => {
                for cluster in self.clusters.iter_mut().filter(|c| c.count() > 1) {
                    cluster.check_by_zoom_and_min_cluster_size(map, &self.options);
                }
            }
            Refresh::Count => {
                for cluster in &self.clusters {
                    cluster.update_count(map, &self.options);
                }
            }
            Refresh::ClickZoom => {
                for cluster in &mut self.clusters {
                    if self.options.disable_click_zoom {
                        cluster.disable_click_zoom(map);
                    } else {
                        cluster.enable_click_zoom(map);
                    }
                }
            }
        }
    }

    fn create_clusters(&mut self) {
        let Some(map) = self.map.as_mut() else {
            return;
        };

        let bounds = map.bounds();
        let mut seen = HashSet::with_capacity(self.options.markers.len());

        for &marker in &self.options.markers {
            let Some(position) = map.marker_position(marker) else {
                continue;
            };
            if !bounds.contains(&position) || !seen.insert(marker) {
                continue;
            }

            let closest = closest_cluster(&mut self.clusters, map.projection(), position);
            self.clusters[closest].add_marker(&*map, &self.options, marker);

            self.drag.push(Subscription::subscribe(
                map,
                EventTarget::Marker(marker),
                EventKind::DragEnd,
            ));
        }

        log::debug!(
            "clustered {} of {} markers into {} clusters",
            seen.len(),
            self.options.markers.len(),
            self.clusters.len()
        );
    }

    fn update_clusters(&mut self) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        for cluster in &mut self.clusters {
            cluster.update_cluster(map, &self.options);
        }
    }

    fn clear_clusters(&mut self) {
        match self.map.as_mut() {
            Some(map) => {
                for mut cluster in self.clusters.drain(..) {
                    cluster.destroy(map);
                }
                unsubscribe_all(&mut self.drag, map);
            }
            None => {
                self.clusters.clear();
                self.drag.clear();
            }
        }
    }

    fn zoom_on_click(&mut self, listener: ListenerId, coord: LatLng) -> bool {
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        match self
            .clusters
            .iter()
            .find(|c| c.click_listener() == Some(listener))
        {
            Some(cluster) => {
                cluster.zoom_on_click(map, coord);
                true
            }
            None => false,
        }
    }
}

/// Index of the cluster that should absorb `position`, appending a new one if none can
///
/// Only clusters whose bounds contain the position compete; the nearest
/// center wins and ties go to the earliest cluster.
pub(crate) fn closest_cluster<P: Projection + ?Sized>(
    clusters: &mut Vec<Cluster>,
    proj: &P,
    position: LatLng,
) -> usize {
    let mut closest = None;
    let mut distance = f64::INFINITY;

    for (i, cluster) in clusters.iter().enumerate() {
        let Some(center) = cluster.center() else {
            continue;
        };
        if !cluster.is_in_bounds(&position) {
            continue;
        }

        let delta = proj.distance(center, position);
        if delta < distance {
            distance = delta;
            closest = Some(i);
        }
    }

    closest.unwrap_or_else(|| {
        clusters.push(Cluster::new());
        clusters.len() - 1
    })
}
