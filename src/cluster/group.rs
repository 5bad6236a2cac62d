//! A single spatial group of markers

use crate::geo::{LatLng, LatLngBounds, Offset, Projection};
use crate::map::{
    EventKind, EventTarget, ListenerId, MapProvider, MarkerId, MarkerOptions, Subscription,
};

use super::options::ClusterOptions;
use super::visibility::Visibility;

/// Cluster groups markers lying within half a grid of its center
///
/// The center comes from the first member and is kept until the cluster is
/// destroyed. The representative marker is created on the first
/// [`Cluster::update_cluster`] and stands in for the members when aggregated.
#[derive(Debug, Default)]
pub struct Cluster {
    center: Option<LatLng>,
    bounds: Option<LatLngBounds>,
    members: Vec<MarkerId>,
    representative: Option<MarkerId>,
    click: Option<Subscription>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a marker unless it is already a member
    ///
    /// The first member fixes the center and the bounds. A first marker
    /// without a position is ignored.
    pub fn add_marker<M: MapProvider>(
        &mut self,
        map: &M,
        options: &ClusterOptions<M>,
        marker: MarkerId,
    ) {
        if self.is_member(marker) {
            return;
        }

        if self.center.is_none() {
            let Some(position) = map.marker_position(marker) else {
                return;
            };
            self.center = Some(position);
            self.bounds = calc_bounds(map, position, options.grid_size);
        }

        self.members.push(marker);
    }

    /// Creates the representative if needed, then refreshes icon, styling and visibility
    pub fn update_cluster<M: MapProvider>(&mut self, map: &mut M, options: &ClusterOptions<M>) {
        if self.representative.is_none() {
            let position = if options.average_center {
                average_center(map, &self.members)
            } else {
                self.center
            };
            let Some(position) = position else {
                return;
            };

            self.representative = Some(map.create_marker(MarkerOptions {
                position,
                icon: None,
                clickable: true,
                attached: true,
            }));

            if !options.disable_click_zoom {
                self.enable_click_zoom(map);
            }
        }

        self.update_icon(map, options);
        self.update_count(map, options);
        self.check_by_zoom_and_min_cluster_size(map, options);
    }

    /// Shows either the members or the representative and returns which
    pub fn check_by_zoom_and_min_cluster_size<M: MapProvider>(
        &mut self,
        map: &mut M,
        options: &ClusterOptions<M>,
    ) -> Visibility {
        let visibility = Visibility::resolve(
            self.count(),
            options.min_cluster_size,
            map.zoom(),
            options.max_zoom,
        );
        log::trace!(
            "cluster of {} at zoom {}: {:?}",
            self.count(),
            map.zoom(),
            visibility
        );

        match visibility {
            Visibility::Members => self.show_members(map),
            Visibility::Aggregate => self.hide_members(map),
        }
        visibility
    }

    /// Assigns the icon selected by the index rule to the representative
    pub fn update_icon<M: MapProvider>(&self, map: &mut M, options: &ClusterOptions<M>) {
        let Some(index) = options.index_rule.icon_index(self.count(), options.icons.len()) else {
            return;
        };
        if let Some(representative) = self.representative {
            map.set_marker_icon(representative, options.icons[index].clone());
        }
    }

    /// Runs the styling callback on the representative
    pub fn update_count<M: MapProvider>(&self, map: &mut M, options: &ClusterOptions<M>) {
        let Some(representative) = self.representative else {
            return;
        };
        if let Some(styling) = &options.styling {
            styling(map, representative, self.count());
        }
    }

    pub fn enable_click_zoom<M: MapProvider>(&mut self, map: &mut M) {
        if self.click.is_some() {
            return;
        }
        if let Some(representative) = self.representative {
            self.click = Some(Subscription::subscribe(
                map,
                EventTarget::Marker(representative),
                EventKind::Click,
            ));
        }
    }

    pub fn disable_click_zoom<M: MapProvider>(&mut self, map: &mut M) {
        if let Some(click) = self.click.take() {
            click.unsubscribe(map);
        }
    }

    /// Zooms in one level around the clicked coordinate
    pub fn zoom_on_click<M: MapProvider>(&self, map: &mut M, coord: LatLng) {
        let zoom = map.zoom() + 1.0;
        map.morph(coord, zoom);
    }

    /// Detaches members, removes the representative and forgets everything
    pub fn destroy<M: MapProvider>(&mut self, map: &mut M) {
        self.disable_click_zoom(map);

        for &member in &self.members {
            map.set_marker_attached(member, false);
        }
        if let Some(representative) = self.representative.take() {
            map.remove_marker(representative);
        }

        self.center = None;
        self.bounds = None;
        self.members.clear();
    }

    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[MarkerId] {
        &self.members
    }

    pub fn representative(&self) -> Option<MarkerId> {
        self.representative
    }

    pub fn click_listener(&self) -> Option<ListenerId> {
        self.click.as_ref().map(Subscription::id)
    }

    /// Checks if the position lies inside the cluster bounds, false before the first member
    pub fn is_in_bounds(&self, position: &LatLng) -> bool {
        self.bounds.is_some_and(|b| b.contains(position))
    }

    fn is_member(&self, marker: MarkerId) -> bool {
        self.members.contains(&marker)
    }

    fn show_members<M: MapProvider>(&self, map: &mut M) {
        for &member in &self.members {
            map.set_marker_attached(member, true);
        }
        if let Some(representative) = self.representative {
            map.set_marker_attached(representative, false);
        }
    }

    fn hide_members<M: MapProvider>(&self, map: &mut M) {
        for &member in &self.members {
            map.set_marker_attached(member, false);
        }
        if let Some(representative) = self.representative
            && !map.is_marker_attached(representative)
        {
            map.set_marker_attached(representative, true);
        }
    }
}

/// Expands `position` by half a grid in pixel space, clamped to the visible map
///
/// The result always contains `position`, even when the pixel round trip of
/// a marker on the view edge lands slightly inside it. Returns `None` for a
/// non-positive grid size, leaving the cluster unable to absorb any other
/// marker.
pub(crate) fn calc_bounds<M: MapProvider>(
    map: &M,
    position: LatLng,
    grid_size: f64,
) -> Option<LatLngBounds> {
    if grid_size.is_nan() || grid_size <= 0.0 {
        return None;
    }

    let proj = map.projection();
    let view = map.bounds();
    let point = LatLngBounds::from_point(position);

    let map_max_px = proj.coord_to_offset(view.ne);
    let map_min_px = proj.coord_to_offset(view.sw);
    let half = grid_size / 2.0;
    let max_px = proj.coord_to_offset(point.ne).add(half, -half);
    let min_px = proj.coord_to_offset(point.sw).add(-half, half);

    // North-east has the largest x and the smallest y
    let max_px = Offset::new(map_max_px.x.min(max_px.x), map_max_px.y.max(max_px.y));
    let min_px = Offset::new(map_min_px.x.max(min_px.x), map_min_px.y.min(min_px.y));

    let bounds = LatLngBounds::new(proj.offset_to_coord(min_px), proj.offset_to_coord(max_px));
    Some(bounds.extend(position))
}

/// Mean pixel position of the members, mapped back to a coordinate
///
/// Averaging in pixel space is only meaningful for members close together;
/// it is not corrected across the antimeridian.
pub(crate) fn average_center<M: MapProvider>(map: &M, members: &[MarkerId]) -> Option<LatLng> {
    let proj = map.projection();
    let mut sum = Offset::default();
    let mut n = 0usize;

    for position in members.iter().filter_map(|&m| map.marker_position(m)) {
        let px = proj.coord_to_offset(position);
        sum = sum.add(px.x, px.y);
        n += 1;
    }

    if n == 0 {
        return None;
    }
    Some(proj.offset_to_coord(Offset::new(sum.x / n as f64, sum.y / n as f64)))
}
