//! In-process map provider
//!
//! `InMemoryMap` keeps markers and listeners in plain collections and
//! projects with Web-Mercator. It never fires events on its own: methods that
//! would make a real SDK fire something return the `(listener, event)` pairs
//! the host is expected to forward to the engine.

use std::collections::BTreeMap;
use std::fmt;

use bitvec::prelude::*;

use super::{EventKind, EventTarget, ListenerId, MapEvent, MapProvider, MarkerId, MarkerOptions};
use crate::geo::{LatLng, LatLngBounds, Offset, Projection, WebMercator};

/// Events ready to be forwarded to their listeners
pub type Dispatches = Vec<(ListenerId, MapEvent)>;

/// Visible part of the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone)]
struct MarkerState<I> {
    position: LatLng,
    icon: Option<I>,
    clickable: bool,
    removed: bool,
}

#[derive(Debug, Clone, Copy)]
struct ListenerState {
    target: EventTarget,
    kind: EventKind,
}

/// InMemoryMap is a complete [`MapProvider`] without any rendering
#[derive(Debug, Clone)]
pub struct InMemoryMap<I = String> {
    viewport: Viewport,
    projection: WebMercator,
    markers: Vec<MarkerState<I>>,
    /// Attachment state, indexed by marker id
    attached: BitVec,
    listeners: BTreeMap<ListenerId, ListenerState>,
    next_listener: u64,
    pending: Dispatches,
}

impl<I: Clone + fmt::Debug> InMemoryMap<I> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            projection: WebMercator::new(viewport.zoom),
            markers: Vec::new(),
            attached: BitVec::new(),
            listeners: BTreeMap::new(),
            next_listener: 0,
            pending: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Moves the viewport and returns the resulting idle dispatches
    pub fn set_viewport(&mut self, viewport: Viewport) -> Dispatches {
        self.viewport = viewport;
        self.projection = WebMercator::new(viewport.zoom);
        self.dispatches(EventTarget::Map, MapEvent::Idle)
    }

    /// Coordinate `(dx, dy)` pixels away from the viewport centre
    pub fn coord_at(&self, dx: f64, dy: f64) -> LatLng {
        let center = self.projection.coord_to_offset(self.viewport.center);
        self.projection.offset_to_coord(center.add(dx, dy))
    }

    /// Pixel offset of `coord` relative to the viewport centre
    pub fn offset_from_center(&self, coord: LatLng) -> Offset {
        let center = self.projection.coord_to_offset(self.viewport.center);
        let p = self.projection.coord_to_offset(coord);
        Offset::new(p.x - center.x, p.y - center.y)
    }

    /// Places a clickable marker without icon, detached from the map
    pub fn add_marker(&mut self, position: LatLng) -> MarkerId {
        self.create_marker(MarkerOptions {
            position,
            icon: None,
            clickable: true,
            attached: false,
        })
    }

    pub fn marker_icon(&self, marker: MarkerId) -> Option<&I> {
        self.marker(marker).and_then(|m| m.icon.as_ref())
    }

    pub fn is_marker_clickable(&self, marker: MarkerId) -> bool {
        self.marker(marker).is_some_and(|m| m.clickable)
    }

    pub fn is_marker_removed(&self, marker: MarkerId) -> bool {
        self.marker(marker).is_none_or(|m| m.removed)
    }

    /// Number of markers ever created, removed ones included
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers currently attached to the map, in id order
    pub fn attached_markers(&self) -> Vec<MarkerId> {
        self.attached
            .iter_ones()
            .map(|i| MarkerId(i as u64))
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listeners_for(&self, target: EventTarget, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Pairs `event` with every listener subscribed to it on `target`
    pub fn dispatches(&self, target: EventTarget, event: MapEvent) -> Dispatches {
        self.listeners_for(target, event.kind())
            .into_iter()
            .map(|id| (id, event))
            .collect()
    }

    /// Moves a marker as a finished user drag would
    pub fn drag_marker(&mut self, marker: MarkerId, to: LatLng) -> Dispatches {
        match self.marker_mut(marker) {
            Some(m) => m.position = to,
            None => return Vec::new(),
        }
        self.dispatches(EventTarget::Marker(marker), MapEvent::DragEnd)
    }

    /// Clicks a marker at its own position
    pub fn click_marker(&self, marker: MarkerId) -> Dispatches {
        match self.marker(marker) {
            Some(m) if m.clickable && self.is_marker_attached(marker) => self.dispatches(
                EventTarget::Marker(marker),
                MapEvent::Click { coord: m.position },
            ),
            _ => Vec::new(),
        }
    }

    /// Takes the events queued by [`MapProvider::morph`]
    pub fn take_pending(&mut self) -> Dispatches {
        std::mem::take(&mut self.pending)
    }

    fn marker(&self, marker: MarkerId) -> Option<&MarkerState<I>> {
        self.markers.get(marker.0 as usize)
    }

    fn marker_mut(&mut self, marker: MarkerId) -> Option<&mut MarkerState<I>> {
        self.markers
            .get_mut(marker.0 as usize)
            .filter(|m| !m.removed)
    }
}

impl<I: Clone + fmt::Debug> MapProvider for InMemoryMap<I> {
    type Icon = I;
    type Projection = WebMercator;

    fn bounds(&self) -> LatLngBounds {
        let center = self.projection.coord_to_offset(self.viewport.center);
        let (hw, hh) = (self.viewport.width / 2.0, self.viewport.height / 2.0);

        let sw = self.projection.offset_to_coord(center.add(-hw, hh));
        let ne = self.projection.offset_to_coord(center.add(hw, -hh));

        LatLngBounds::new(sw, ne)
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn projection(&self) -> &WebMercator {
        &self.projection
    }

    fn morph(&mut self, coord: LatLng, zoom: f64) {
        let viewport = Viewport {
            center: coord,
            zoom,
            ..self.viewport
        };
        let idle = self.set_viewport(viewport);
        self.pending.extend(idle);
    }

    fn create_marker(&mut self, options: MarkerOptions<I>) -> MarkerId {
        let id = MarkerId(self.markers.len() as u64);
        self.markers.push(MarkerState {
            position: options.position,
            icon: options.icon,
            clickable: options.clickable,
            removed: false,
        });
        self.attached.push(options.attached);
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if let Some(m) = self.marker_mut(marker) {
            m.removed = true;
            self.attached.set(marker.0 as usize, false);
        }
    }

    fn marker_position(&self, marker: MarkerId) -> Option<LatLng> {
        self.marker(marker)
            .filter(|m| !m.removed)
            .map(|m| m.position)
    }

    fn set_marker_icon(&mut self, marker: MarkerId, icon: I) {
        if let Some(m) = self.marker_mut(marker) {
            m.icon = Some(icon);
        }
    }

    fn set_marker_attached(&mut self, marker: MarkerId, attached: bool) {
        if self.marker_mut(marker).is_some() {
            self.attached.set(marker.0 as usize, attached);
        }
    }

    fn is_marker_attached(&self, marker: MarkerId) -> bool {
        self.attached
            .get(marker.0 as usize)
            .is_some_and(|bit| *bit)
    }

    fn add_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, ListenerState { target, kind });
        id
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }
}
