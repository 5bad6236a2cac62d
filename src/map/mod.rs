//! Boundary between the clustering engine and the map provider
//!
//! The engine never draws anything itself. It asks a [`MapProvider`] for the
//! viewport, creates and toggles markers through it, and subscribes to the
//! provider's events. The host forwards fired events back to the engine
//! together with the [`ListenerId`] that was returned on subscription.
pub mod memory;


use std::fmt;

use crate::geo::{LatLng, LatLngBounds, Projection};

pub use memory::{InMemoryMap, Viewport};

/// Identifier of a marker owned by a map provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Identifier of an event listener registered with a map provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Object an event listener is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Map,
    Marker(MarkerId),
}

/// Event names the engine subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The map finished moving or zooming
    Idle,
    /// A marker drag finished
    DragEnd,
    /// A marker was clicked
    Click,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Idle => "idle",
            EventKind::DragEnd => "dragend",
            EventKind::Click => "click",
        }
    }
}

/// Payload of a fired event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Idle,
    DragEnd,
    Click {
        /// Coordinate under the pointer
        coord: LatLng,
    },
}

impl MapEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::Idle => EventKind::Idle,
            MapEvent::DragEnd => EventKind::DragEnd,
            MapEvent::Click { .. } => EventKind::Click,
        }
    }
}

/// Parameters for creating a marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions<I> {
    pub position: LatLng,
    pub icon: Option<I>,
    pub clickable: bool,
    /// Whether the marker starts attached to the map
    pub attached: bool,
}

/// MapProvider is the host map SDK as seen by the clustering engine
pub trait MapProvider {
    /// Icon representation understood by the provider
    type Icon: Clone + fmt::Debug;
    type Projection: Projection;

    /// Currently visible region
    fn bounds(&self) -> LatLngBounds;

    fn zoom(&self) -> f64;

    fn projection(&self) -> &Self::Projection;

    /// Animated recentring on `coord` at `zoom`
    fn morph(&mut self, coord: LatLng, zoom: f64);

    fn create_marker(&mut self, options: MarkerOptions<Self::Icon>) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    /// Position of a marker, `None` if the provider does not know it
    fn marker_position(&self, marker: MarkerId) -> Option<LatLng>;

    fn set_marker_icon(&mut self, marker: MarkerId, icon: Self::Icon);

    /// Attaches the marker to the map (`true`) or detaches it (`false`)
    fn set_marker_attached(&mut self, marker: MarkerId, attached: bool);

    fn is_marker_attached(&self, marker: MarkerId) -> bool;

    fn add_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerId;

    fn remove_listener(&mut self, listener: ListenerId);
}

/// Subscription is an owned event listener registration
///
/// It must be given back to the provider with [`Subscription::unsubscribe`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a Subscription leaks the listener"]
pub struct Subscription {
    id: ListenerId,
}

impl Subscription {
    /// Registers a listener with the provider
    pub fn subscribe<M: MapProvider + ?Sized>(
        map: &mut M,
        target: EventTarget,
        kind: EventKind,
    ) -> Self {
        let id = map.add_listener(target, kind);
        log::trace!("subscribed {} to {:?} {}", id, target, kind.name());
        Self { id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn unsubscribe<M: MapProvider + ?Sized>(self, map: &mut M) {
        log::trace!("unsubscribed {}", self.id);
        map.remove_listener(self.id);
    }
}

/// Unsubscribes every subscription in the collection
pub fn unsubscribe_all<M: MapProvider + ?Sized>(
    subscriptions: &mut Vec<Subscription>,
    map: &mut M,
) {
    for subscription in subscriptions.drain(..) {
        subscription.unsubscribe(map);
    }
}
