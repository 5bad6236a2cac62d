//! Geographic coordinates, world pixel offsets and bounds

/// LatLng represents a geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude, positive northward
    pub lat: f64,
    /// Longitude, positive eastward
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks if this point is south-west of or equal to another point
    /// (a <= b)
    pub fn less_eq(&self, b: &LatLng) -> bool {
        self.lat <= b.lat && self.lng <= b.lng
    }

    /// Checks if this point is north-east of or equal to another point
    /// (a >= b)
    pub fn greater_eq(&self, b: &LatLng) -> bool {
        self.lat >= b.lat && self.lng >= b.lng
    }
}

/// Offset is a position in world pixel space
///
/// `x` grows eastward and `y` grows southward, so the north-east corner of
/// a region has the largest `x` and the smallest `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this offset shifted by `(dx, dy)`
    pub fn add(&self, dx: f64, dy: f64) -> Offset {
        Offset::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance in pixels
    pub fn distance(&self, other: &Offset) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// LatLngBounds is an axis-aligned geographic rectangle
///
/// Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    /// South-west corner (minimum latitude and longitude)
    pub sw: LatLng,
    /// North-east corner (maximum latitude and longitude)
    pub ne: LatLng,
}

impl LatLngBounds {
    pub const fn new(sw: LatLng, ne: LatLng) -> Self {
        Self { sw, ne }
    }

    /// Degenerate bounds covering exactly one point
    pub const fn from_point(p: LatLng) -> Self {
        Self { sw: p, ne: p }
    }

    /// Checks if the point lies inside the bounds
    pub fn contains(&self, p: &LatLng) -> bool {
        p.greater_eq(&self.sw) && p.less_eq(&self.ne)
    }

    /// Returns these bounds grown just enough to contain `p`
    pub fn extend(&self, p: LatLng) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(self.sw.lat.min(p.lat), self.sw.lng.min(p.lng)),
            LatLng::new(self.ne.lat.max(p.lat), self.ne.lng.max(p.lng)),
        )
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.sw.lat + self.ne.lat) / 2.0,
            (self.sw.lng + self.ne.lng) / 2.0,
        )
    }
}
