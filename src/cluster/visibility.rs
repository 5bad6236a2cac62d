/// What a cluster shows on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every member is attached, the representative is not
    Members,
    /// The representative is attached, members are not
    Aggregate,
}

impl Visibility {
    /// Decides from the inputs alone; nothing is remembered between calls
    pub fn resolve(count: usize, min_cluster_size: usize, zoom: f64, max_zoom: f64) -> Self {
        if count < min_cluster_size || zoom >= max_zoom {
            Visibility::Members
        } else {
            Visibility::Aggregate
        }
    }
}
