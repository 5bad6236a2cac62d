//! Clusterer configuration and its tagged updates

use std::fmt;
use std::rc::Rc;

use crate::map::{MapProvider, MarkerId};

/// Default minimum number of members for a cluster to be aggregated
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

/// Default zoom from which members are always shown
pub const DEFAULT_MAX_ZOOM: f64 = 13.0;

/// Default grid size in pixels
pub const DEFAULT_GRID_SIZE: f64 = 100.0;

/// Default icon thresholds
pub const DEFAULT_THRESHOLDS: [usize; 5] = [10, 100, 200, 500, 1000];

/// Callback styling a representative marker for a member count
pub type StylingFn<M> = Rc<dyn Fn(&mut M, MarkerId, usize)>;

/// Maps a member count to an icon index; out-of-range results are clamped
pub type IndexFn = Rc<dyn Fn(usize) -> isize>;

/// IndexRule decides which icon a cluster of a given size uses
#[derive(Clone)]
pub enum IndexRule {
    /// Ascending thresholds; the index is the number of thresholds the
    /// count reaches (`count >= threshold`)
    Thresholds(Vec<usize>),
    Custom(IndexFn),
}

impl IndexRule {
    /// Raw index for `count`, before clamping
    pub fn index(&self, count: usize) -> isize {
        match self {
            IndexRule::Thresholds(thresholds) => {
                thresholds.iter().take_while(|&&factor| count >= factor).count() as isize
            }
            IndexRule::Custom(f) => f(count),
        }
    }

    /// Index into an icon list of `icon_count` entries, `None` if the list is empty
    pub fn icon_index(&self, count: usize, icon_count: usize) -> Option<usize> {
        if icon_count == 0 {
            return None;
        }
        let index = self.index(count).clamp(0, icon_count as isize - 1);
        Some(index as usize)
    }
}

impl Default for IndexRule {
    fn default() -> Self {
        IndexRule::Thresholds(DEFAULT_THRESHOLDS.to_vec())
    }
}

impl fmt::Debug for IndexRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexRule::Thresholds(t) => f.debug_tuple("Thresholds").field(t).finish(),
            IndexRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// ClusterOptions holds everything a clusterer is configured with
pub struct ClusterOptions<M: MapProvider> {
    /// Candidate markers, visible or not
    pub markers: Vec<MarkerId>,
    /// Disables zooming in when a representative marker is clicked
    pub disable_click_zoom: bool,
    pub min_cluster_size: usize,
    /// Members are shown instead of the representative from this zoom on
    pub max_zoom: f64,
    /// Grid size in pixels
    pub grid_size: f64,
    pub icons: Vec<M::Icon>,
    pub index_rule: IndexRule,
    /// Place representatives at the mean pixel position of their members
    pub average_center: bool,
    pub styling: Option<StylingFn<M>>,
}

impl<M: MapProvider> Default for ClusterOptions<M> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            disable_click_zoom: false,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_zoom: DEFAULT_MAX_ZOOM,
            grid_size: DEFAULT_GRID_SIZE,
            icons: Vec::new(),
            index_rule: IndexRule::default(),
            average_center: false,
            styling: None,
        }
    }
}

impl<M: MapProvider> Clone for ClusterOptions<M> {
    fn clone(&self) -> Self {
        Self {
            markers: self.markers.clone(),
            disable_click_zoom: self.disable_click_zoom,
            min_cluster_size: self.min_cluster_size,
            max_zoom: self.max_zoom,
            grid_size: self.grid_size,
            icons: self.icons.clone(),
            index_rule: self.index_rule.clone(),
            average_center: self.average_center,
            styling: self.styling.clone(),
        }
    }
}

impl<M: MapProvider> fmt::Debug for ClusterOptions<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterOptions")
            .field("markers", &self.markers)
            .field("disable_click_zoom", &self.disable_click_zoom)
            .field("min_cluster_size", &self.min_cluster_size)
            .field("max_zoom", &self.max_zoom)
            .field("grid_size", &self.grid_size)
            .field("icons", &self.icons)
            .field("index_rule", &self.index_rule)
            .field("average_center", &self.average_center)
            .field("styling", &self.styling.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<M: MapProvider> ClusterOptions<M> {
    pub fn with_markers(mut self, markers: Vec<MarkerId>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_disable_click_zoom(mut self, disable: bool) -> Self {
        self.disable_click_zoom = disable;
        self
    }

    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    pub fn with_max_zoom(mut self, zoom: f64) -> Self {
        self.max_zoom = zoom;
        self
    }

    pub fn with_grid_size(mut self, pixels: f64) -> Self {
        self.grid_size = pixels;
        self
    }

    pub fn with_icons(mut self, icons: Vec<M::Icon>) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_index_rule(mut self, rule: IndexRule) -> Self {
        self.index_rule = rule;
        self
    }

    pub fn with_average_center(mut self, average: bool) -> Self {
        self.average_center = average;
        self
    }

    pub fn with_styling<F>(mut self, styling: F) -> Self
    where
        F: Fn(&mut M, MarkerId, usize) + 'static,
    {
        self.styling = Some(Rc::new(styling));
        self
    }

    /// Current value of one option
    pub fn get(&self, key: OptionKey) -> ClusterOption<M> {
        match key {
            OptionKey::Markers => ClusterOption::Markers(self.markers.clone()),
            OptionKey::DisableClickZoom => ClusterOption::DisableClickZoom(self.disable_click_zoom),
            OptionKey::MinClusterSize => ClusterOption::MinClusterSize(self.min_cluster_size),
            OptionKey::MaxZoom => ClusterOption::MaxZoom(self.max_zoom),
            OptionKey::GridSize => ClusterOption::GridSize(self.grid_size),
            OptionKey::Icons => ClusterOption::Icons(self.icons.clone()),
            OptionKey::IndexRule => ClusterOption::IndexRule(self.index_rule.clone()),
            OptionKey::AverageCenter => ClusterOption::AverageCenter(self.average_center),
            OptionKey::Styling => ClusterOption::Styling(self.styling.clone()),
        }
    }

    /// Stores one option value
    pub fn apply(&mut self, option: ClusterOption<M>) {
        match option {
            ClusterOption::Markers(v) => self.markers = v,
            ClusterOption::DisableClickZoom(v) => self.disable_click_zoom = v,
            ClusterOption::MinClusterSize(v) => self.min_cluster_size = v,
            ClusterOption::MaxZoom(v) => self.max_zoom = v,
            ClusterOption::GridSize(v) => self.grid_size = v,
            ClusterOption::Icons(v) => self.icons = v,
            ClusterOption::IndexRule(v) => self.index_rule = v,
            ClusterOption::AverageCenter(v) => self.average_center = v,
            ClusterOption::Styling(v) => self.styling = v,
        }
    }
}

/// ClusterOption is a single configuration update
pub enum ClusterOption<M: MapProvider> {
    Markers(Vec<MarkerId>),
    DisableClickZoom(bool),
    MinClusterSize(usize),
    MaxZoom(f64),
    GridSize(f64),
    Icons(Vec<M::Icon>),
    IndexRule(IndexRule),
    AverageCenter(bool),
    Styling(Option<StylingFn<M>>),
}

impl<M: MapProvider> ClusterOption<M> {
    pub fn key(&self) -> OptionKey {
        match self {
            ClusterOption::Markers(_) => OptionKey::Markers,
            ClusterOption::DisableClickZoom(_) => OptionKey::DisableClickZoom,
            ClusterOption::MinClusterSize(_) => OptionKey::MinClusterSize,
            ClusterOption::MaxZoom(_) => OptionKey::MaxZoom,
            ClusterOption::GridSize(_) => OptionKey::GridSize,
            ClusterOption::Icons(_) => OptionKey::Icons,
            ClusterOption::IndexRule(_) => OptionKey::IndexRule,
            ClusterOption::AverageCenter(_) => OptionKey::AverageCenter,
            ClusterOption::Styling(_) => OptionKey::Styling,
        }
    }
}

impl<M: MapProvider> fmt::Debug for ClusterOption<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterOption::Markers(v) => f.debug_tuple("Markers").field(v).finish(),
            ClusterOption::DisableClickZoom(v) => {
                f.debug_tuple("DisableClickZoom").field(v).finish()
            }
            ClusterOption::MinClusterSize(v) => f.debug_tuple("MinClusterSize").field(v).finish(),
            ClusterOption::MaxZoom(v) => f.debug_tuple("MaxZoom").field(v).finish(),
            ClusterOption::GridSize(v) => f.debug_tuple("GridSize").field(v).finish(),
            ClusterOption::Icons(v) => f.debug_tuple("Icons").field(v).finish(),
            ClusterOption::IndexRule(v) => f.debug_tuple("IndexRule").field(v).finish(),
            ClusterOption::AverageCenter(v) => f.debug_tuple("AverageCenter").field(v).finish(),
            ClusterOption::Styling(v) => f
                .debug_tuple("Styling")
                .field(&v.as_ref().map(|_| ".."))
                .finish(),
        }
    }
}

/// Names one configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Markers,
    DisableClickZoom,
    MinClusterSize,
    MaxZoom,
    GridSize,
    Icons,
    IndexRule,
    AverageCenter,
    Styling,
}

impl OptionKey {
    pub const ALL: [OptionKey; 9] = [
        OptionKey::Markers,
        OptionKey::DisableClickZoom,
        OptionKey::MinClusterSize,
        OptionKey::MaxZoom,
        OptionKey::GridSize,
        OptionKey::Icons,
        OptionKey::IndexRule,
        OptionKey::AverageCenter,
        OptionKey::Styling,
    ];

    /// How existing clusters catch up after this option changed
    pub fn refresh(&self) -> Refresh {
        match self {
            OptionKey::Markers
            | OptionKey::MinClusterSize
            | OptionKey::GridSize
            | OptionKey::AverageCenter => Refresh::Rebuild,
            OptionKey::Icons | OptionKey::IndexRule => Refresh::Icons,
            OptionKey::MaxZoom => Refresh::Visibility,
            OptionKey::Styling => Refresh::Count,
            OptionKey::DisableClickZoom => Refresh::ClickZoom,
        }
    }
}

/// Update strategy applied to existing clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Discard every cluster and cluster again
    Rebuild,
    /// Pick icons again
    Icons,
    /// Re-run the members/aggregate decision for multi-member clusters
    Visibility,
    /// Call the styling callback again
    Count,
    /// Bind or unbind click listeners
    ClickZoom,
}
