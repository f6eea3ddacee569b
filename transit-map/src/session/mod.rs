//! Per-page-load session state.
//!
//! A [`Session`] is created once when the page loads and owns everything
//! the controller mutates: the station directory, the selectors, the search
//! panel, the map layers and the result panels.

mod directory;
mod generation;
mod layers;
mod search;
mod selectors;

pub use directory::{DirectoryError, StationDirectory};
pub use generation::{ActionClass, Generation, Generations};
pub use layers::{LayerManager, LayerState};
pub use search::{DEBOUNCE, InputOutcome, MIN_QUERY_LEN, SearchCoordinator, SearchRow};
pub use selectors::{Choice, Selector, SelectorBinding, Slot};

use crate::api::StationScope;
use crate::domain::Station;
use crate::map::MapSurface;
use crate::present::{
    ColoringView, CongestionView, MaxFlowView, NetworkView, PathView, StatsView,
};

/// Default number of search hits requested.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// How a computed path is shown among the station markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathDisplay {
    /// Enlarge and recolor path markers, keep every marker visible.
    #[default]
    HighlightInPlace,
    /// Hide markers that are not on the path.
    PathOnly,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path_display: PathDisplay,
    /// Which station listing the bootstrap loads
    pub station_scope: StationScope,
    /// Maximum hits per search request
    pub search_limit: usize,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            path_display: PathDisplay::default(),
            station_scope: StationScope::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_path_display(mut self, display: PathDisplay) -> Self {
        self.path_display = display;
        self
    }

    pub fn with_station_scope(mut self, scope: StationScope) -> Self {
        self.station_scope = scope;
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What a result panel is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Well-formed but empty outcome, with the text to show.
    Empty(String),
    /// Inline error message.
    Failed(String),
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        PanelState::Idle
    }
}

impl<T> PanelState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            PanelState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }
}

/// Result panels.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    pub stats: PanelState<StatsView>,
    pub path: PanelState<PathView>,
    pub max_flow: PanelState<MaxFlowView>,
    pub network: PanelState<NetworkView>,
    pub coloring: PanelState<ColoringView>,
    pub congestion: PanelState<CongestionView>,
}

/// Blocking notice shown when the page cannot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// Everything one page load owns.
pub struct Session<M> {
    /// Known stations
    pub directory: StationDirectory,

    /// Origin/destination selectors
    pub selectors: SelectorBinding,

    /// Search input and result panel
    pub search: SearchCoordinator,

    /// Map layers
    pub layers: LayerManager<M>,

    /// Result panels
    pub panels: Panels,

    /// Latest request per action class
    pub generations: Generations,

    pub notice: Option<Notice>,

    pub config: SessionConfig,
}

impl<M: MapSurface> Session<M> {
    pub fn new(map: M, config: SessionConfig) -> Self {
        Self {
            directory: StationDirectory::new(),
            selectors: SelectorBinding::new(),
            search: SearchCoordinator::new(),
            layers: LayerManager::new(map),
            panels: Panels::default(),
            generations: Generations::new(),
            notice: None,
            config,
        }
    }

    /// Adopt a station and, if it is new, give it a marker.
    pub fn adopt(&mut self, station: &Station) {
        if self.directory.adopt(station.clone()) {
            self.layers.ensure_marker(station);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RecordingMap;

    #[test]
    fn config_builder() {
        let config = SessionConfig::new()
            .with_path_display(PathDisplay::PathOnly)
            .with_station_scope(StationScope::Principal)
            .with_search_limit(25);

        assert_eq!(config.path_display, PathDisplay::PathOnly);
        assert_eq!(config.station_scope, StationScope::Principal);
        assert_eq!(config.search_limit, 25);
    }

    #[test]
    fn config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.path_display, PathDisplay::HighlightInPlace);
        assert_eq!(config.station_scope, StationScope::All);
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn panel_state_accessors() {
        let ready: PanelState<u32> = PanelState::Ready(3);
        assert_eq!(ready.ready(), Some(&3));
        assert!(PanelState::<u32>::Loading.is_loading());
        assert_eq!(PanelState::<u32>::default(), PanelState::Idle);
    }

    #[test]
    fn adopt_adds_marker_once() {
        use crate::domain::{Category, LatLng, StationId};

        let mut session = Session::new(RecordingMap::new(), SessionConfig::default());
        let station = Station {
            id: StationId::parse("N1").unwrap(),
            name: "Nueva".into(),
            category: Category::Metro,
            position: LatLng::new(4.6, -74.1),
            capacity: 0,
        };
        session.adopt(&station);
        session.adopt(&station);

        assert_eq!(session.directory.len(), 1);
        assert_eq!(session.layers.map().markers_for(&station.id).len(), 1);
    }

    #[test]
    fn new_session_is_blank() {
        let session = Session::new(RecordingMap::new(), SessionConfig::default());
        assert!(session.directory.is_empty());
        assert!(!session.selectors.can_compute());
        assert_eq!(session.notice, None);
        assert_eq!(session.panels.path, PanelState::Idle);
    }
}
