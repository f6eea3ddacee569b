//! Top-level orchestration.
//!
//! The controller owns the [`Session`] and turns UI events into backend
//! requests and map updates. Everything runs on one task: requests are
//! futures held in a [`FuturesUnordered`] and polled from the controller's
//! loop, together with the search debounce timer.
//!
//! Requests cannot be cancelled. Each one is tagged with a [`Generation`]
//! for its action class and its response is dropped if a newer request of
//! that class was issued in the meantime.

use std::sync::Arc;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, TransitApi};
use crate::directions::Directions;
use crate::domain::{
    ColoringResult, CongestionResult, MaxFlowResult, MstEdge, NetworkStats, PathResult, Station,
    StationId,
};
use crate::map::MapSurface;
use crate::present::{
    ColoringView, CongestionView, MaxFlowView, NetworkView, PathView, StatsView,
};
use crate::route::{self, PipelineError, RouteEnrichmentPipeline, RouteGeometry};
use crate::session::{
    ActionClass, Generation, InputOutcome, Notice, PanelState, PathDisplay, Session,
    SessionConfig, Slot,
};


/// Text shown when origin and destination are not connected.
pub const NO_ROUTE_MESSAGE: &str = "no connected route";

/// User interactions the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Page loaded: fetch statistics and stations.
    PageReady,
    /// A selector's value changed to an id already in its list.
    SelectionChanged { slot: Slot, id: StationId },
    ClearSelection(Slot),
    ComputePath,
    ComputeMaxFlow,
    AnalyzeCongestion,
    ComputeNetwork,
    /// Draw the last computed minimum network on its overlay.
    DrawNetwork,
    HideNetwork,
    ComputeColoring,
    /// Search box contents after a keystroke.
    SearchInput(String),
    /// Confirm key or search button.
    SearchSubmit(String),
    /// Search box lost focus or a click landed outside the panel.
    SearchBlur,
    /// "Use as origin/destination" on a search result row.
    PromoteHit { index: usize, slot: Slot },
    ResetRoute,
    SetPathDisplay(PathDisplay),
}

/// A finished request, tagged for staleness checks.
enum Completion {
    Stats(Result<NetworkStats, ApiError>),
    Stations(Result<Vec<Station>, ApiError>),
    Search(Generation, Result<Vec<Station>, ApiError>),
    Path(Generation, Result<PathResult, ApiError>),
    Route(Generation, Result<RouteGeometry, PipelineError>),
    MaxFlow(Generation, Result<MaxFlowResult, ApiError>),
    Congestion(Generation, Result<CongestionResult, ApiError>),
    Network(Generation, Result<Vec<MstEdge>, ApiError>),
    Coloring(Generation, Result<ColoringResult, ApiError>),
}

type Pending = LocalBoxFuture<'static, Completion>;

/// Event-driven orchestrator for one page load.
pub struct Controller<A, D, M> {
    api: Arc<A>,
    pipeline: RouteEnrichmentPipeline<D>,
    session: Session<M>,
    in_flight: FuturesUnordered<Pending>,
    /// Stations of the path currently drawn, for redisplay.
    displayed_path: Vec<Station>,
}

impl<A, D, M> Controller<A, D, M>
where
    A: TransitApi + 'static,
    D: Directions + 'static,
    M: MapSurface,
{
    pub fn new(api: A, directions: D, map: M, config: SessionConfig) -> Self {
        Self {
            api: Arc::new(api),
            pipeline: RouteEnrichmentPipeline::new(directions),
            session: Session::new(map, config),
            in_flight: FuturesUnordered::new(),
            displayed_path: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session<M> {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Number of requests not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Run the page-ready bootstrap to completion.
    pub async fn bootstrap(&mut self) {
        self.handle(UiEvent::PageReady);
        self.settle().await;
    }

    /// React to one UI event. Never blocks: requests are queued and
    /// resolved by [`settle`](Self::settle) or [`run`](Self::run).
    pub fn handle(&mut self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::PageReady => self.start_bootstrap(),
            UiEvent::SelectionChanged { slot, id } => self.session.selectors.select(slot, id),
            UiEvent::ClearSelection(slot) => self.session.selectors.clear(slot),
            UiEvent::ComputePath => self.request_path(),
            UiEvent::ComputeMaxFlow => self.request_max_flow(),
            UiEvent::AnalyzeCongestion => self.request_congestion(),
            UiEvent::ComputeNetwork => self.request_network(),
            UiEvent::DrawNetwork => self.draw_network(),
            UiEvent::HideNetwork => self.session.layers.clear_network(),
            UiEvent::ComputeColoring => self.request_coloring(),
            UiEvent::SearchInput(text) => {
                if self.session.search.on_input(&text) == InputOutcome::Hidden {
                    self.session.generations.invalidate(ActionClass::Search);
                }
            }
            UiEvent::SearchSubmit(text) => match self.session.search.submit(&text) {
                Some(query) => self.issue_search(query),
                None => self.session.generations.invalidate(ActionClass::Search),
            },
            UiEvent::SearchBlur => self.session.search.hide(),
            UiEvent::PromoteHit { index, slot } => self.promote(index, slot),
            UiEvent::ResetRoute => self.reset_route(),
            UiEvent::SetPathDisplay(display) => self.set_path_display(display),
        }
    }

    /// Drive pending requests and the search timer until both are idle.
    pub async fn settle(&mut self) {
        loop {
            tokio::select! {
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.apply(done);
                }
                query = self.session.search.due(), if self.session.search.is_pending() => {
                    self.issue_search(query);
                }
                else => break,
            }
        }
    }

    /// Process events until the sender side closes, then settle.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<UiEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.apply(done);
                }
                query = self.session.search.due(), if self.session.search.is_pending() => {
                    self.issue_search(query);
                }
            }
        }
        self.settle().await;
    }

    fn spawn(&mut self, request: impl Future<Output = Completion> + 'static) {
        self.in_flight.push(request.boxed_local());
    }

    fn start_bootstrap(&mut self) {
        info!(scope = ?self.session.config.station_scope, "bootstrapping");
        self.session.notice = None;
        self.session.panels.stats = PanelState::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Stats(api.statistics().await) });

        let api = Arc::clone(&self.api);
        let scope = self.session.config.station_scope;
        self.spawn(async move { Completion::Stations(api.stations(scope).await) });
    }

    /// Selected pair, or `None` (logged) when the actions are disabled.
    fn selection(&self, action: &str) -> Option<(StationId, StationId)> {
        let selection = self.session.selectors.selection();
        if selection.is_none() {
            debug!(action, "ignored: origin and destination not both selected");
        }
        selection
    }

    fn request_path(&mut self) {
        let Some((origin, destination)) = self.selection("path") else {
            return;
        };
        let generation = self.session.generations.issue(ActionClass::Path);
        self.session.panels.path = PanelState::Loading;
        debug!(%origin, %destination, ?generation, "path requested");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::Path(generation, api.shortest_path(&origin, &destination).await)
        });
    }

    fn request_max_flow(&mut self) {
        let Some((origin, destination)) = self.selection("max-flow") else {
            return;
        };
        let generation = self.session.generations.issue(ActionClass::MaxFlow);
        self.session.panels.max_flow = PanelState::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::MaxFlow(generation, api.max_flow(&origin, &destination).await)
        });
    }

    fn request_congestion(&mut self) {
        let Some((origin, destination)) = self.selection("congestion") else {
            return;
        };
        let generation = self.session.generations.issue(ActionClass::Congestion);
        self.session.panels.congestion = PanelState::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::Congestion(generation, api.congestion(&origin, &destination).await)
        });
    }

    fn request_network(&mut self) {
        let generation = self.session.generations.issue(ActionClass::Network);
        self.session.panels.network = PanelState::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Network(generation, api.minimum_network().await) });
    }

    fn request_coloring(&mut self) {
        let generation = self.session.generations.issue(ActionClass::Coloring);
        self.session.panels.coloring = PanelState::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Coloring(generation, api.coloring().await) });
    }

    fn issue_search(&mut self, query: String) {
        let generation = self.session.generations.issue(ActionClass::Search);
        let limit = self.session.config.search_limit;
        debug!(%query, limit, ?generation, "search issued");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::Search(generation, api.search_stations(&query, limit).await)
        });
    }

    fn draw_network(&mut self) {
        let Session {
            panels,
            layers,
            directory,
            ..
        } = &mut self.session;
        match panels.network.ready() {
            Some(view) => {
                let drawn = layers.draw_network(&view.edges, directory);
                debug!(drawn, total = view.edge_count(), "network overlay drawn");
            }
            None => debug!("no minimum network to draw"),
        }
    }

    fn promote(&mut self, index: usize, slot: Slot) {
        let Some(station) = self.session.search.hit(index).cloned() else {
            warn!(index, "promote on a row without a station");
            return;
        };
        self.session.adopt(&station);
        self.session
            .selectors
            .set(slot, station.id.clone(), station.label());
        self.session.search.hide();
        self.session.layers.focus_station(&station);
    }

    fn reset_route(&mut self) {
        self.session.generations.invalidate(ActionClass::Path);
        self.session.generations.invalidate(ActionClass::Congestion);
        self.session.layers.reset_route(&self.session.directory);
        self.session.panels.path = PanelState::Idle;
        self.session.panels.congestion = PanelState::Idle;
        self.displayed_path.clear();
    }

    fn set_path_display(&mut self, display: PathDisplay) {
        self.session.config.path_display = display;
        if self.displayed_path.is_empty() {
            return;
        }
        self.session.layers.rebuild_markers(&self.session.directory);
        self.session
            .layers
            .highlight_path(&self.displayed_path, display);
    }

    fn is_current(&self, class: ActionClass, generation: Generation) -> bool {
        let current = self.session.generations.is_current(class, generation);
        if !current {
            debug!(?class, ?generation, "discarding stale response");
        }
        current
    }

    fn apply(&mut self, done: Completion) {
        match done {
            Completion::Stats(result) => self.apply_stats(result),
            Completion::Stations(result) => self.apply_stations(result),
            Completion::Search(generation, result) => {
                if self.is_current(ActionClass::Search, generation) {
                    self.apply_search(result);
                }
            }
            Completion::Path(generation, result) => {
                if self.is_current(ActionClass::Path, generation) {
                    self.apply_path(generation, result);
                }
            }
            Completion::Route(generation, result) => {
                if self.is_current(ActionClass::Path, generation) {
                    self.apply_route(result);
                }
            }
            Completion::MaxFlow(generation, result) => {
                if self.is_current(ActionClass::MaxFlow, generation) {
                    self.session.panels.max_flow = panel(result, |r| MaxFlowView::from_result(&r));
                }
            }
            Completion::Congestion(generation, result) => {
                if self.is_current(ActionClass::Congestion, generation) {
                    self.apply_congestion(result);
                }
            }
            Completion::Network(generation, result) => {
                if self.is_current(ActionClass::Network, generation) {
                    self.session.panels.network = panel(result, |e| NetworkView::from_edges(&e));
                }
            }
            Completion::Coloring(generation, result) => {
                if self.is_current(ActionClass::Coloring, generation) {
                    self.session.panels.coloring = panel(result, |c| ColoringView::from_result(&c));
                }
            }
        }
    }

    fn apply_stats(&mut self, result: Result<NetworkStats, ApiError>) {
        if let Err(e) = &result {
            self.block(format!("Failed to load network statistics: {e}"));
        }
        self.session.panels.stats = panel(result, |s| StatsView::from_stats(&s));
    }

    fn apply_stations(&mut self, result: Result<Vec<Station>, ApiError>) {
        match result {
            Ok(stations) => {
                let session = &mut self.session;
                session.directory.load(stations);
                session.selectors.populate(&session.directory);
                session.layers.reset_route(&session.directory);
                self.displayed_path.clear();
                info!(stations = session.directory.len(), "stations loaded");
            }
            Err(e) => self.block(format!("Failed to load stations: {e}")),
        }
    }

    /// Bootstrap failures block the page. The first one is kept.
    fn block(&mut self, message: String) {
        warn!(%message, "bootstrap failed");
        if self.session.notice.is_none() {
            self.session.notice = Some(Notice { message });
        }
    }

    fn apply_search(&mut self, result: Result<Vec<Station>, ApiError>) {
        match result {
            Ok(stations) => {
                debug!(hits = stations.len(), "search results");
                self.session.search.render_results(stations);
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                self.session.search.render_error(e.to_string());
            }
        }
    }

    fn apply_path(&mut self, generation: Generation, result: Result<PathResult, ApiError>) {
        let path = match result {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "path request failed");
                self.session.panels.path = PanelState::Failed(e.to_string());
                return;
            }
        };

        self.session.layers.clear_route();
        self.session.layers.rebuild_markers(&self.session.directory);
        self.displayed_path.clear();

        if path.is_disconnected() {
            self.session.panels.path = PanelState::Empty(NO_ROUTE_MESSAGE.to_string());
            return;
        }

        for station in &path.stations {
            self.session.adopt(station);
        }
        let display = self.session.config.path_display;
        self.session.layers.highlight_path(&path.stations, display);
        self.session.panels.path = PanelState::Ready(PathView::from_result(&path));

        match path.stations.len() {
            0 | 1 => debug!("single-station path, nothing to draw"),
            _ => {
                let pipeline = self.pipeline.clone();
                let stations = path.stations.clone();
                self.spawn(async move {
                    Completion::Route(generation, pipeline.enrich(&stations).await)
                });
            }
        }
        self.displayed_path = path.stations;
    }

    fn apply_route(&mut self, result: Result<RouteGeometry, PipelineError>) {
        match result {
            Ok(geometry) => route::draw(&mut self.session.layers, &geometry),
            Err(e) => debug!(error = %e, "route not drawn"),
        }
    }

    fn apply_congestion(&mut self, result: Result<CongestionResult, ApiError>) {
        match result {
            Ok(congestion) => {
                for b in &congestion.bottlenecks {
                    self.session.adopt(&b.origin);
                    self.session.adopt(&b.destination);
                }
                let view = CongestionView::from_result(&congestion);
                self.session.layers.draw_bottlenecks(&view.bottlenecks);
                self.session.panels.congestion = PanelState::Ready(view);
            }
            Err(e) => {
                warn!(error = %e, "congestion analysis failed");
                self.session.layers.clear_bottleneck();
                self.session.panels.congestion = PanelState::Failed(e.to_string());
            }
        }
    }
}

/// Panel state for a panel-scoped result. Failures stay in the panel.
fn panel<T, V>(result: Result<T, ApiError>, view: impl FnOnce(T) -> V) -> PanelState<V> {
    match result {
        Ok(value) => PanelState::Ready(view(value)),
        Err(e) => {
            warn!(error = %e, "request failed");
            PanelState::Failed(e.to_string())
        }
    }
}
