//! Map layer lifecycle.
//!
//! The layer manager is the only code that mutates the map. Each layer is
//! either absent or backed by exactly one map layer group, so there is never
//! more than one route or bottleneck layer on screen.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Bounds, LatLng, MstEdge, Station, StationId};
use crate::map::style::{self, LineStyle};
use crate::map::{LayerHandle, LayerKind, MapSurface, MarkerHandle};
use crate::present::BottleneckView;

use super::PathDisplay;
use super::directory::StationDirectory;

/// Whether a layer currently exists on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerState {
    #[default]
    Empty,
    Populated(LayerHandle),
}

impl LayerState {
    fn take(&mut self) -> Option<LayerHandle> {
        match std::mem::take(self) {
            LayerState::Empty => None,
            LayerState::Populated(handle) => Some(handle),
        }
    }
}

pub struct LayerManager<M> {
    map: M,
    markers: LayerState,
    route: LayerState,
    bottleneck: LayerState,
    network: LayerState,
    marker_index: HashMap<StationId, MarkerHandle>,
}

impl<M: MapSurface> LayerManager<M> {
    pub fn new(map: M) -> Self {
        Self {
            map,
            markers: LayerState::Empty,
            route: LayerState::Empty,
            bottleneck: LayerState::Empty,
            network: LayerState::Empty,
            marker_index: HashMap::new(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn state(&self, kind: LayerKind) -> LayerState {
        match kind {
            LayerKind::Markers => self.markers,
            LayerKind::Route => self.route,
            LayerKind::Bottleneck => self.bottleneck,
            LayerKind::Network => self.network,
        }
    }

    fn slot(&mut self, kind: LayerKind) -> &mut LayerState {
        match kind {
            LayerKind::Markers => &mut self.markers,
            LayerKind::Route => &mut self.route,
            LayerKind::Bottleneck => &mut self.bottleneck,
            LayerKind::Network => &mut self.network,
        }
    }

    fn clear(&mut self, kind: LayerKind) {
        if let Some(handle) = self.slot(kind).take() {
            self.map.remove_layer(handle);
            if kind == LayerKind::Markers {
                self.marker_index.clear();
            }
        }
    }

    /// Layer handle for `kind`, creating the layer if absent.
    fn ensure(&mut self, kind: LayerKind) -> LayerHandle {
        if let LayerState::Populated(handle) = self.state(kind) {
            return handle;
        }
        let handle = self.map.create_layer(kind);
        *self.slot(kind) = LayerState::Populated(handle);
        handle
    }

    pub fn clear_route(&mut self) {
        self.clear(LayerKind::Route);
    }

    pub fn clear_bottleneck(&mut self) {
        self.clear(LayerKind::Bottleneck);
    }

    pub fn clear_network(&mut self) {
        self.clear(LayerKind::Network);
    }

    /// Drop every marker and recreate one per directory station with its
    /// default style.
    pub fn rebuild_markers(&mut self, directory: &StationDirectory) {
        self.clear(LayerKind::Markers);
        let layer = self.ensure(LayerKind::Markers);
        for station in directory.iter() {
            let marker = self
                .map
                .add_marker(layer, station, &style::default_marker(&station.category));
            self.marker_index.insert(station.id.clone(), marker);
        }
    }

    /// Remove the route and bottleneck layers and restore default markers.
    pub fn reset_route(&mut self, directory: &StationDirectory) {
        self.clear_route();
        self.clear_bottleneck();
        self.rebuild_markers(directory);
        debug!(stations = directory.len(), "route reset");
    }

    /// The station's marker, created with its default style if absent.
    pub fn ensure_marker(&mut self, station: &Station) -> MarkerHandle {
        if let Some(&marker) = self.marker_index.get(&station.id) {
            return marker;
        }
        let layer = self.ensure(LayerKind::Markers);
        let marker = self
            .map
            .add_marker(layer, station, &style::default_marker(&station.category));
        self.marker_index.insert(station.id.clone(), marker);
        marker
    }

    /// Restyle the markers of stations on the path.
    ///
    /// In [`PathDisplay::PathOnly`] mode every other marker is hidden.
    pub fn highlight_path(&mut self, stations: &[Station], display: PathDisplay) {
        let highlight = style::path_marker();
        let mut on_path = Vec::with_capacity(stations.len());
        for station in stations {
            let marker = self.ensure_marker(station);
            self.map.restyle_marker(marker, &highlight);
            self.map.set_marker_visible(marker, true);
            on_path.push(marker);
        }

        if display == PathDisplay::PathOnly {
            let off_path: Vec<MarkerHandle> = self
                .marker_index
                .values()
                .copied()
                .filter(|m| !on_path.contains(m))
                .collect();
            for marker in off_path {
                self.map.set_marker_visible(marker, false);
            }
        }
    }

    /// Draw one route segment, creating the route layer on first use.
    pub fn add_route_segment(&mut self, points: &[LatLng], line: &LineStyle) {
        let layer = self.ensure(LayerKind::Route);
        self.map.add_polyline(layer, points, line);
    }

    /// Replace the bottleneck layer. An empty list leaves no layer behind.
    pub fn draw_bottlenecks(&mut self, bottlenecks: &[BottleneckView]) {
        self.clear_bottleneck();
        if bottlenecks.is_empty() {
            return;
        }
        let layer = self.ensure(LayerKind::Bottleneck);
        for b in bottlenecks {
            self.map.add_polyline(
                layer,
                &[b.origin, b.destination],
                &style::bottleneck_line(b.severity),
            );
        }
    }

    /// Replace the minimum network overlay.
    ///
    /// Edges whose endpoints are not in the directory are skipped. Returns
    /// the number of edges drawn.
    pub fn draw_network(&mut self, edges: &[MstEdge], directory: &StationDirectory) -> usize {
        self.clear_network();
        let line = style::network_line();
        let mut drawn = 0;
        for edge in edges {
            let (Ok(origin), Ok(destination)) =
                (directory.get(&edge.origin), directory.get(&edge.destination))
            else {
                debug!(origin = %edge.origin, destination = %edge.destination, "network edge with unknown station");
                continue;
            };
            let layer = self.ensure(LayerKind::Network);
            self.map
                .add_polyline(layer, &[origin.position, destination.position], &line);
            drawn += 1;
        }
        drawn
    }

    /// Make the station's marker visible and open its popup.
    pub fn focus_station(&mut self, station: &Station) {
        let marker = self.ensure_marker(station);
        self.map.set_marker_visible(marker, true);
        self.map.open_popup(marker);
    }

    pub fn fit_bounds(&mut self, bounds: Bounds, padding: u32) {
        self.map.fit_bounds(bounds, padding);
    }
}
