//! In-memory map surface.
//!
//! Records every layer, marker and polyline instead of drawing them. Used by
//! the tests and by the headless bootstrap binary.

use std::collections::BTreeMap;

use crate::domain::{Bounds, LatLng, Station, StationId};

use super::style::{LineStyle, MarkerStyle};
use super::{LayerHandle, LayerKind, MapSurface, MarkerHandle};

/// A polyline as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPolyline {
    pub points: Vec<LatLng>,
    pub style: LineStyle,
}

/// A marker as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMarker {
    pub layer: LayerHandle,
    pub station: StationId,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub visible: bool,
}

#[derive(Debug, Clone)]
struct RecordedLayer {
    kind: LayerKind,
    polylines: Vec<RecordedPolyline>,
}

/// Handle-independent view of what is on the map.
///
/// Two maps that show the same thing compare equal even if their layers
/// and markers were created in a different order or with different handles.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    /// Layer kinds with their polylines, sorted by kind.
    pub layers: Vec<(LayerKind, Vec<RecordedPolyline>)>,
    /// (layer kind, station, style, visible), sorted by kind then station.
    pub markers: Vec<(LayerKind, StationId, MarkerStyle, bool)>,
}

/// Map surface that records instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingMap {
    next_id: u64,
    layers: BTreeMap<LayerHandle, RecordedLayer>,
    markers: BTreeMap<MarkerHandle, RecordedMarker>,
    fits: Vec<(Bounds, u32)>,
    popups: Vec<StationId>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Number of live layers of `kind`.
    pub fn layer_count(&self, kind: LayerKind) -> usize {
        self.layers.values().filter(|l| l.kind == kind).count()
    }

    /// All live markers.
    pub fn markers(&self) -> impl Iterator<Item = &RecordedMarker> {
        self.markers.values()
    }

    /// Live markers for one station.
    pub fn markers_for(&self, station: &StationId) -> Vec<&RecordedMarker> {
        self.markers
            .values()
            .filter(|m| &m.station == station)
            .collect()
    }

    /// Polylines across every live layer of `kind`, in drawing order.
    pub fn polylines(&self, kind: LayerKind) -> Vec<&RecordedPolyline> {
        self.layers
            .values()
            .filter(|l| l.kind == kind)
            .flat_map(|l| l.polylines.iter())
            .collect()
    }

    /// Every `fit_bounds` call, oldest first.
    pub fn fits(&self) -> &[(Bounds, u32)] {
        &self.fits
    }

    /// Stations whose popup was opened, oldest first.
    pub fn popups(&self) -> &[StationId] {
        &self.popups
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let mut layers: Vec<(LayerKind, Vec<RecordedPolyline>)> = self
            .layers
            .values()
            .map(|l| (l.kind, l.polylines.clone()))
            .collect();
        layers.sort_by_key(|(kind, _)| *kind);

        let mut markers: Vec<(LayerKind, StationId, MarkerStyle, bool)> = self
            .markers
            .values()
            .filter_map(|m| {
                let kind = self.layers.get(&m.layer)?.kind;
                Some((kind, m.station.clone(), m.style, m.visible))
            })
            .collect();
        markers.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        MapSnapshot { layers, markers }
    }
}

impl MapSurface for RecordingMap {
    fn create_layer(&mut self, kind: LayerKind) -> LayerHandle {
        let handle = LayerHandle(self.next());
        self.layers.insert(
            handle,
            RecordedLayer {
                kind,
                polylines: Vec::new(),
            },
        );
        handle
    }

    fn remove_layer(&mut self, layer: LayerHandle) {
        self.layers.remove(&layer);
        self.markers.retain(|_, m| m.layer != layer);
    }

    fn add_marker(
        &mut self,
        layer: LayerHandle,
        station: &Station,
        style: &MarkerStyle,
    ) -> MarkerHandle {
        let handle = MarkerHandle(self.next());
        self.markers.insert(
            handle,
            RecordedMarker {
                layer,
                station: station.id.clone(),
                position: station.position,
                style: *style,
                visible: true,
            },
        );
        handle
    }

    fn restyle_marker(&mut self, marker: MarkerHandle, style: &MarkerStyle) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.style = *style;
        }
    }

    fn set_marker_visible(&mut self, marker: MarkerHandle, visible: bool) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.visible = visible;
        }
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        if let Some(m) = self.markers.get(&marker) {
            self.popups.push(m.station.clone());
        }
    }

    fn add_polyline(&mut self, layer: LayerHandle, points: &[LatLng], style: &LineStyle) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.polylines.push(RecordedPolyline {
                points: points.to_vec(),
                style: *style,
            });
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) {
        self.fits.push((bounds, padding));
    }
}
