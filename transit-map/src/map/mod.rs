//! Map rendering collaborator.
//!
//! The tile map and its drawing primitives live outside this crate. The
//! [`MapSurface`] trait is the contract the layer manager drives; a page
//! binding implements it over the real map widget, and [`RecordingMap`]
//! implements it in memory for tests and headless runs.

mod recording;
pub mod style;

pub use recording::{MapSnapshot, RecordedMarker, RecordedPolyline, RecordingMap};
pub use style::{LineStyle, MarkerStyle};

use crate::domain::{Bounds, LatLng, Station};

/// The named layers the map shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// One marker per known station.
    Markers,
    /// The currently displayed path.
    Route,
    /// Congestion bottleneck edges.
    Bottleneck,
    /// Minimum connecting network overlay.
    Network,
}

/// Opaque handle to a layer group on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);

/// Opaque handle to a single station marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Drawing primitives of the map widget.
///
/// Removing a layer removes everything drawn into it.
pub trait MapSurface {
    fn create_layer(&mut self, kind: LayerKind) -> LayerHandle;

    fn remove_layer(&mut self, layer: LayerHandle);

    fn add_marker(
        &mut self,
        layer: LayerHandle,
        station: &Station,
        style: &MarkerStyle,
    ) -> MarkerHandle;

    fn restyle_marker(&mut self, marker: MarkerHandle, style: &MarkerStyle);

    fn set_marker_visible(&mut self, marker: MarkerHandle, visible: bool);

    /// Open the marker's info popup (name, category, capacity, id).
    fn open_popup(&mut self, marker: MarkerHandle);

    fn add_polyline(&mut self, layer: LayerHandle, points: &[LatLng], style: &LineStyle);

    /// Move the viewport so `bounds` is visible with `padding` pixels to spare.
    fn fit_bounds(&mut self, bounds: Bounds, padding: u32);
}
