//! Domain types for the transit map.
//!
//! Stations, coordinates and the validated analysis results. All types
//! enforce their invariants at construction time, so code that receives
//! them can trust their validity.

mod geo;
mod results;
mod station;

pub use geo::{Bounds, LatLng};
pub use results::{
    Bottleneck, ColoringResult, CongestionLevel, CongestionResult, MaxFlowResult, MstEdge,
    NetworkStats, PathResult,
};
pub use station::{Category, InvalidStationId, Station, StationId};
