//! Validated results of the remote analysis computations.
//!
//! These are what the backend client hands to the rest of the crate after
//! decoding and checking the wire payloads. Stations embedded in a result
//! are full [`Station`] values so they can be adopted into the directory.

use std::collections::HashMap;

use super::station::{Station, StationId};

/// Shortest path between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Ordered stops, origin first. Empty when the stations are not connected.
    pub stations: Vec<Station>,
    /// Total travel time in minutes.
    pub total_time: f64,
    /// Station count as reported by the backend.
    pub station_count: usize,
}

impl PathResult {
    /// Whether the backend found no connected route.
    pub fn is_disconnected(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Max-flow capacity estimate between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxFlowResult {
    pub max_flow: i64,
    pub recommendation: String,
}

/// One edge of the minimum connecting network.
#[derive(Debug, Clone, PartialEq)]
pub struct MstEdge {
    pub origin: StationId,
    pub destination: StationId,
    /// Travel time in minutes.
    pub time: f64,
}

/// Resource coloring of the station graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoringResult {
    /// Station name to color id.
    pub assignments: HashMap<String, u32>,
    pub colors_used: usize,
    pub interpretation: String,
}

/// Qualitative congestion level, as named and colored by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionLevel {
    pub name: String,
    pub color: String,
}

/// An edge whose simulated utilisation exceeds the congestion threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Bottleneck {
    pub origin: Station,
    pub destination: Station,
    pub usage_pct: f64,
    pub capacity: i64,
    pub current_flow: i64,
}

/// Peak-hour congestion analysis between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionResult {
    pub normal_flow: i64,
    pub peak_flow: i64,
    pub reduction_pct: f64,
    pub level: CongestionLevel,
    pub recommendations: Vec<String>,
    pub bottlenecks: Vec<Bottleneck>,
}

/// Network-wide totals shown at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkStats {
    pub total_stations: u64,
    pub total_routes: u64,
    pub total_lines: u64,
    pub total_capacity: u64,
}
