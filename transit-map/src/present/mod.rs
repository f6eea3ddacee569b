//! Result presentation.
//!
//! Pure transformations from backend results to the view models the panels
//! display. Nothing here performs I/O or touches the map.

mod analysis;
mod congestion;
mod path;

pub use analysis::{ColorAssignment, ColoringView, NetworkView, StatsView, hue};
pub use congestion::{BottleneckView, CongestionView, HIGH_USAGE_PCT, MEDIUM_USAGE_PCT, Severity};
pub use path::{HIGH_CAPACITY_THRESHOLD, MaxFlowView, PathView, StopView, transfer_count};
