//! Marker and line styling rules.
//!
//! Fill color comes from a fixed per-category palette; radius follows a fixed
//! ordinal scale so the highest-priority category draws largest. Neither is
//! user-configurable.

use crate::domain::Category;
use crate::present::Severity;

/// Fill for categories outside the palette.
pub const FALLBACK_FILL: &str = "#999999";

/// Fill and route color for stations on the displayed path.
pub const PATH_COLOR: &str = "#9C27B0";

/// Marker appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub weight: f32,
    pub fill_opacity: f32,
}

/// Polyline appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
    pub dashed: bool,
}

/// Palette entry for a category.
pub fn fill_for(category: &Category) -> &'static str {
    match category {
        Category::Metro => "#2196F3",
        Category::Portal => "#795548",
        Category::BusRapid => "#F44336",
        Category::Feeder => "#4CAF50",
        Category::Intermodal => "#FF9800",
        Category::Other(_) => FALLBACK_FILL,
    }
}

/// Ordinal radius scale: portal > intermodal > metro > bus-rapid > feeder.
pub fn radius_for(category: &Category) -> f32 {
    match category {
        Category::Portal => 10.0,
        Category::Intermodal => 9.0,
        Category::Metro => 8.0,
        Category::BusRapid => 7.0,
        Category::Feeder => 5.0,
        Category::Other(_) => 4.0,
    }
}

/// Default marker for a station of `category`.
pub fn default_marker(category: &Category) -> MarkerStyle {
    MarkerStyle {
        radius: radius_for(category),
        fill: fill_for(category),
        stroke: "#FFFFFF",
        weight: 2.0,
        fill_opacity: 0.8,
    }
}

/// Marker for a station on the displayed path.
pub fn path_marker() -> MarkerStyle {
    MarkerStyle {
        radius: 12.0,
        fill: PATH_COLOR,
        stroke: "#FFFFFF",
        weight: 3.0,
        fill_opacity: 0.9,
    }
}

/// Road-following route segment.
pub fn enriched_segment() -> LineStyle {
    LineStyle {
        color: PATH_COLOR,
        weight: 5.0,
        opacity: 0.8,
        dashed: false,
    }
}

/// Straight-line fallback segment.
pub fn straight_segment() -> LineStyle {
    LineStyle {
        color: PATH_COLOR,
        weight: 4.0,
        opacity: 0.6,
        dashed: true,
    }
}

pub fn bottleneck_line(severity: Severity) -> LineStyle {
    LineStyle {
        color: severity.color(),
        weight: 6.0,
        opacity: 0.85,
        dashed: false,
    }
}

pub fn network_line() -> LineStyle {
    LineStyle {
        color: "#00897B",
        weight: 3.0,
        opacity: 0.7,
        dashed: false,
    }
}
