//! Congestion analysis view model.

use crate::domain::{CongestionResult, LatLng};

/// At or above this usage a bottleneck is high severity.
pub const HIGH_USAGE_PCT: f64 = 80.0;

/// At or above this usage (and below high) a bottleneck is medium severity.
pub const MEDIUM_USAGE_PCT: f64 = 70.0;

/// Recommendations shown in the panel.
const MAX_RECOMMENDATIONS: usize = 3;

/// Bottleneck severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_usage(usage_pct: f64) -> Self {
        if usage_pct >= HIGH_USAGE_PCT {
            Severity::High
        } else if usage_pct >= MEDIUM_USAGE_PCT {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Low => "#F59E0B",
            Severity::Medium => "#EF4444",
            Severity::High => "#991B1B",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BottleneckView {
    pub origin: LatLng,
    pub destination: LatLng,
    pub origin_name: String,
    pub destination_name: String,
    pub usage_pct: f64,
    pub severity: Severity,
}

impl BottleneckView {
    /// e.g. `"Portal Norte → Calle 100 (85% uso)"`
    pub fn describe(&self) -> String {
        format!(
            "{} → {} ({:.0}% uso)",
            self.origin_name, self.destination_name, self.usage_pct
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CongestionView {
    pub normal_flow: i64,
    pub peak_flow: i64,
    pub reduction_pct: f64,
    pub level_name: String,
    pub level_color: String,
    pub recommendations: Vec<String>,
    pub bottlenecks: Vec<BottleneckView>,
}

impl CongestionView {
    pub fn from_result(result: &CongestionResult) -> Self {
        let recommendations = result
            .recommendations
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .take(MAX_RECOMMENDATIONS)
            .map(str::to_string)
            .collect();

        let bottlenecks = result
            .bottlenecks
            .iter()
            .map(|b| BottleneckView {
                origin: b.origin.position,
                destination: b.destination.position,
                origin_name: b.origin.name.clone(),
                destination_name: b.destination.name.clone(),
                usage_pct: b.usage_pct,
                severity: Severity::from_usage(b.usage_pct),
            })
            .collect();

        Self {
            normal_flow: result.normal_flow,
            peak_flow: result.peak_flow,
            reduction_pct: result.reduction_pct,
            level_name: result.level.name.clone(),
            level_color: result.level.color.clone(),
            recommendations,
            bottlenecks,
        }
    }

    /// e.g. `"40.0%"`
    pub fn reduction_label(&self) -> String {
        format!("{:.1}%", self.reduction_pct)
    }
}
