//! Network-wide analysis view models: minimum network, coloring, statistics.

use crate::domain::{ColoringResult, MstEdge, NetworkStats};

/// Multiplier of the hue transform. Coprime with 360, so the first 360
/// color ids all land on distinct hues.
const HUE_STEP: u32 = 137;

/// Map a color id to a hue in degrees.
pub fn hue(color_id: u32) -> u32 {
    ((u64::from(color_id) * u64::from(HUE_STEP)) % 360) as u32
}

/// Minimum connecting network summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkView {
    pub edges: Vec<MstEdge>,
    /// Sum of edge times in minutes
    pub total_time: f64,
}

impl NetworkView {
    pub fn from_edges(edges: &[MstEdge]) -> Self {
        Self {
            edges: edges.to_vec(),
            total_time: edges.iter().map(|e| e.time).sum(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// e.g. `"42.50 min"`
    pub fn total_time_label(&self) -> String {
        format!("{:.2} min", self.total_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAssignment {
    pub station_name: String,
    pub color_id: u32,
    pub hue: u32,
}

impl ColorAssignment {
    pub fn css(&self) -> String {
        format!("hsl({}, 70%, 50%)", self.hue)
    }
}

/// Resource coloring summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoringView {
    /// Sorted by station name.
    pub assignments: Vec<ColorAssignment>,
    /// Distinct colors as reported by the backend.
    pub colors_used: usize,
    pub interpretation: String,
}

impl ColoringView {
    pub fn from_result(result: &ColoringResult) -> Self {
        let mut assignments: Vec<ColorAssignment> = result
            .assignments
            .iter()
            .map(|(name, &color_id)| ColorAssignment {
                station_name: name.clone(),
                color_id,
                hue: hue(color_id),
            })
            .collect();
        assignments.sort_by(|a, b| a.station_name.cmp(&b.station_name));

        Self {
            assignments,
            colors_used: result.colors_used,
            interpretation: result.interpretation.clone(),
        }
    }

    /// Distinct color ids actually present in the assignment.
    pub fn distinct_colors(&self) -> usize {
        let mut ids: Vec<u32> = self.assignments.iter().map(|a| a.color_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Startup statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub total_stations: u64,
    pub total_routes: u64,
    pub total_lines: u64,
    /// e.g. `"250K"`
    pub capacity_label: String,
}

impl StatsView {
    pub fn from_stats(stats: &NetworkStats) -> Self {
        // Halves round up, not to even.
        let thousands = (stats.total_capacity as f64 / 1000.0).round() as u64;
        Self {
            total_stations: stats.total_stations,
            total_routes: stats.total_routes,
            total_lines: stats.total_lines,
            capacity_label: format!("{thousands}K"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::StationId;

    fn edge(a: &str, b: &str, time: f64) -> MstEdge {
        MstEdge {
            origin: StationId::parse(a).unwrap(),
            destination: StationId::parse(b).unwrap(),
            time,
        }
    }

    #[test]
    fn network_totals() {
        let view = NetworkView::from_edges(&[edge("A", "B", 2.5), edge("B", "C", 4.0)]);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.total_time, 6.5);
        assert_eq!(view.total_time_label(), "6.50 min");
    }

    #[test]
    fn empty_network() {
        let view = NetworkView::from_edges(&[]);
        assert_eq!(view.edge_count(), 0);
        assert_eq!(view.total_time, 0.0);
    }

    #[test]
    fn hue_is_modular() {
        assert_eq!(hue(0), 0);
        assert_eq!(hue(1), 137);
        assert_eq!(hue(2), 274);
        assert_eq!(hue(3), 51);
        assert_eq!(hue(360), 0);
    }

    #[test]
    fn coloring_is_sorted_and_counted() {
        let result = ColoringResult {
            assignments: HashMap::from([
                ("Usme".to_string(), 1),
                ("Calle 26".to_string(), 0),
                ("Bosa".to_string(), 1),
            ]),
            colors_used: 2,
            interpretation: "Mínimo de 2 recursos/franjas para evitar conflictos.".into(),
        };

        let view = ColoringView::from_result(&result);
        let names: Vec<_> = view
            .assignments
            .iter()
            .map(|a| a.station_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bosa", "Calle 26", "Usme"]);
        assert_eq!(view.distinct_colors(), 2);
        assert_eq!(view.colors_used, 2);
        assert_eq!(view.assignments[0].css(), "hsl(137, 70%, 50%)");
    }

    #[test]
    fn stats_capacity_in_thousands() {
        let view = StatsView::from_stats(&NetworkStats {
            total_stations: 150,
            total_routes: 400,
            total_lines: 12,
            total_capacity: 249_600,
        });
        assert_eq!(view.capacity_label, "250K");
        assert_eq!(view.total_lines, 12);
    }

    #[test]
    fn stats_capacity_rounds_halves_up() {
        let label = |total_capacity| {
            StatsView::from_stats(&NetworkStats {
                total_stations: 0,
                total_routes: 0,
                total_lines: 0,
                total_capacity,
            })
            .capacity_label
        };
        assert_eq!(label(2_500), "3K");
        assert_eq!(label(3_500), "4K");
        assert_eq!(label(499), "0K");
    }
}
