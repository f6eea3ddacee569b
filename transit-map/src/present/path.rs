//! Shortest-path and max-flow view models.

use crate::domain::{MaxFlowResult, PathResult, Station};
use crate::map::style;

/// Estimates above this are reported as high capacity.
pub const HIGH_CAPACITY_THRESHOLD: i64 = 5000;

const HIGH_CAPACITY_COLOR: &str = "#22C55E";
const LOW_CAPACITY_COLOR: &str = "#EF4444";

/// Count adjacent stops whose category differs.
///
/// Computed locally from the path rather than trusted from the backend.
pub fn transfer_count(stations: &[Station]) -> usize {
    stations
        .windows(2)
        .filter(|pair| pair[0].category != pair[1].category)
        .count()
}

/// One stop in the displayed itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct StopView {
    /// 1-based position along the path
    pub position: usize,
    pub name: String,
    pub category: String,
    pub color: &'static str,
}

/// A computed route.
#[derive(Debug, Clone, PartialEq)]
pub struct PathView {
    /// Minutes
    pub total_time: f64,
    pub station_count: usize,
    pub transfer_count: usize,
    pub stops: Vec<StopView>,
}

impl PathView {
    pub fn from_result(result: &PathResult) -> Self {
        let stops = result
            .stations
            .iter()
            .enumerate()
            .map(|(i, s)| StopView {
                position: i + 1,
                name: s.name.clone(),
                category: s.category.label(),
                color: style::fill_for(&s.category),
            })
            .collect();

        Self {
            total_time: result.total_time,
            station_count: result.station_count,
            transfer_count: transfer_count(&result.stations),
            stops,
        }
    }

    /// e.g. `"12.5 min"`
    pub fn total_time_label(&self) -> String {
        format!("{} min", self.total_time)
    }
}

/// Max-flow capacity estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxFlowView {
    pub capacity: i64,
    pub recommendation: String,
    pub high_capacity: bool,
    pub color: &'static str,
}

impl MaxFlowView {
    pub fn from_result(result: &MaxFlowResult) -> Self {
        let high_capacity = result.max_flow > HIGH_CAPACITY_THRESHOLD;
        Self {
            capacity: result.max_flow,
            recommendation: result.recommendation.clone(),
            high_capacity,
            color: if high_capacity {
                HIGH_CAPACITY_COLOR
            } else {
                LOW_CAPACITY_COLOR
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, LatLng, StationId};

    fn station(id: &str, category: Category) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            name: id.to_string(),
            category,
            position: LatLng::new(4.6, -74.1),
            capacity: 0,
        }
    }

    #[test]
    fn transfers_count_category_changes() {
        let path = vec![
            station("1", Category::Metro),
            station("2", Category::Metro),
            station("3", Category::BusRapid),
            station("4", Category::BusRapid),
            station("5", Category::Metro),
        ];
        assert_eq!(transfer_count(&path), 2);
    }

    #[test]
    fn unknown_categories_compare_without_case() {
        let path = vec![
            station("1", Category::from_wire("Cable")),
            station("2", Category::from_wire("cable")),
            station("3", Category::from_wire("CABLE")),
        ];
        assert_eq!(transfer_count(&path), 0);
    }

    #[test]
    fn short_paths_have_no_transfers() {
        assert_eq!(transfer_count(&[]), 0);
        assert_eq!(transfer_count(&[station("1", Category::Feeder)]), 0);
    }

    #[test]
    fn path_view_scenario() {
        let result = PathResult {
            stations: vec![
                station("A", Category::Metro),
                station("C", Category::Metro),
                station("B", Category::BusRapid),
            ],
            total_time: 12.5,
            station_count: 3,
        };

        let view = PathView::from_result(&result);
        assert_eq!(view.total_time_label(), "12.5 min");
        assert_eq!(view.station_count, 3);
        assert_eq!(view.transfer_count, 1);
        assert_eq!(view.stops[0].position, 1);
        assert_eq!(view.stops[2].name, "B");
        assert_eq!(view.stops[2].category, "BUS-RAPID");
    }

    #[test]
    fn whole_minutes_have_no_decimals() {
        let view = PathView::from_result(&PathResult {
            stations: Vec::new(),
            total_time: 12.0,
            station_count: 0,
        });
        assert_eq!(view.total_time_label(), "12 min");
    }

    #[test]
    fn max_flow_threshold() {
        let high = MaxFlowView::from_result(&MaxFlowResult {
            max_flow: 5001,
            recommendation: "Capacidad Alta".into(),
        });
        assert!(high.high_capacity);
        assert_eq!(high.color, HIGH_CAPACITY_COLOR);

        let low = MaxFlowView::from_result(&MaxFlowResult {
            max_flow: 5000,
            recommendation: "Posible Cuello de Botella".into(),
        });
        assert!(!low.high_capacity);
        assert_eq!(low.color, LOW_CAPACITY_COLOR);
    }
}
