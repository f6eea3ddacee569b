//! Route enrichment.
//!
//! Turns an ordered station path into drawable geometry. Each consecutive
//! pair is looked up independently in the directions service; a segment
//! whose lookup fails degrades to a straight line without affecting the
//! others.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::directions::Directions;
use crate::domain::{Bounds, LatLng, Station};
use crate::map::MapSurface;
use crate::map::style::{self, LineStyle};
use crate::session::LayerManager;

/// Pixels of margin around the route when fitting the viewport.
pub const FIT_PADDING: u32 = 50;

/// Errors from the route pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("path needs at least 2 stations, got {0}")]
    PathTooShort(usize),
}

/// Geometry of one station-to-station segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentGeometry {
    /// Road-following geometry from the directions service.
    Enriched(Vec<LatLng>),
    /// Fallback straight line between the two stations.
    Straight([LatLng; 2]),
}

impl SegmentGeometry {
    pub fn points(&self) -> &[LatLng] {
        match self {
            SegmentGeometry::Enriched(points) => points,
            SegmentGeometry::Straight(ends) => ends,
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, SegmentGeometry::Enriched(_))
    }

    pub fn line_style(&self) -> LineStyle {
        match self {
            SegmentGeometry::Enriched(_) => style::enriched_segment(),
            SegmentGeometry::Straight(_) => style::straight_segment(),
        }
    }
}

/// A fully resolved route, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// One entry per consecutive station pair, in path order.
    pub segments: Vec<SegmentGeometry>,
    /// Covers every station on the path.
    pub bounds: Bounds,
}

impl RouteGeometry {
    pub fn enriched_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_enriched()).count()
    }
}

/// Station path to map geometry.
pub struct RouteEnrichmentPipeline<D> {
    directions: Arc<D>,
}

impl<D> Clone for RouteEnrichmentPipeline<D> {
    fn clone(&self) -> Self {
        Self {
            directions: Arc::clone(&self.directions),
        }
    }
}

impl<D: Directions> RouteEnrichmentPipeline<D> {
    pub fn new(directions: D) -> Self {
        Self {
            directions: Arc::new(directions),
        }
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    /// Resolve every segment of the path.
    ///
    /// Lookups run concurrently; the result keeps path order. Never fails
    /// because of a lookup, only because the path is too short.
    pub async fn enrich(&self, stations: &[Station]) -> Result<RouteGeometry, PipelineError> {
        let bounds = match stations {
            [_, _, ..] => Bounds::from_points(stations.iter().map(|s| s.position)),
            _ => None,
        }
        .ok_or(PipelineError::PathTooShort(stations.len()))?;

        let lookups: Vec<_> = stations
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let (from, to) = (pair[0].position, pair[1].position);
                async move {
                    match self.directions.route(from, to).await {
                        Ok(points) if points.len() >= 2 => SegmentGeometry::Enriched(points),
                        Ok(points) => {
                            warn!(
                                segment = index,
                                points = points.len(),
                                "Degenerate route geometry, drawing straight line"
                            );
                            SegmentGeometry::Straight([from, to])
                        }
                        Err(e) => {
                            warn!(
                                segment = index,
                                error = %e,
                                "Directions lookup failed, drawing straight line"
                            );
                            SegmentGeometry::Straight([from, to])
                        }
                    }
                }
            })
            .collect();

        let segments = join_all(lookups).await;
        let geometry = RouteGeometry { segments, bounds };
        debug!(
            segments = geometry.segments.len(),
            enriched = geometry.enriched_count(),
            "route enriched"
        );
        Ok(geometry)
    }
}

/// Replace the drawn route with `geometry` and fit the viewport to it.
pub fn draw<M: MapSurface>(layers: &mut LayerManager<M>, geometry: &RouteGeometry) {
    layers.clear_route();
    for segment in &geometry.segments {
        layers.add_route_segment(segment.points(), &segment.line_style());
    }
    layers.fit_bounds(geometry.bounds, FIT_PADDING);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::directions::{DirectionsError, NoDirections};
    use crate::domain::{Category, StationId};
    use crate::map::{LayerKind, RecordingMap};

    /// Fails lookups starting at any of `fail_from`; otherwise returns a
    /// three-point geometry through the midpoint.
    #[derive(Default)]
    struct ScriptedDirections {
        fail_from: Vec<LatLng>,
        delay: Option<Duration>,
        calls: Mutex<Vec<(LatLng, LatLng)>>,
    }

    impl Directions for ScriptedDirections {
        async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, DirectionsError> {
            self.calls.lock().unwrap().push((from, to));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_from.contains(&from) {
                return Err(DirectionsError::NoRoute {
                    code: "NoRoute".into(),
                });
            }
            let mid = LatLng::new((from.lat + to.lat) / 2.0, (from.lon + to.lon) / 2.0);
            Ok(vec![from, mid, to])
        }
    }

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            name: id.to_string(),
            category: Category::Metro,
            position: LatLng::new(lat, lon),
            capacity: 0,
        }
    }

    fn path() -> Vec<Station> {
        vec![
            station("A", 4.60, -74.10),
            station("B", 4.65, -74.05),
            station("C", 4.70, -74.08),
        ]
    }

    #[tokio::test]
    async fn failed_segment_falls_back_alone() {
        let stations = path();
        let pipeline = RouteEnrichmentPipeline::new(ScriptedDirections {
            fail_from: vec![stations[0].position],
            ..Default::default()
        });

        let geometry = pipeline.enrich(&stations).await.unwrap();

        assert_eq!(
            geometry.segments[0],
            SegmentGeometry::Straight([stations[0].position, stations[1].position])
        );
        assert!(geometry.segments[1].is_enriched());
        assert_eq!(geometry.segments[1].points().len(), 3);
    }

    #[tokio::test]
    async fn drawn_route_keeps_path_order() {
        let stations = path();
        let pipeline = RouteEnrichmentPipeline::new(ScriptedDirections {
            fail_from: vec![stations[0].position],
            ..Default::default()
        });
        let mut layers = LayerManager::new(RecordingMap::new());

        let geometry = pipeline.enrich(&stations).await.unwrap();
        draw(&mut layers, &geometry);

        let lines = layers.map().polylines(LayerKind::Route);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].style, style::straight_segment());
        assert_eq!(lines[1].style, style::enriched_segment());
        assert_eq!(lines[1].points.first(), Some(&stations[1].position));

        assert_eq!(layers.map().fits(), &[(geometry.bounds, FIT_PADDING)]);
        assert!(stations.iter().all(|s| geometry.bounds.contains(s.position)));
    }

    #[tokio::test]
    async fn redraw_replaces_previous_route() {
        let stations = path();
        let pipeline = RouteEnrichmentPipeline::new(ScriptedDirections::default());
        let mut layers = LayerManager::new(RecordingMap::new());

        let full = pipeline.enrich(&stations).await.unwrap();
        draw(&mut layers, &full);
        let shorter = pipeline.enrich(&stations[..2]).await.unwrap();
        draw(&mut layers, &shorter);

        assert_eq!(layers.map().layer_count(LayerKind::Route), 1);
        assert_eq!(layers.map().polylines(LayerKind::Route).len(), 1);
    }

    #[tokio::test]
    async fn short_path_is_rejected() {
        let pipeline = RouteEnrichmentPipeline::new(ScriptedDirections::default());

        let single = vec![station("A", 4.6, -74.1)];
        assert_eq!(
            pipeline.enrich(&single).await,
            Err(PipelineError::PathTooShort(1))
        );
        assert_eq!(
            pipeline.enrich(&[]).await,
            Err(PipelineError::PathTooShort(0))
        );

        assert!(pipeline.directions().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_directions_draw_straight_lines() {
        let pipeline = RouteEnrichmentPipeline::new(NoDirections);
        let geometry = pipeline.enrich(&path()).await.unwrap();
        assert_eq!(geometry.enriched_count(), 0);
        assert_eq!(geometry.segments.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn segments_are_looked_up_concurrently() {
        let stations = path();
        let pipeline = RouteEnrichmentPipeline::new(ScriptedDirections {
            delay: Some(Duration::from_secs(1)),
            ..Default::default()
        });

        let start = tokio::time::Instant::now();
        pipeline.enrich(&stations).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(pipeline.directions().calls.lock().unwrap().len(), 2);
    }
}
