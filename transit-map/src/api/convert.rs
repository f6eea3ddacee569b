//! Conversion from backend DTOs to domain types.

use tracing::warn;

use crate::domain::{
    Bottleneck, Category, ColoringResult, CongestionLevel, CongestionResult, LatLng,
    MaxFlowResult, MstEdge, NetworkStats, PathResult, Station, StationId,
};

use super::types::{
    BottleneckDto, ColoringDto, CongestionDto, MaxFlowDto, MstEdgeDto, PathDto, StationDto,
    StatsDto,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Station id missing or blank
    #[error("invalid station id: {0:?}")]
    InvalidStationId(String),

    /// Coordinates outside the valid WGS84 range
    #[error("invalid coordinates for station {id}: ({lat}, {lon})")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },

    /// Negative or out-of-range capacity
    #[error("invalid capacity for station {id}: {capacity}")]
    InvalidCapacity { id: String, capacity: i64 },
}

/// Convert a single station.
pub fn convert_station(dto: &StationDto) -> Result<Station, ConversionError> {
    let id =
        StationId::parse(&dto.id).map_err(|_| ConversionError::InvalidStationId(dto.id.clone()))?;

    let valid_lat = dto.lat.is_finite() && (-90.0..=90.0).contains(&dto.lat);
    let valid_lon = dto.lon.is_finite() && (-180.0..=180.0).contains(&dto.lon);
    if !valid_lat || !valid_lon {
        return Err(ConversionError::InvalidCoordinates {
            id: dto.id.clone(),
            lat: dto.lat,
            lon: dto.lon,
        });
    }

    let capacity = u32::try_from(dto.capacity).map_err(|_| ConversionError::InvalidCapacity {
        id: dto.id.clone(),
        capacity: dto.capacity,
    })?;

    Ok(Station {
        id,
        name: dto.name.trim().to_string(),
        category: Category::from_wire(&dto.category),
        position: LatLng::new(dto.lat, dto.lon),
        capacity,
    })
}

/// Convert a station listing, skipping entries that fail validation.
///
/// A single bad row in a listing of thousands of stations should not take
/// the whole map down.
pub fn convert_station_list(dtos: &[StationDto]) -> Vec<Station> {
    dtos.iter()
        .filter_map(|dto| match convert_station(dto) {
            Ok(station) => Some(station),
            Err(e) => {
                warn!(station = %dto.id, error = %e, "skipping station");
                None
            }
        })
        .collect()
}

/// Convert a shortest-path response. Every stop must be valid.
pub fn convert_path(dto: &PathDto) -> Result<PathResult, ConversionError> {
    let stations = dto
        .stations
        .iter()
        .map(convert_station)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PathResult {
        stations,
        total_time: dto.total_time,
        station_count: dto.station_count,
    })
}

pub fn convert_max_flow(dto: &MaxFlowDto) -> MaxFlowResult {
    MaxFlowResult {
        max_flow: dto.max_flow,
        recommendation: dto.recommendation.clone(),
    }
}

/// Convert minimum-network edges, dropping edges with blank endpoints.
pub fn convert_mst_edges(dtos: &[MstEdgeDto]) -> Vec<MstEdge> {
    dtos.iter()
        .filter_map(|dto| {
            let origin = StationId::parse(&dto.origin_id).ok()?;
            let destination = StationId::parse(&dto.destination_id).ok()?;
            Some(MstEdge {
                origin,
                destination,
                time: dto.time,
            })
        })
        .collect()
}

pub fn convert_coloring(dto: &ColoringDto) -> ColoringResult {
    ColoringResult {
        assignments: dto.assignments.clone(),
        colors_used: dto.colors_used,
        interpretation: dto.interpretation.clone(),
    }
}

fn convert_bottleneck(dto: &BottleneckDto) -> Result<Bottleneck, ConversionError> {
    Ok(Bottleneck {
        origin: convert_station(&dto.origin)?,
        destination: convert_station(&dto.destination)?,
        usage_pct: dto.usage_pct,
        capacity: dto.capacity,
        current_flow: dto.current_flow,
    })
}

/// Convert a congestion analysis. Every bottleneck station must be valid.
pub fn convert_congestion(dto: &CongestionDto) -> Result<CongestionResult, ConversionError> {
    let bottlenecks = dto
        .bottlenecks
        .iter()
        .map(convert_bottleneck)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CongestionResult {
        normal_flow: dto.normal_flow,
        peak_flow: dto.peak_flow,
        reduction_pct: dto.reduction_pct,
        level: CongestionLevel {
            name: dto.level.name.clone(),
            color: dto.level.color.clone(),
        },
        recommendations: dto.recommendations.clone(),
        bottlenecks,
    })
}

pub fn convert_stats(dto: &StatsDto) -> NetworkStats {
    NetworkStats {
        total_stations: dto.total_estaciones,
        total_routes: dto.total_rutas,
        total_lines: dto.total_lineas,
        total_capacity: dto.capacidad_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: &str, category: &str, lat: f64, lon: f64) -> StationDto {
        StationDto {
            id: id.to_string(),
            name: format!("Station {id}"),
            category: category.to_string(),
            lat,
            lon,
            capacity: 1000,
        }
    }

    #[test]
    fn converts_valid_station() {
        let station = convert_station(&dto("E001", "tm", 4.6, -74.1)).unwrap();
        assert_eq!(station.id.as_str(), "E001");
        assert_eq!(station.category, Category::BusRapid);
        assert_eq!(station.position, LatLng::new(4.6, -74.1));
        assert_eq!(station.capacity, 1000);
    }

    #[test]
    fn rejects_blank_id() {
        let err = convert_station(&dto(" ", "metro", 4.6, -74.1)).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidStationId(_)));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(convert_station(&dto("X", "metro", 91.0, 0.0)).is_err());
        assert!(convert_station(&dto("X", "metro", 0.0, -181.0)).is_err());
        assert!(convert_station(&dto("X", "metro", f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn rejects_negative_capacity() {
        let mut bad = dto("X", "metro", 4.6, -74.1);
        bad.capacity = -5;
        assert!(matches!(
            convert_station(&bad),
            Err(ConversionError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn station_list_skips_invalid() {
        let dtos = vec![
            dto("A", "metro", 4.6, -74.1),
            dto("", "metro", 4.6, -74.1),
            dto("C", "sitp", 4.7, -74.0),
        ];
        let stations = convert_station_list(&dtos);
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].category, Category::Feeder);
    }

    #[test]
    fn path_fails_on_invalid_stop() {
        let path = PathDto {
            stations: vec![dto("A", "metro", 4.6, -74.1), dto("B", "metro", 100.0, 0.0)],
            total_time: 3.0,
            station_count: 2,
        };
        assert!(convert_path(&path).is_err());
    }

    #[test]
    fn empty_path_is_disconnected() {
        let path = PathDto {
            stations: Vec::new(),
            total_time: 0.0,
            station_count: 0,
        };
        assert!(convert_path(&path).unwrap().is_disconnected());
    }

    #[test]
    fn mst_drops_blank_endpoints() {
        let edges = vec![
            MstEdgeDto {
                origin_id: "A".into(),
                destination_id: "B".into(),
                time: 2.0,
            },
            MstEdgeDto {
                origin_id: "".into(),
                destination_id: "B".into(),
                time: 1.0,
            },
        ];
        let converted = convert_mst_edges(&edges);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].destination.as_str(), "B");
    }
}
