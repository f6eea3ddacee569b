//! Backend response DTOs.
//!
//! These types map directly to the analysis backend's JSON. Field names on
//! the wire are Spanish; the Rust side uses English names with explicit
//! renames. Optional and defaulted fields mirror what the backend omits.

use std::collections::HashMap;

use serde::Deserialize;

/// A station as serialized by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,

    /// Category spelling, e.g. `"metro"`, `"tm"`, `"sitp"`.
    #[serde(rename = "tipo")]
    pub category: String,

    #[serde(rename = "latitud")]
    pub lat: f64,

    #[serde(rename = "longitud")]
    pub lon: f64,

    /// Not included in every endpoint's station shape.
    #[serde(rename = "capacidad", default)]
    pub capacity: i64,
}

/// Response from `GET /estadisticas`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total_estaciones: u64,
    pub total_rutas: u64,
    pub total_lineas: u64,
    pub capacidad_total: u64,
}

/// Response from `GET /ruta-optima`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathDto {
    #[serde(rename = "camino", default)]
    pub stations: Vec<StationDto>,

    #[serde(rename = "tiempoTotal", default)]
    pub total_time: f64,

    #[serde(rename = "numeroEstaciones", default)]
    pub station_count: usize,
}

/// Response from `GET /flujo-maximo`.
#[derive(Debug, Clone, Deserialize)]
pub struct MaxFlowDto {
    #[serde(rename = "flujoMaximo")]
    pub max_flow: i64,

    #[serde(rename = "recomendacion", default)]
    pub recommendation: String,
}

/// One element of `GET /arm`.
#[derive(Debug, Clone, Deserialize)]
pub struct MstEdgeDto {
    #[serde(rename = "origenId")]
    pub origin_id: String,

    #[serde(rename = "destinoId")]
    pub destination_id: String,

    #[serde(rename = "tiempo")]
    pub time: f64,
}

/// Response from `GET /coloreado`.
#[derive(Debug, Clone, Deserialize)]
pub struct ColoringDto {
    /// Station name to color id.
    #[serde(rename = "asignacion", default)]
    pub assignments: HashMap<String, u32>,

    #[serde(rename = "coloresUsados")]
    pub colors_used: usize,

    #[serde(rename = "interpretacion", default)]
    pub interpretation: String,
}

/// Congestion level as named by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDto {
    #[serde(rename = "nombre")]
    pub name: String,

    pub color: String,
}

/// A bottleneck edge in a congestion analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct BottleneckDto {
    #[serde(rename = "origen")]
    pub origin: StationDto,

    #[serde(rename = "destino")]
    pub destination: StationDto,

    #[serde(rename = "porcentajeUso")]
    pub usage_pct: f64,

    #[serde(rename = "capacidadTotal", default)]
    pub capacity: i64,

    #[serde(rename = "flujoActual", default)]
    pub current_flow: i64,
}

/// Response from `GET /analisis-congestion`.
#[derive(Debug, Clone, Deserialize)]
pub struct CongestionDto {
    #[serde(rename = "flujoNormal")]
    pub normal_flow: i64,

    #[serde(rename = "flujoHoraPico")]
    pub peak_flow: i64,

    #[serde(rename = "porcentajeReduccion")]
    pub reduction_pct: f64,

    #[serde(rename = "nivel")]
    pub level: LevelDto,

    #[serde(rename = "recomendaciones", default)]
    pub recommendations: Vec<String>,

    #[serde(rename = "cuellosBotella", default)]
    pub bottlenecks: Vec<BottleneckDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_station() {
        let json = r#"{
            "id": "E001",
            "nombre": "Portal Norte",
            "tipo": "tm",
            "latitud": 4.7543,
            "longitud": -74.0462,
            "capacidad": 12000
        }"#;

        let station: StationDto = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, "E001");
        assert_eq!(station.name, "Portal Norte");
        assert_eq!(station.category, "tm");
        assert_eq!(station.capacity, 12000);
    }

    #[test]
    fn station_capacity_defaults_to_zero() {
        let json = r#"{"id":"E9","nombre":"Calle 26","tipo":"metro","latitud":4.6,"longitud":-74.1}"#;
        let station: StationDto = serde_json::from_str(json).unwrap();
        assert_eq!(station.capacity, 0);
    }

    #[test]
    fn deserialize_path() {
        let json = r#"{
            "origen": {"id": "A"},
            "camino": [
                {"id":"A","nombre":"A","tipo":"metro","latitud":4.60,"longitud":-74.08},
                {"id":"B","nombre":"B","tipo":"tm","latitud":4.61,"longitud":-74.07}
            ],
            "tiempoTotal": 12.5,
            "numeroEstaciones": 2
        }"#;

        let path: PathDto = serde_json::from_str(json).unwrap();
        assert_eq!(path.stations.len(), 2);
        assert_eq!(path.total_time, 12.5);
        assert_eq!(path.station_count, 2);
    }

    #[test]
    fn deserialize_congestion() {
        let json = r##"{
            "flujoNormal": 10000,
            "flujoHoraPico": 6000,
            "porcentajeReduccion": 40.0,
            "nivel": {"nombre": "Crítico", "color": "#991B1B"},
            "recomendaciones": ["a", "b"],
            "cuellosBotella": [{
                "origen": {"id":"A","nombre":"A","tipo":"metro","latitud":4.60,"longitud":-74.08},
                "destino": {"id":"B","nombre":"B","tipo":"tm","latitud":4.61,"longitud":-74.07},
                "capacidadTotal": 2000,
                "flujoActual": 1700,
                "porcentajeUso": 85.0
            }]
        }"##;

        let dto: CongestionDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.level.name, "Crítico");
        assert_eq!(dto.recommendations.len(), 2);
        assert_eq!(dto.bottlenecks.len(), 1);
        assert_eq!(dto.bottlenecks[0].usage_pct, 85.0);
        assert_eq!(dto.bottlenecks[0].destination.id, "B");
    }

    #[test]
    fn deserialize_coloring_and_mst() {
        let json = r#"{"asignacion":{"Portal Norte":0,"Calle 26":1},"coloresUsados":2,"interpretacion":"dos franjas"}"#;
        let coloring: ColoringDto = serde_json::from_str(json).unwrap();
        assert_eq!(coloring.assignments.len(), 2);
        assert_eq!(coloring.colors_used, 2);

        let json = r#"[{"origenId":"A","destinoId":"B","tiempo":4.5}]"#;
        let edges: Vec<MstEdgeDto> = serde_json::from_str(json).unwrap();
        assert_eq!(edges[0].origin_id, "A");
        assert_eq!(edges[0].time, 4.5);
    }

    #[test]
    fn missing_required_field_fails() {
        let json = r#"{"recomendacion": "Capacidad Alta"}"#;
        assert!(serde_json::from_str::<MaxFlowDto>(json).is_err());
    }
}
