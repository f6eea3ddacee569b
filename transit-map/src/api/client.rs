//! Analysis backend HTTP client.
//!
//! Provides async methods for the read-only JSON endpoints of the transit
//! analysis service and conversion to domain types.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{
    ColoringResult, CongestionResult, MaxFlowResult, MstEdge, NetworkStats, PathResult, Station,
    StationId,
};

use super::convert::{
    convert_coloring, convert_congestion, convert_max_flow, convert_mst_edges, convert_path,
    convert_station_list, convert_stats,
};
use super::error::ApiError;
use super::types::{
    ColoringDto, CongestionDto, MaxFlowDto, MstEdgeDto, PathDto, StationDto, StatsDto,
};

/// Default base URL for the analysis backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// How much of an undecodable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Which station listing to load at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationScope {
    /// `GET /estaciones`
    #[default]
    All,
    /// `GET /estaciones/principales`
    Principal,
}

impl StationScope {
    fn path(self) -> &'static str {
        match self {
            StationScope::All => "/estaciones",
            StationScope::Principal => "/estaciones/principales",
        }
    }
}

/// The analysis backend as seen by the map.
///
/// This abstraction allows the controller to be tested with stub data.
pub trait TransitApi {
    /// `GET /estadisticas`
    fn statistics(&self) -> impl Future<Output = Result<NetworkStats, ApiError>>;

    /// `GET /estaciones` or `GET /estaciones/principales`
    fn stations(&self, scope: StationScope)
    -> impl Future<Output = Result<Vec<Station>, ApiError>>;

    /// `GET /estaciones/buscar?q=&limit=`
    fn search_stations(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Station>, ApiError>>;

    /// `GET /ruta-optima?origenId=&destinoId=`
    fn shortest_path(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> impl Future<Output = Result<PathResult, ApiError>>;

    /// `GET /flujo-maximo?origenId=&destinoId=`
    fn max_flow(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> impl Future<Output = Result<MaxFlowResult, ApiError>>;

    /// `GET /arm`
    fn minimum_network(&self) -> impl Future<Output = Result<Vec<MstEdge>, ApiError>>;

    /// `GET /coloreado`
    fn coloring(&self) -> impl Future<Output = Result<ColoringResult, ApiError>>;

    /// `GET /analisis-congestion?origenId=&destinoId=`
    fn congestion(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> impl Future<Output = Result<CongestionResult, ApiError>>;
}

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the API prefix, e.g. `http://host:8080/api`
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// reqwest-backed [`TransitApi`].
///
/// Uses a semaphore to cap concurrent requests so a burst of user actions
/// cannot flood the backend.
#[derive(Debug, Clone)]
pub struct HttpTransitApi {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpTransitApi {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Status {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "backend request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        decode(&body)
    }
}

/// Decode a JSON body, keeping a snippet of it on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
    })
}

/// The backend reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string())
}

fn pair_query(origin: &StationId, destination: &StationId) -> [(&'static str, String); 2] {
    [
        ("origenId", origin.as_str().to_string()),
        ("destinoId", destination.as_str().to_string()),
    ]
}

impl TransitApi for HttpTransitApi {
    async fn statistics(&self) -> Result<NetworkStats, ApiError> {
        let dto: StatsDto = self.get_json("/estadisticas", &[]).await?;
        Ok(convert_stats(&dto))
    }

    async fn stations(&self, scope: StationScope) -> Result<Vec<Station>, ApiError> {
        let dtos: Vec<StationDto> = self.get_json(scope.path(), &[]).await?;
        Ok(convert_station_list(&dtos))
    }

    async fn search_stations(&self, query: &str, limit: usize) -> Result<Vec<Station>, ApiError> {
        let dtos: Vec<StationDto> = self
            .get_json(
                "/estaciones/buscar",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(convert_station_list(&dtos))
    }

    async fn shortest_path(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> Result<PathResult, ApiError> {
        let dto: PathDto = self
            .get_json("/ruta-optima", &pair_query(origin, destination))
            .await?;
        Ok(convert_path(&dto)?)
    }

    async fn max_flow(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> Result<MaxFlowResult, ApiError> {
        let dto: MaxFlowDto = self
            .get_json("/flujo-maximo", &pair_query(origin, destination))
            .await?;
        Ok(convert_max_flow(&dto))
    }

    async fn minimum_network(&self) -> Result<Vec<MstEdge>, ApiError> {
        let dtos: Vec<MstEdgeDto> = self.get_json("/arm", &[]).await?;
        Ok(convert_mst_edges(&dtos))
    }

    async fn coloring(&self) -> Result<ColoringResult, ApiError> {
        let dto: ColoringDto = self.get_json("/coloreado", &[]).await?;
        Ok(convert_coloring(&dto))
    }

    async fn congestion(
        &self,
        origin: &StationId,
        destination: &StationId,
    ) -> Result<CongestionResult, ApiError> {
        let dto: CongestionDto = self
            .get_json("/analisis-congestion", &pair_query(origin, destination))
            .await?;
        Ok(convert_congestion(&dto)?)
    }
}
