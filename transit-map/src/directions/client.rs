//! OSRM-compatible routing client.

use std::future::Future;

use serde::Deserialize;

use crate::domain::LatLng;

use super::error::DirectionsError;

/// Default public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "driving";

/// A driving-directions service.
///
/// Given an ordered pair of coordinates, returns the road-following geometry
/// between them, endpoints included.
pub trait Directions {
    fn route(
        &self,
        from: LatLng,
        to: LatLng,
    ) -> impl Future<Output = Result<Vec<LatLng>, DirectionsError>>;
}

/// Directions provider that never answers.
///
/// Used when no routing service is configured; every segment falls back to a
/// straight line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirections;

impl Directions for NoDirections {
    async fn route(&self, _from: LatLng, _to: LatLng) -> Result<Vec<LatLng>, DirectionsError> {
        Err(DirectionsError::NotConfigured)
    }
}

/// OSRM `route` response. Only the fields we draw are decoded.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

/// GeoJSON line string: coordinates are `[lon, lat]`.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Base URL of the OSRM-compatible service
    pub base_url: String,
    /// Routing profile (`driving`, `bike`, ...)
    pub profile: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// reqwest-backed OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmDirections {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmDirections {
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
        })
    }

    fn route_url(&self, from: LatLng, to: LatLng) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url, self.profile, from.lon, from.lat, to.lon, to.lat
        )
    }
}

impl Directions for OsrmDirections {
    async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, DirectionsError> {
        let response = self
            .http
            .get(self.route_url(from, to))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OSRM reports NoRoute with a 400 and a JSON body
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(DirectionsError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_route(&body)
    }
}

/// Extract the first route's geometry from an OSRM response body.
pub(crate) fn parse_route(body: &str) -> Result<Vec<LatLng>, DirectionsError> {
    let response: OsrmResponse =
        serde_json::from_str(body).map_err(|e| DirectionsError::Json {
            message: e.to_string(),
        })?;

    if response.code != "Ok" {
        return Err(DirectionsError::NoRoute {
            code: response.code,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| DirectionsError::NoRoute {
            code: "empty routes".to_string(),
        })?;

    if route.geometry.coordinates.len() < 2 {
        return Err(DirectionsError::NoRoute {
            code: "degenerate geometry".to_string(),
        });
    }

    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lon, lat]| LatLng::new(lat, lon))
        .collect())
}
