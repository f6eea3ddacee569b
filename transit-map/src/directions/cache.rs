//! Caching layer for routing responses.
//!
//! Redrawing a path (or drawing a path that shares segments with an earlier
//! one) would otherwise re-query the routing service for every segment.
//! Successful geometries are cached per coordinate pair; failures are not,
//! so a flaky segment gets another chance on the next draw.
//!
//! Coordinates are quantized to micro-degrees (about 0.1 m) to form the key.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::LatLng;

use super::client::Directions;
use super::error::DirectionsError;

/// Cache key: (from.lat, from.lon, to.lat, to.lon) in micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey([i64; 4]);

impl SegmentKey {
    pub fn new(from: LatLng, to: LatLng) -> Self {
        SegmentKey([
            quantize(from.lat),
            quantize(from.lon),
            quantize(to.lat),
            quantize(to.lon),
        ])
    }
}

fn quantize(degrees: f64) -> i64 {
    (degrees * 1_000_000.0).round() as i64
}

/// Cached segment geometry.
type SegmentEntry = Arc<Vec<LatLng>>;

/// Configuration for the segment cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached segments.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Directions provider with caching.
///
/// Wraps any [`Directions`] and caches successful segment geometries.
pub struct CachedDirections<D> {
    inner: D,
    segments: MokaCache<SegmentKey, SegmentEntry>,
}

impl<D: Directions> CachedDirections<D> {
    pub fn new(inner: D, config: &CacheConfig) -> Self {
        let segments = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, segments }
    }

    /// Access the underlying provider for lookups that bypass the cache.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.segments.entry_count()
    }
}

impl<D: Directions> Directions for CachedDirections<D> {
    async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, DirectionsError> {
        let key = SegmentKey::new(from, to);

        if let Some(cached) = self.segments.get(&key).await {
            trace!(?key, "segment cache hit");
            return Ok(cached.as_ref().clone());
        }

        let points = self.inner.route(from, to).await?;
        self.segments.insert(key, Arc::new(points.clone())).await;

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Counts calls; fails every lookup when `fail` is set.
    #[derive(Default)]
    struct CountingDirections {
        calls: Mutex<usize>,
        fail: bool,
    }

    impl Directions for CountingDirections {
        async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, DirectionsError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(DirectionsError::NoRoute {
                    code: "NoRoute".into(),
                });
            }
            Ok(vec![from, LatLng::new((from.lat + to.lat) / 2.0, from.lon), to])
        }
    }

    #[test]
    fn key_quantizes_coordinates() {
        let a = SegmentKey::new(LatLng::new(4.6000001, -74.1), LatLng::new(4.7, -74.0));
        let b = SegmentKey::new(LatLng::new(4.6000004, -74.1), LatLng::new(4.7, -74.0));
        let c = SegmentKey::new(LatLng::new(4.7, -74.0), LatLng::new(4.6, -74.1));
        assert_eq!(a, b);
        assert_ne!(a, c, "direction matters");
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn second_lookup_hits_cache() {
        let cached = CachedDirections::new(CountingDirections::default(), &CacheConfig::default());
        let from = LatLng::new(4.6, -74.1);
        let to = LatLng::new(4.7, -74.0);

        let first = cached.route(from, to).await.unwrap();
        let second = cached.route(from, to).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(*cached.inner().calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = CountingDirections {
            calls: Mutex::new(0),
            fail: true,
        };
        let cached = CachedDirections::new(inner, &CacheConfig::default());
        let from = LatLng::new(4.6, -74.1);
        let to = LatLng::new(4.7, -74.0);

        assert!(cached.route(from, to).await.is_err());
        assert!(cached.route(from, to).await.is_err());
        assert_eq!(*cached.inner().calls.lock().unwrap(), 2);
    }
}
