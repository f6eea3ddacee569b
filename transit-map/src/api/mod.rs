//! Transit analysis backend client.
//!
//! This module provides an HTTP client for the read-only JSON API that
//! serves stations, statistics and the results of the remote graph
//! computations (shortest path, max flow, minimum network, coloring,
//! congestion).
//!
//! Key characteristics of the backend:
//! - Wire field names are Spanish (`nombre`, `tipo`, `camino`, ...)
//! - Failures come back as non-success statuses with `{"error": "..."}`
//! - A disconnected origin/destination pair is an empty `camino`, not an error

mod client;
mod convert;
mod error;
mod types;

pub use client::{ApiConfig, HttpTransitApi, StationScope, TransitApi};
pub use convert::ConversionError;
pub use error::{ApiError, ErrorKind};
pub use types::{
    BottleneckDto, ColoringDto, CongestionDto, LevelDto, MaxFlowDto, MstEdgeDto, PathDto,
    StationDto, StatsDto,
};
