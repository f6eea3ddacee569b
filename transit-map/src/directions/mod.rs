//! Driving-directions routing collaborator.
//!
//! The route pipeline asks this service for a road-following geometry
//! between consecutive path stations. It is best-effort: any failure is
//! absorbed by the pipeline, which draws a straight line instead.

mod cache;
mod client;
mod error;

pub use cache::{CacheConfig, CachedDirections, SegmentKey};
pub use client::{Directions, DirectionsConfig, NoDirections, OsrmDirections};
pub use error::DirectionsError;
