//! Route visualization pipeline.

mod pipeline;

pub use pipeline::{
    FIT_PADDING, PipelineError, RouteEnrichmentPipeline, RouteGeometry, SegmentGeometry, draw,
};
