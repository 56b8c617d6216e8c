// Coverage pipeline
pub mod aggregate;
pub mod buffer;
pub mod coverage;
pub mod distance;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod pipeline;
pub mod projection;
pub mod scoring;

pub use aggregate::{aggregate_population, reach_pct, Aggregation};
pub use buffer::{create_buffer, create_buffers, display_buffers, DisplayBuffers};
pub use coverage::{coverage_from_aggregation, estimate_coverage};
pub use distance::{haversine_distance, is_within_bounding_box, search_bbox};
pub use error::CoverageError;
pub use filters::{is_clean_bus_stop, matches_kinds, tags_for_kinds, PoiKind};
pub use geometry::{geo_to_lat_lon, pois_to_geo, validate_poi, Conversion};
pub use pipeline::{CoverageAnalysis, CoveragePipeline, PipelineLimits};
pub use scoring::{rank_candidates, score_candidates, Scorable};
