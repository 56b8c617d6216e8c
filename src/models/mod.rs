// Model exports
pub mod domain;
pub mod region;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Buffer, BufferPopulation, CoverageResult, EstimationMethod, GeoPoi, PoiId,
    PointOfInterest, PopulationZone, ScoredCandidate, ScoringWeights, Site, SiteMetrics,
};
pub use region::{Region, RegionCatalog, RegionFileError};
pub use requests::{BuffersRequest, CoverageRequest, RankRequest, ScoreRequest, ZoneInput};
pub use responses::{
    buffers_feature_collection, BuffersResponse, CoverageResponse, ErrorResponse,
    HealthResponse, RankResponse, RegionSummary, ScoreResponse,
};
