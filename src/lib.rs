//! OOH Coverage - reach estimation for out-of-home advertising sites
//!
//! This library turns point-of-interest records (bus stops, billboards) into
//! metric buffers, estimates the population those buffers reach within a
//! region, and ranks candidate sites by a weighted score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{estimate_coverage, CoverageError, CoveragePipeline, PipelineLimits};
pub use crate::models::{
    CoverageResult, PointOfInterest, PopulationZone, Region, RegionCatalog, ScoringWeights,
};
