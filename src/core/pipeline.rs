use crate::core::{
    aggregate::{aggregate_population, Aggregation},
    buffer::{create_buffers, display_buffers, validate_radius, DisplayBuffers, DEFAULT_SEGMENTS},
    coverage::{coverage_from_aggregation, disk_area_km2, estimate_coverage},
    error::Result,
    filters::{is_clean_bus_stop, within_region},
    geometry::{pois_to_geo, validate_poi},
    scoring::{rank_candidates, score_candidates},
};
use crate::models::{
    CoverageResult, PointOfInterest, PopulationZone, Region, ScoredCandidate, ScoringWeights,
    Site, SiteMetrics,
};

/// Caps and defaults for a pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineLimits {
    pub buffer_segments: usize,
    /// Buffers drawn on the map
    pub max_display_buffers: usize,
    /// Points entering the population computation
    pub max_analysis_points: usize,
    /// Bus stops per region entering the cross-region ranking
    pub max_sites_per_region: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            buffer_segments: DEFAULT_SEGMENTS,
            max_display_buffers: 30,
            max_analysis_points: 5000,
            max_sites_per_region: 100,
        }
    }
}

/// Result of analysing one region
#[derive(Debug, Clone)]
pub struct CoverageAnalysis {
    pub coverage: CoverageResult,
    /// Records received before any filtering
    pub received: usize,
    pub skipped_missing: usize,
    pub outside_region: usize,
    /// Points left out by the analysis cap
    pub sample_truncated: usize,
    pub display: DisplayBuffers,
    /// Per-buffer population, only when partition zones were supplied
    pub partition: Option<Aggregation>,
}

/// Coverage pipeline orchestrator
///
/// # Stages
/// 1. Coordinate validation, then region filter
/// 2. Geometry conversion (drops records without coordinates)
/// 3. Deterministic analysis cap (first N in input order)
/// 4. Coverage: partition aggregation, or the additive uniform-density estimate
/// 5. Display buffers, capped separately
#[derive(Debug, Clone)]
pub struct CoveragePipeline {
    limits: PipelineLimits,
    weights: ScoringWeights,
}

impl CoveragePipeline {
    pub fn new(limits: PipelineLimits, weights: ScoringWeights) -> Self {
        Self { limits, weights }
    }

    pub fn limits(&self) -> &PipelineLimits {
        &self.limits
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Estimate how much of `region` the given POIs reach within `radius_m`
    pub fn analyze(
        &self,
        region: &Region,
        pois: Vec<PointOfInterest>,
        radius_m: f64,
        zones: Option<&[PopulationZone]>,
    ) -> Result<CoverageAnalysis> {
        validate_radius(radius_m)?;
        region.validate()?;

        let received = pois.len();
        pois.iter().try_for_each(validate_poi)?;
        let in_region: Vec<PointOfInterest> = pois
            .into_iter()
            .filter(|p| within_region(p, &region.bbox))
            .collect();
        let outside_region = received - in_region.len();

        let mut conversion = pois_to_geo(in_region)?;
        let sample_truncated = conversion
            .points
            .len()
            .saturating_sub(self.limits.max_analysis_points);
        conversion.points.truncate(self.limits.max_analysis_points);

        if sample_truncated > 0 {
            tracing::warn!(
                "{}: analysis sample capped at {} points ({} left out)",
                region.name,
                self.limits.max_analysis_points,
                sample_truncated
            );
        }

        let points = &conversion.points;
        let (coverage, partition) = match zones {
            Some(zones) if !zones.is_empty() => {
                let buffers = create_buffers(points, radius_m, self.limits.buffer_segments)?;
                let aggregation = aggregate_population(&buffers, Some(zones), region)?;
                (coverage_from_aggregation(&aggregation, region), Some(aggregation))
            }
            _ => (estimate_coverage(points.len(), radius_m, region)?, None),
        };

        let display = display_buffers(
            points,
            radius_m,
            self.limits.buffer_segments,
            self.limits.max_display_buffers,
        )?;

        tracing::debug!(
            "{}: {} points, {:.3} km², reach {:.3}% ({:?})",
            region.name,
            coverage.points,
            coverage.covered_area_km2,
            coverage.reach_pct,
            coverage.method
        );

        Ok(CoverageAnalysis {
            coverage,
            received,
            skipped_missing: conversion.skipped_missing,
            outside_region,
            sample_truncated,
            display,
            partition,
        })
    }

    /// Rank bus stops across regions by the population their disk reaches
    ///
    /// Each clean bus stop gets `π r² × regional density` as its covered
    /// population; the first `max_sites_per_region` stops of each region
    /// compete. Returns the `top` best, highest score first.
    pub fn rank_bus_stops(
        &self,
        per_region: Vec<(Region, Vec<PointOfInterest>)>,
        radius_m: f64,
        top: usize,
    ) -> Result<Vec<ScoredCandidate<Site>>> {
        validate_radius(radius_m)?;
        let area_km2 = disk_area_km2(radius_m);

        let mut sites = Vec::new();
        for (region, pois) in per_region {
            region.validate()?;
            let population = (area_km2 * region.density()).floor();

            for poi in pois
                .into_iter()
                .filter(is_clean_bus_stop)
                .take(self.limits.max_sites_per_region)
            {
                validate_poi(&poi)?;
                sites.push(Site {
                    region: region.name.clone(),
                    label: poi.display_label("Ponto sem nome"),
                    poi,
                    metrics: SiteMetrics {
                        population_covered: Some(population),
                        ..SiteMetrics::default()
                    },
                });
            }
        }

        let mut scored = score_candidates(sites, &self.weights)?;
        rank_candidates(&mut scored);
        scored.truncate(top);
        Ok(scored)
    }
}

impl Default for CoveragePipeline {
    fn default() -> Self {
        Self::new(PipelineLimits::default(), ScoringWeights::default())
    }
}
