use crate::core::aggregate::{reach_pct, Aggregation};
use crate::core::buffer::validate_radius;
use crate::core::error::Result;
use crate::models::{CoverageResult, EstimationMethod, Region};
use std::f64::consts::PI;

/// Area of one disk of `radius_m`, in km²
#[inline]
pub fn disk_area_km2(radius_m: f64) -> f64 {
    let radius_km = radius_m / 1000.0;
    PI * radius_km * radius_km
}

/// Estimate coverage of `points` disks of `radius_m` over a region
///
/// Covered area is additive (`points × π r²`): overlapping disks are counted
/// twice. Population assumes uniform density across the region.
pub fn estimate_coverage(points: usize, radius_m: f64, region: &Region) -> Result<CoverageResult> {
    validate_radius(radius_m)?;
    region.validate()?;

    if points == 0 {
        return Ok(CoverageResult::empty(EstimationMethod::UniformDensity));
    }

    let covered_area_km2 = points as f64 * disk_area_km2(radius_m);
    let population_covered = covered_area_km2 * region.density();

    Ok(CoverageResult {
        points,
        covered_area_km2,
        population_covered,
        reach_pct: reach_pct(population_covered, region.population),
        method: EstimationMethod::UniformDensity,
    })
}

/// Coverage from per-buffer populations (partition or fallback)
pub fn coverage_from_aggregation(aggregation: &Aggregation, region: &Region) -> CoverageResult {
    let population_covered = aggregation.total_population();

    CoverageResult {
        points: aggregation.per_buffer.len(),
        covered_area_km2: aggregation.total_area_km2(),
        population_covered,
        reach_pct: reach_pct(population_covered, region.population),
        method: aggregation.method,
    }
}
