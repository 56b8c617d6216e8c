use crate::core::pipeline::CoverageAnalysis;
use crate::models::domain::{
    BoundingBox, Buffer, CoverageResult, EstimationMethod, ScoredCandidate, Site, SiteMetrics,
};
use crate::models::region::Region;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cachedQueries")]
    pub cached_queries: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Region reference data as listed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub population: u64,
    #[serde(rename = "areaKm2")]
    pub area_km2: f64,
    #[serde(rename = "densityPerKm2")]
    pub density_per_km2: f64,
    pub bbox: BoundingBox,
    pub centre: Option<[f64; 2]>,
}

impl From<&Region> for RegionSummary {
    fn from(region: &Region) -> Self {
        Self {
            name: region.name.clone(),
            population: region.population,
            area_km2: region.area_km2,
            density_per_km2: region.density(),
            bbox: region.bbox,
            centre: region.centre,
        }
    }
}

/// Response for the coverage endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub region: String,
    #[serde(rename = "radiusM")]
    pub radius_m: f64,
    pub coverage: CoverageResult,
    pub received: usize,
    #[serde(rename = "skippedMissing")]
    pub skipped_missing: usize,
    #[serde(rename = "outsideRegion")]
    pub outside_region: usize,
    #[serde(rename = "sampleTruncated")]
    pub sample_truncated: usize,
    /// Data came from the synthetic fallback, not the POI service
    pub synthetic: bool,
    /// Caveats to show next to the figures
    pub notes: Vec<String>,
    /// Display buffers as a GeoJSON FeatureCollection
    pub buffers: Value,
    #[serde(rename = "buffersTruncated")]
    pub buffers_truncated: usize,
}

impl CoverageResponse {
    pub fn new(region: &Region, radius_m: f64, analysis: CoverageAnalysis, synthetic: bool) -> Self {
        let notes = approximation_notes(&analysis, synthetic);
        Self {
            region: region.name.clone(),
            radius_m,
            coverage: analysis.coverage,
            received: analysis.received,
            skipped_missing: analysis.skipped_missing,
            outside_region: analysis.outside_region,
            sample_truncated: analysis.sample_truncated,
            synthetic,
            notes,
            buffers: buffers_feature_collection(&analysis.display.buffers),
            buffers_truncated: analysis.display.truncated,
        }
    }
}

/// Human readable caveats for an analysis
pub fn approximation_notes(analysis: &CoverageAnalysis, synthetic: bool) -> Vec<String> {
    let mut notes = Vec::new();

    if analysis.coverage.method == EstimationMethod::UniformDensity && analysis.coverage.points > 0 {
        notes.push(
            "Estimated with uniform population density: overestimates sparse areas and \
             underestimates dense cores"
                .to_string(),
        );
        notes.push("Covered area is additive: overlapping buffers are counted more than once".to_string());
    }
    if analysis.sample_truncated > 0 {
        notes.push(format!(
            "Sample truncated: {} points left out of the calculation",
            analysis.sample_truncated
        ));
    }
    if analysis.display.truncated > 0 {
        notes.push(format!(
            "Showing {} buffers, {} not drawn",
            analysis.display.buffers.len(),
            analysis.display.truncated
        ));
    }
    if synthetic {
        notes.push("POI service unavailable: synthetic sample points used".to_string());
    }

    notes
}

/// Response for the map buffers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffersResponse {
    pub total: usize,
    pub truncated: usize,
    pub synthetic: bool,
    pub buffers: Value,
}

/// Response for the scoring endpoint, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub scored: Vec<ScoredCandidate<SiteMetrics>>,
}

/// Response for the bus stop ranking endpoint, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    #[serde(rename = "radiusM")]
    pub radius_m: f64,
    pub sites: Vec<ScoredCandidate<Site>>,
    #[serde(rename = "syntheticRegions")]
    pub synthetic_regions: Vec<String>,
}

/// GeoJSON FeatureCollection of buffer polygons (`[lon, lat]` positions)
pub fn buffers_feature_collection(buffers: &[Buffer]) -> Value {
    let features: Vec<Value> = buffers
        .iter()
        .map(|b| {
            let ring: Vec<[f64; 2]> = b.polygon.exterior().coords().map(|c| [c.x, c.y]).collect();
            json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [ring] },
                "properties": {
                    "id": b.poi_id.to_string(),
                    "radius_m": b.radius_m,
                    "area_km2": b.area_km2(),
                }
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DisplayBuffers;
    use crate::models::domain::PoiId;
    use geo::polygon;

    fn analysis(points: usize, sample_truncated: usize) -> CoverageAnalysis {
        CoverageAnalysis {
            coverage: CoverageResult {
                points,
                covered_area_km2: 0.0,
                population_covered: 0.0,
                reach_pct: 0.0,
                method: EstimationMethod::UniformDensity,
            },
            received: points,
            skipped_missing: 0,
            outside_region: 0,
            sample_truncated,
            display: DisplayBuffers::default(),
            partition: None,
        }
    }

    #[test]
    fn test_notes_label_approximations() {
        let notes = approximation_notes(&analysis(10, 3), true);
        assert_eq!(notes.len(), 4);
        assert!(notes[0].contains("uniform population density"));
        assert!(notes.iter().any(|n| n.contains("3 points")));
        assert!(notes.iter().any(|n| n.contains("synthetic")));
    }

    #[test]
    fn test_no_notes_for_empty_result() {
        assert!(approximation_notes(&analysis(0, 0), false).is_empty());
    }

    #[test]
    fn test_feature_collection_shape() {
        let buffer = Buffer {
            poi_id: PoiId::Int(7),
            radius_m: 150.0,
            polygon: polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            planar_area_m2: 2_000_000.0,
        };

        let fc = buffers_feature_collection(&[buffer]);
        assert_eq!(fc["type"], "FeatureCollection");
        let feature = &fc["features"][0];
        assert_eq!(feature["properties"]["id"], "7");
        assert_eq!(feature["properties"]["area_km2"], 2.0);
        assert_eq!(feature["geometry"]["coordinates"][0][0], json!([0.0, 0.0]));
        // closed ring
        assert_eq!(feature["geometry"]["coordinates"][0][3], json!([0.0, 0.0]));
    }
}
