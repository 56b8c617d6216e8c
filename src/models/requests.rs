use crate::core::error::CoverageError;
use crate::core::filters::PoiKind;
use crate::core::geometry::validate_coordinate;
use crate::models::domain::{PopulationZone, ScoringWeights, SiteMetrics};
use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_kinds() -> Vec<PoiKind> {
    vec![PoiKind::BusStop]
}

fn default_search_radius_km() -> f64 {
    // 0.01° of latitude each way around the clicked point
    1.11
}

fn default_map_radius_m() -> f64 {
    500.0
}

fn default_rank_radius_m() -> f64 {
    150.0
}

fn default_top() -> usize {
    20
}

/// Request to estimate coverage of a region
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CoverageRequest {
    #[validate(length(min = 1))]
    pub region: String,
    /// Falls back to the configured default radius
    #[serde(rename = "radiusM", alias = "radius_m", default)]
    #[validate(range(min = 1.0, max = 5000.0))]
    pub radius_m: Option<f64>,
    #[serde(default = "default_kinds")]
    pub kinds: Vec<PoiKind>,
    /// Optional population partition; without it the uniform-density estimate is used
    #[serde(default)]
    pub zones: Option<Vec<ZoneInput>>,
}

/// Partition zone as sent over the wire; `ring` holds `[lon, lat]` pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneInput {
    #[serde(default)]
    pub name: Option<String>,
    pub population: u64,
    pub ring: Vec<[f64; 2]>,
}

impl ZoneInput {
    pub fn to_zone(&self) -> Result<PopulationZone, CoverageError> {
        let label = self.name.clone().unwrap_or_else(|| "unnamed".to_string());
        if self.ring.len() < 3 {
            return Err(CoverageError::InvalidZone {
                name: label,
                reason: format!("ring needs at least 3 vertices, got {}", self.ring.len()),
            });
        }

        let coords = self
            .ring
            .iter()
            .map(|&[lon, lat]| validate_coordinate(lat, lon).map(|_| Coord { x: lon, y: lat }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PopulationZone {
            name: self.name.clone(),
            polygon: Polygon::new(LineString::from(coords), vec![]),
            population: self.population,
        })
    }
}

/// Request for display buffers around a clicked map position
///
/// `lat`/`lon` are checked by geometry conversion rather than here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BuffersRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "searchRadiusKm", alias = "search_radius_km", default = "default_search_radius_km")]
    #[validate(range(min = 0.1, max = 10.0))]
    pub search_radius_km: f64,
    #[serde(rename = "radiusM", alias = "radius_m", default = "default_map_radius_m")]
    #[validate(range(min = 1.0, max = 5000.0))]
    pub radius_m: f64,
    #[serde(default)]
    pub kinds: Vec<PoiKind>,
}

/// Request to score arbitrary candidates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(length(max = 10000))]
    pub candidates: Vec<SiteMetrics>,
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

/// Request to rank bus stops across regions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(rename = "radiusM", alias = "radius_m", default = "default_rank_radius_m")]
    #[validate(range(min = 1.0, max = 5000.0))]
    pub radius_m: f64,
    #[serde(default = "default_top")]
    #[validate(range(min = 1, max = 100))]
    pub top: usize,
    /// Defaults to every configured region
    #[serde(default)]
    pub regions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_request_defaults() {
        let req: CoverageRequest = serde_json::from_str(r#"{"region": "Centro"}"#).unwrap();
        assert_eq!(req.radius_m, None);
        assert_eq!(req.kinds, vec![PoiKind::BusStop]);
        assert!(req.zones.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_coverage_request_validation() {
        let req: CoverageRequest =
            serde_json::from_str(r#"{"region": "", "radiusM": 0.5, "kinds": ["billboard"]}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("region"));
        assert!(fields.contains_key("radius_m"));
    }

    #[test]
    fn test_zone_input_conversion() {
        let zone = ZoneInput {
            name: Some("tract".into()),
            population: 500,
            ring: vec![[-46.7, -23.7], [-46.6, -23.7], [-46.6, -23.6]],
        };
        let converted = zone.to_zone().unwrap();
        assert_eq!(converted.population, 500);
        assert_eq!(converted.polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_zone_input_rejects_bad_rings() {
        let short = ZoneInput {
            name: None,
            population: 1,
            ring: vec![[0.0, 0.0], [1.0, 1.0]],
        };
        assert!(matches!(short.to_zone(), Err(CoverageError::InvalidZone { .. })));

        let swapped = ZoneInput {
            name: None,
            population: 1,
            ring: vec![[-23.7, -46.7], [-23.6, -146.7], [-23.6, -46.6]],
        };
        assert!(matches!(
            swapped.to_zone(),
            Err(CoverageError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_rank_request_defaults() {
        let req: RankRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.radius_m, 150.0);
        assert_eq!(req.top, 20);
        assert!(req.validate().is_ok());
    }
}
