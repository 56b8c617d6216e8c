use geo::{Point, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a point of interest, unique within one fetch batch
///
/// Overpass hands out numeric ids; hand-made or synthetic records may use
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoiId {
    Int(i64),
    Str(String),
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiId::Int(id) => write!(f, "{}", id),
            PoiId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PoiId {
    fn from(id: i64) -> Self {
        PoiId::Int(id)
    }
}

impl From<i32> for PoiId {
    fn from(id: i32) -> Self {
        PoiId::Int(i64::from(id))
    }
}

impl From<&str> for PoiId {
    fn from(id: &str) -> Self {
        PoiId::Str(id.to_string())
    }
}

/// Point of interest as returned by the POI fetch service
///
/// Coordinates are optional because upstream records can lack them; such
/// records are dropped during geometry conversion, never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: BTreeMap<String, Option<String>>,
}

impl PointOfInterest {
    pub fn new(id: impl Into<PoiId>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat: Some(lat),
            lon: Some(lon),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), Some(value.to_string()));
        self
    }

    /// Present, non-blank tag value
    ///
    /// Absent keys, explicit nulls and blank strings all come back as `None`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Human readable label: `name`, or `name, street` when a street is known
    pub fn display_label(&self, fallback: &str) -> String {
        let name = self.tag("name").unwrap_or(fallback);
        match self.tag("addr:street") {
            Some(street) => format!("{}, {}", name, street),
            None => name.to_string(),
        }
    }
}

/// A point of interest with its WGS84 point geometry (x = lon, y = lat)
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoi {
    pub poi: PointOfInterest,
    pub point: Point<f64>,
}

impl GeoPoi {
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }
}

/// Disk of `radius_m` around a point, stored in WGS84
///
/// `planar_area_m2` is measured in the metric projection the disk was built
/// in. Area math must use it rather than the geographic polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub poi_id: PoiId,
    pub radius_m: f64,
    pub polygon: Polygon<f64>,
    pub planar_area_m2: f64,
}

impl Buffer {
    pub fn area_km2(&self) -> f64 {
        self.planar_area_m2 / 1_000_000.0
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// `south,west,north,east` as used by Overpass QL
    pub fn to_overpass(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Population-bearing partition cell (census tract or similar)
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationZone {
    pub name: Option<String>,
    pub polygon: Polygon<f64>,
    pub population: u64,
}

/// How a population figure was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Buffer area times regional density. Assumes population is spread
    /// evenly over the region.
    UniformDensity,
    /// Summed over partition zones intersecting each buffer
    Partition,
}

impl EstimationMethod {
    pub fn is_approximation(&self) -> bool {
        matches!(self, EstimationMethod::UniformDensity)
    }
}

/// Population attributed to a single buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BufferPopulation {
    pub poi_id: PoiId,
    pub area_km2: f64,
    pub population: f64,
}

/// Aggregate coverage of a set of points over a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub points: usize,
    #[serde(rename = "coveredAreaKm2")]
    pub covered_area_km2: f64,
    #[serde(rename = "populationCovered")]
    pub population_covered: f64,
    #[serde(rename = "reachPct")]
    pub reach_pct: f64,
    pub method: EstimationMethod,
}

impl CoverageResult {
    pub fn empty(method: EstimationMethod) -> Self {
        Self {
            points: 0,
            covered_area_km2: 0.0,
            population_covered: 0.0,
            reach_pct: 0.0,
            method,
        }
    }
}

/// Site attributes fed to the scorer; `None` contributes nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMetrics {
    #[serde(rename = "populationCovered", default)]
    pub population_covered: Option<f64>,
    #[serde(rename = "trafficCount", default)]
    pub traffic_count: Option<f64>,
    #[serde(rename = "incomePerCapita", default)]
    pub income_per_capita: Option<f64>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub population: f64,
    pub traffic: f64,
    pub income: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            population: 0.5,
            traffic: 0.3,
            income: 0.2,
        }
    }
}

/// A candidate with its score relative to the set it was ranked in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate<T> {
    pub candidate: T,
    /// Position in the scored input, used as the tie-breaker
    pub index: usize,
    #[serde(rename = "rawScore")]
    pub raw_score: f64,
    pub score: f64,
}

/// Bus stop (or other site) considered in the cross-region ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub region: String,
    pub poi: PointOfInterest,
    pub label: String,
    pub metrics: SiteMetrics,
}
