use crate::core::error::CoverageError;
use crate::models::domain::BoundingBox;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a region catalogue file
#[derive(Debug, Error)]
pub enum RegionFileError {
    #[error("Failed to read region file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse region file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] CoverageError),
}

/// Named area with static population reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub population: u64,
    #[serde(rename = "areaKm2", alias = "area_km2")]
    pub area_km2: f64,
    pub bbox: BoundingBox,
    /// Map centre as `[lat, lon]`
    #[serde(default)]
    pub centre: Option<[f64; 2]>,
}

impl Region {
    pub fn new(name: &str, population: u64, area_km2: f64, bbox: BoundingBox) -> Self {
        Self {
            name: name.to_string(),
            population,
            area_km2,
            bbox,
            centre: None,
        }
    }

    fn with_centre(mut self, lat: f64, lon: f64) -> Self {
        self.centre = Some([lat, lon]);
        self
    }

    /// Inhabitants per km²
    pub fn density(&self) -> f64 {
        self.population as f64 / self.area_km2
    }

    pub fn validate(&self) -> Result<(), CoverageError> {
        if !self.area_km2.is_finite() || self.area_km2 <= 0.0 {
            return Err(CoverageError::InvalidRegion {
                name: self.name.clone(),
                reason: format!("area must be positive, got {} km²", self.area_km2),
            });
        }

        let b = &self.bbox;
        if b.min_lat > b.max_lat || b.min_lon > b.max_lon {
            return Err(CoverageError::InvalidRegion {
                name: self.name.clone(),
                reason: "bounding box minimum exceeds maximum".to_string(),
            });
        }

        Ok(())
    }
}

/// Region reference data, read-only after load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub regions: Vec<Region>,
}

impl RegionCatalog {
    /// São Paulo city zones plus ABC and neighbouring municipalities
    pub fn sao_paulo() -> Self {
        let r = |name, pop, area, min_lat, min_lon, max_lat, max_lon, c_lat, c_lon| {
            Region::new(name, pop, area, BoundingBox::new(min_lat, min_lon, max_lat, max_lon))
                .with_centre(c_lat, c_lon)
        };

        Self {
            regions: vec![
                r("Toda São Paulo", 12_399_294, 1521.0, -23.8, -46.9, -23.3, -46.3, -23.55, -46.63),
                r("Zona Sul", 2_800_000, 240.0, -23.75, -46.75, -23.60, -46.60, -23.675, -46.675),
                r("Centro", 1_200_000, 50.0, -23.57, -46.68, -23.52, -46.62, -23.545, -46.65),
                r("Zona Norte", 2_500_000, 220.0, -23.45, -46.70, -23.35, -46.55, -23.40, -46.625),
                r("Zona Leste", 3_200_000, 280.0, -23.65, -46.55, -23.45, -46.35, -23.55, -46.45),
                r("Zona Oeste", 2_000_000, 180.0, -23.65, -46.80, -23.45, -46.65, -23.55, -46.725),
                r("Santo André", 748_000, 175.0, -23.72, -46.58, -23.62, -46.48, -23.67, -46.53),
                r("São Bernardo do Campo", 849_000, 409.0, -23.80, -46.62, -23.65, -46.50, -23.725, -46.56),
                r("Osasco", 728_000, 65.0, -23.58, -46.82, -23.50, -46.75, -23.54, -46.785),
                r("Cotia", 270_000, 324.0, -23.68, -46.90, -23.55, -46.80, -23.615, -46.85),
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RegionFileError> {
        let catalog: RegionCatalog = toml::from_str(raw)?;
        for region in &catalog.regions {
            region.validate()?;
        }
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegionFileError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::sao_paulo()
    }
}
