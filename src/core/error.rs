use thiserror::Error;

/// Errors raised by the coverage pipeline
///
/// Every variant is raised at the point of detection. Nothing in the core
/// turns a bad value into NaN, zero or null and keeps going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoverageError {
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid buffer radius: {0} m (must be positive)")]
    InvalidRadius(f64),

    #[error("Invalid polygon approximation: {0} segments (minimum 16)")]
    InvalidSegments(usize),

    #[error("Invalid region {name}: {reason}")]
    InvalidRegion { name: String, reason: String },

    #[error("Invalid population zone {name}: {reason}")]
    InvalidZone { name: String, reason: String },

    #[error("Invalid attribute {attribute} on candidate {index}: {value}")]
    InvalidAttribute {
        index: usize,
        attribute: &'static str,
        value: f64,
    },

    #[error("Invalid scoring weight {attribute}: {value}")]
    InvalidWeight { attribute: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, CoverageError>;
