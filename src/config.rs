use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::pipeline::PipelineLimits;
use crate::models::ScoringWeights;

/// Application configuration
///
/// Every section has defaults, so the service starts without any config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub overpass: OverpassSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub coverage: CoverageSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// TOML file replacing the built-in region catalogue
    #[serde(default)]
    pub regions_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassSettings {
    #[serde(default = "default_overpass_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_overpass_timeout")]
    pub timeout_secs: u64,
    /// `key=value` filters used when a request names no POI kind
    #[serde(default = "default_overpass_tags")]
    pub default_tags: Vec<String>,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoint: default_overpass_endpoint(),
            timeout_secs: default_overpass_timeout(),
            default_tags: default_overpass_tags(),
        }
    }
}

fn default_overpass_endpoint() -> String { "https://overpass-api.de/api/interpreter".to_string() }
fn default_overpass_timeout() -> u64 { 60 }
fn default_overpass_tags() -> Vec<String> {
    vec!["highway=bus_stop".to_string(), "advertising=billboard".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_entries() -> u64 { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct CoverageSettings {
    #[serde(default = "default_radius")]
    pub default_radius_m: f64,
    #[serde(default = "default_segments")]
    pub buffer_segments: usize,
    #[serde(default = "default_display_buffers")]
    pub max_display_buffers: usize,
    #[serde(default = "default_analysis_points")]
    pub max_analysis_points: usize,
    #[serde(default = "default_sites_per_region")]
    pub max_sites_per_region: usize,
    /// Points generated per region when the POI service is unavailable
    #[serde(default = "default_synthetic_sample")]
    pub synthetic_sample_size: usize,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            default_radius_m: default_radius(),
            buffer_segments: default_segments(),
            max_display_buffers: default_display_buffers(),
            max_analysis_points: default_analysis_points(),
            max_sites_per_region: default_sites_per_region(),
            synthetic_sample_size: default_synthetic_sample(),
        }
    }
}

impl CoverageSettings {
    pub fn limits(&self) -> PipelineLimits {
        PipelineLimits {
            buffer_segments: self.buffer_segments,
            max_display_buffers: self.max_display_buffers,
            max_analysis_points: self.max_analysis_points,
            max_sites_per_region: self.max_sites_per_region,
        }
    }
}

fn default_radius() -> f64 { 500.0 }
fn default_segments() -> usize { crate::core::buffer::DEFAULT_SEGMENTS }
fn default_display_buffers() -> usize { 30 }
fn default_analysis_points() -> usize { 5000 }
fn default_sites_per_region() -> usize { 100 }
fn default_synthetic_sample() -> usize { 200 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_population_weight")]
    pub population: f64,
    #[serde(default = "default_traffic_weight")]
    pub traffic: f64,
    #[serde(default = "default_income_weight")]
    pub income: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            population: default_population_weight(),
            traffic: default_traffic_weight(),
            income: default_income_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        ScoringWeights {
            population: w.population,
            traffic: w.traffic,
            income: w.income,
        }
    }
}

fn default_population_weight() -> f64 { 0.5 }
fn default_traffic_weight() -> f64 { 0.3 }
fn default_income_weight() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Apply `LOG_LEVEL` / `LOG_FORMAT` style overrides on top of the file values
    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            self.format = format;
        }
        self
    }

    /// Overrides from the `LOG_LEVEL` and `LOG_FORMAT` environment variables
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok())
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn env_source() -> Environment {
    // e.g., OOH__SERVER__PORT -> server.port
    Environment::with_prefix("OOH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with OOH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.population, 0.5);
        assert_eq!(weights.traffic, 0.3);
        assert_eq!(weights.income, 0.2);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_logging_overrides() {
        let logging: LoggingSettings = Config::builder()
            .add_source(File::from_str(
                "[logging]\nlevel = \"debug\"\nformat = \"pretty\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap()
            .logging;

        assert_eq!(logging.level, "debug");
        assert!(logging.is_pretty());

        let unchanged = logging.clone().with_overrides(None, Some(String::new()));
        assert_eq!(unchanged.level, "debug");
        assert!(unchanged.is_pretty());

        let overridden = logging.with_overrides(Some("warn".into()), Some("json".into()));
        assert_eq!(overridden.level, "warn");
        assert!(!overridden.is_pretty());
    }

    #[test]
    fn test_default_limits_match_pipeline() {
        assert_eq!(CoverageSettings::default().limits(), PipelineLimits::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                regions_file = "config/regions.toml"

                [server]
                port = 9090

                [coverage]
                default_radius_m = 250.0
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.coverage.default_radius_m, 250.0);
        assert_eq!(settings.coverage.max_display_buffers, 30);
        assert_eq!(settings.overpass.default_tags.len(), 2);
        assert_eq!(settings.cache.ttl_secs, 3600);
        assert_eq!(settings.regions_file, Some(PathBuf::from("config/regions.toml")));
    }
}
