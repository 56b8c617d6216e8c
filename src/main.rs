use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use ooh_coverage::config::Settings;
use ooh_coverage::core::CoveragePipeline;
use ooh_coverage::models::{RegionCatalog, ScoringWeights};
use ooh_coverage::routes::{self, AppState};
use ooh_coverage::services::{OverpassClient, PoiCache, PoiService};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    // Initialize logging; LOG_LEVEL / LOG_FORMAT win over the [logging] section
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default()
        .with_env_overrides();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting OOH coverage service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error("Configuration error", e)
    })?;

    info!("Configuration loaded successfully");

    let regions = match &settings.regions_file {
        Some(path) => RegionCatalog::load(path).map_err(|e| {
            error!("Failed to load regions from {}: {}", path.display(), e);
            io_error("Region file error", e)
        })?,
        None => RegionCatalog::sao_paulo(),
    };

    info!("Region catalogue loaded: {}", regions.names().join(", "));

    let client = OverpassClient::new(settings.overpass.endpoint.clone(), settings.overpass.timeout_secs)
        .map_err(|e| io_error("HTTP client error", e))?;
    let cache = PoiCache::new(settings.cache.max_entries, settings.cache.ttl_secs);

    info!(
        "POI service initialized ({}, cache: {} entries, TTL: {}s)",
        client.endpoint(),
        settings.cache.max_entries,
        settings.cache.ttl_secs
    );

    let pois = Arc::new(PoiService::new(
        client,
        cache,
        settings.overpass.default_tags.clone(),
        settings.coverage.synthetic_sample_size,
    ));

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let pipeline = CoveragePipeline::new(settings.coverage.limits(), weights);

    info!("Pipeline initialized with limits {:?} and weights {:?}", pipeline.limits(), weights);

    // Build application state
    let app_state = AppState {
        pois,
        regions: Arc::new(regions),
        pipeline,
        default_radius_m: settings.coverage.default_radius_m,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
