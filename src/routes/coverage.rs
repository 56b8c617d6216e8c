use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{
    buffer::display_buffers,
    distance::search_bbox,
    filters::{matches_kinds, tags_for_kinds},
    geometry::{pois_to_geo, validate_coordinate},
    scoring::score_candidates,
    CoverageError, CoveragePipeline,
};
use crate::models::{
    buffers_feature_collection, BuffersRequest, BuffersResponse, CoverageRequest,
    CoverageResponse, ErrorResponse, HealthResponse, PointOfInterest, PopulationZone,
    RankRequest, RankResponse, Region, RegionCatalog, RegionSummary, ScoreRequest, ScoreResponse,
};
use crate::services::PoiService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pois: Arc<PoiService>,
    pub regions: Arc<RegionCatalog>,
    pub pipeline: CoveragePipeline,
    pub default_radius_m: f64,
}

/// Configure all coverage-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/regions", web::get().to(list_regions))
        .route("/coverage", web::post().to(estimate_coverage))
        .route("/buffers", web::post().to(map_buffers))
        .route("/score", web::post().to(score_sites))
        .route("/rank/bus-stops", web::post().to(rank_bus_stops));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn invalid_input(err: CoverageError) -> HttpResponse {
    bad_request("Invalid input", err.to_string())
}

fn unknown_region(name: &str, catalog: &RegionCatalog) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Unknown region".to_string(),
        message: format!("'{}' is not one of: {}", name, catalog.names().join(", ")),
        status_code: 404,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_queries: state.pois.cached_queries(),
    })
}

/// Region catalogue
///
/// GET /api/v1/regions
async fn list_regions(state: web::Data<AppState>) -> impl Responder {
    let regions: Vec<RegionSummary> = state.regions.regions.iter().map(RegionSummary::from).collect();
    HttpResponse::Ok().json(regions)
}

/// Coverage estimate for a region
///
/// POST /api/v1/coverage
///
/// Request body:
/// ```json
/// {
///   "region": "Zona Sul",
///   "radiusM": 150,
///   "kinds": ["bus_stop", "billboard"],
///   "zones": [{"name": "tract", "population": 1200, "ring": [[lon, lat], ...]}]
/// }
/// ```
async fn estimate_coverage(
    state: web::Data<AppState>,
    req: web::Json<CoverageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for coverage request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let region = match state.regions.get(&req.region) {
        Some(region) => region,
        None => return unknown_region(&req.region, &state.regions),
    };
    let radius_m = req.radius_m.unwrap_or(state.default_radius_m);

    let zones: Option<Vec<PopulationZone>> = match &req.zones {
        Some(zones) => match zones.iter().map(|z| z.to_zone()).collect::<Result<Vec<_>, _>>() {
            Ok(zones) => Some(zones),
            Err(e) => return invalid_input(e),
        },
        None => None,
    };

    let batch = state.pois.fetch(&region.bbox, &tags_for_kinds(&req.kinds)).await;
    let pois: Vec<PointOfInterest> = batch
        .pois
        .iter()
        .filter(|p| matches_kinds(p, &req.kinds))
        .cloned()
        .collect();

    tracing::info!(
        "Coverage for {}: {} POIs (cached: {}, synthetic: {}), radius {} m",
        region.name,
        pois.len(),
        batch.cached,
        batch.synthetic,
        radius_m
    );

    match state.pipeline.analyze(region, pois, radius_m, zones.as_deref()) {
        Ok(analysis) => {
            HttpResponse::Ok().json(CoverageResponse::new(region, radius_m, analysis, batch.synthetic))
        }
        Err(e) => {
            tracing::info!("Coverage request rejected for {}: {}", region.name, e);
            invalid_input(e)
        }
    }
}

/// Display buffers around a map position
///
/// POST /api/v1/buffers
///
/// Request body:
/// ```json
/// { "lat": -23.55, "lon": -46.63, "searchRadiusKm": 1.11, "radiusM": 500, "kinds": [] }
/// ```
async fn map_buffers(
    state: web::Data<AppState>,
    req: web::Json<BuffersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(e) = validate_coordinate(req.lat, req.lon) {
        return invalid_input(e);
    }

    let bbox = search_bbox(req.lat, req.lon, req.search_radius_km);
    let batch = state.pois.fetch(&bbox, &tags_for_kinds(&req.kinds)).await;
    let pois: Vec<PointOfInterest> = batch
        .pois
        .iter()
        .filter(|p| matches_kinds(p, &req.kinds))
        .cloned()
        .collect();

    let limits = state.pipeline.limits();
    let result = pois_to_geo(pois).and_then(|conversion| {
        display_buffers(
            &conversion.points,
            req.radius_m,
            limits.buffer_segments,
            limits.max_display_buffers,
        )
    });

    match result {
        Ok(display) => HttpResponse::Ok().json(BuffersResponse {
            total: display.buffers.len() + display.truncated,
            truncated: display.truncated,
            synthetic: batch.synthetic,
            buffers: buffers_feature_collection(&display.buffers),
        }),
        Err(e) => invalid_input(e),
    }
}

/// Score caller-supplied sites
///
/// POST /api/v1/score
///
/// Scores are relative to the submitted set and returned in input order.
async fn score_sites(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let weights = req.weights.unwrap_or(*state.pipeline.weights());

    match score_candidates(req.candidates, &weights) {
        Ok(scored) => HttpResponse::Ok().json(ScoreResponse { scored }),
        Err(e) => invalid_input(e),
    }
}

/// Cross-region bus stop ranking
///
/// POST /api/v1/rank/bus-stops
///
/// Request body:
/// ```json
/// { "radiusM": 150, "top": 20, "regions": ["Centro", "Osasco"] }
/// ```
async fn rank_bus_stops(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let regions: Vec<&Region> = match &req.regions {
        Some(names) => {
            let mut selected = Vec::with_capacity(names.len());
            for name in names {
                match state.regions.get(name) {
                    Some(region) => selected.push(region),
                    None => return unknown_region(name, &state.regions),
                }
            }
            selected
        }
        None => state.regions.regions.iter().collect(),
    };

    let mut per_region = Vec::with_capacity(regions.len());
    let mut synthetic_regions = Vec::new();
    for region in regions {
        let batch = state.pois.fetch_bus_stops(&region.bbox).await;
        if batch.synthetic {
            synthetic_regions.push(region.name.clone());
        }
        per_region.push((region.clone(), batch.pois.as_ref().clone()));
    }

    match state.pipeline.rank_bus_stops(per_region, req.radius_m, req.top) {
        Ok(sites) => {
            tracing::info!(
                "Ranked {} bus stops at {} m ({} synthetic regions)",
                sites.len(),
                req.radius_m,
                synthetic_regions.len()
            );
            HttpResponse::Ok().json(RankResponse {
                radius_m: req.radius_m,
                sites,
                synthetic_regions,
            })
        }
        Err(e) => invalid_input(e),
    }
}
