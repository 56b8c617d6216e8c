// Route exports
pub mod coverage;

use actix_web::web;

pub use coverage::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(coverage::configure),
    );
}
