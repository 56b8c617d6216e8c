// Service exports
pub mod cache;
pub mod overpass;
pub mod poi_service;
pub mod synthetic;

pub use cache::{CacheKey, PoiCache};
pub use overpass::{build_query, parse_elements, FetchError, OverpassClient};
pub use poi_service::{PoiBatch, PoiService};
pub use synthetic::sample_pois;
