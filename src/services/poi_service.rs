use crate::core::filters::{is_clean_bus_stop, tags_for_kinds, PoiKind};
use crate::models::{BoundingBox, PointOfInterest};
use crate::services::cache::{CacheKey, PoiCache};
use crate::services::overpass::OverpassClient;
use crate::services::synthetic::sample_pois;
use std::sync::Arc;

/// POIs for one bounding box, with where they came from
#[derive(Debug, Clone)]
pub struct PoiBatch {
    pub pois: Arc<Vec<PointOfInterest>>,
    /// Stand-in sample; the POI service failed or had nothing
    pub synthetic: bool,
    pub cached: bool,
}

/// POI source used by the HTTP layer
///
/// Wraps the Overpass client with the TTL cache and the synthetic fallback.
/// Never fails: fetch errors and empty answers degrade to a synthetic sample,
/// which is labelled and never cached.
pub struct PoiService {
    client: OverpassClient,
    cache: PoiCache,
    default_tags: Vec<String>,
    synthetic_sample_size: usize,
}

impl PoiService {
    pub fn new(
        client: OverpassClient,
        cache: PoiCache,
        default_tags: Vec<String>,
        synthetic_sample_size: usize,
    ) -> Self {
        Self {
            client,
            cache,
            default_tags,
            synthetic_sample_size,
        }
    }

    /// Fetch POIs in `bbox` carrying any of `tags` (the defaults when empty)
    pub async fn fetch(&self, bbox: &BoundingBox, tags: &[String]) -> PoiBatch {
        let tags = if tags.is_empty() { &self.default_tags[..] } else { tags };
        let key = CacheKey::pois(bbox, tags);

        if let Some(pois) = self.cache.get(&key).await {
            return PoiBatch {
                pois,
                synthetic: false,
                cached: true,
            };
        }

        match self.client.fetch_pois(bbox, tags).await {
            Ok(pois) if !pois.is_empty() => {
                let pois = Arc::new(pois);
                self.cache.insert(key, pois.clone()).await;
                PoiBatch {
                    pois,
                    synthetic: false,
                    cached: false,
                }
            }
            Ok(_) => {
                tracing::warn!("No POIs for {}, using synthetic sample", key);
                self.synthetic(bbox)
            }
            Err(e) => {
                tracing::warn!("POI fetch failed for {} ({}), using synthetic sample", key, e);
                self.synthetic(bbox)
            }
        }
    }

    /// Clean bus stops in `bbox`
    ///
    /// Platforms, stop positions and route members are dropped. When nothing
    /// is left the synthetic sample's bus stops stand in, even if the fetch
    /// itself returned records.
    pub async fn fetch_bus_stops(&self, bbox: &BoundingBox) -> PoiBatch {
        let mut batch = self.fetch(bbox, &tags_for_kinds(&[PoiKind::BusStop])).await;

        let mut clean = clean_bus_stops(&batch.pois);
        if clean.is_empty() && !batch.synthetic {
            tracing::warn!(
                "No clean bus stops among {} records for {}, using synthetic sample",
                batch.pois.len(),
                bbox.to_overpass()
            );
            batch = self.synthetic(bbox);
            clean = clean_bus_stops(&batch.pois);
        }

        PoiBatch {
            pois: Arc::new(clean),
            synthetic: batch.synthetic,
            cached: batch.cached,
        }
    }

    fn synthetic(&self, bbox: &BoundingBox) -> PoiBatch {
        PoiBatch {
            pois: Arc::new(sample_pois(bbox, self.synthetic_sample_size)),
            synthetic: true,
            cached: false,
        }
    }

    pub fn cached_queries(&self) -> u64 {
        self.cache.entry_count()
    }
}

fn clean_bus_stops(pois: &[PointOfInterest]) -> Vec<PointOfInterest> {
    pois.iter().filter(|p| is_clean_bus_stop(p)).cloned().collect()
}
