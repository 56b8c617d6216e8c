use crate::models::{BoundingBox, PointOfInterest};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// In-memory TTL cache for POI fetches
///
/// Entries are shared `Arc`s so a hit costs a refcount bump, not a copy of
/// the batch. Only successful fetches are stored.
#[derive(Clone)]
pub struct PoiCache {
    inner: Cache<String, Arc<Vec<PointOfInterest>>>,
}

impl PoiCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<PointOfInterest>>> {
        let hit = self.inner.get(key).await;
        if hit.is_some() {
            tracing::trace!("Cache hit: {}", key);
        } else {
            tracing::trace!("Cache miss: {}", key);
        }
        hit
    }

    pub async fn insert(&self, key: String, pois: Arc<Vec<PointOfInterest>>) {
        tracing::trace!("Cache set: {} ({} POIs)", key, pois.len());
        self.inner.insert(key, pois).await;
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Approximate number of live entries
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

/// Cache key builders
pub struct CacheKey;

impl CacheKey {
    /// Key for a POI fetch; tag order does not matter
    pub fn pois(bbox: &BoundingBox, tags: &[String]) -> String {
        let mut tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags.dedup();
        format!("pois:{}:{}", bbox.to_overpass(), tags.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_tag_order() {
        let bbox = BoundingBox::new(-23.6, -46.7, -23.5, -46.6);
        let a = CacheKey::pois(&bbox, &["highway=bus_stop".into(), "advertising=billboard".into()]);
        let b = CacheKey::pois(&bbox, &["advertising=billboard".into(), "highway=bus_stop".into()]);
        assert_eq!(a, b);
        assert_eq!(a, "pois:-23.6,-46.7,-23.5,-46.6:advertising=billboard|highway=bus_stop");
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = PoiCache::new(10, 60);
        assert!(cache.get("k").await.is_none());

        let pois = Arc::new(vec![PointOfInterest::new(1, -23.5, -46.6)]);
        cache.insert("k".to_string(), pois.clone()).await;

        let hit = cache.get("k").await.unwrap();
        assert!(Arc::ptr_eq(&hit, &pois));

        cache.invalidate_all().await;
        assert!(cache.get("k").await.is_none());
    }
}
