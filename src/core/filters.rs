use crate::core::distance::is_within_bounding_box;
use crate::models::{BoundingBox, PointOfInterest};
use serde::{Deserialize, Serialize};

/// Advertising values treated as billboard-like street furniture
const BILLBOARD_VALUES: [&str; 3] = ["billboard", "poster_box", "column"];

/// Broad category of an OOH point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    BusStop,
    Billboard,
    Other,
}

impl PoiKind {
    /// Classify a record from its OSM tags
    pub fn of(poi: &PointOfInterest) -> PoiKind {
        if poi.tag("highway") == Some("bus_stop") {
            PoiKind::BusStop
        } else if poi
            .tag("advertising")
            .is_some_and(|v| BILLBOARD_VALUES.contains(&v))
        {
            PoiKind::Billboard
        } else {
            PoiKind::Other
        }
    }

    /// Overpass `key=value` filter fetching this kind
    pub fn overpass_tag(&self) -> Option<&'static str> {
        match self {
            PoiKind::BusStop => Some("highway=bus_stop"),
            PoiKind::Billboard => Some("advertising=billboard"),
            PoiKind::Other => None,
        }
    }
}

/// Overpass tag filters for a kind selection, deduplicated, in order
pub fn tags_for_kinds(kinds: &[PoiKind]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in kinds.iter().filter_map(PoiKind::overpass_tag) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// An empty selection matches everything
#[inline]
pub fn matches_kinds(poi: &PointOfInterest, kinds: &[PoiKind]) -> bool {
    kinds.is_empty() || kinds.contains(&PoiKind::of(poi))
}

/// Physical bus stop, as opposed to a platform, stop position or route relation
pub fn is_clean_bus_stop(poi: &PointOfInterest) -> bool {
    if matches!(poi.tag("public_transport"), Some("platform") | Some("stop_position")) {
        return false;
    }
    if poi.tag("route").is_some() {
        return false;
    }
    poi.tag("highway") == Some("bus_stop") && poi.lat.is_some() && poi.lon.is_some()
}

/// Records whose coordinates fall inside `bbox`; records without coordinates are kept
/// for geometry conversion to count and skip
pub fn within_region(poi: &PointOfInterest, bbox: &BoundingBox) -> bool {
    match (poi.lat, poi.lon) {
        (Some(lat), Some(lon)) => is_within_bounding_box(lat, lon, bbox),
        _ => true,
    }
}
