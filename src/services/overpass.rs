use crate::models::{BoundingBox, PoiId, PointOfInterest};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when querying Overpass
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Overpass API client
///
/// Fetches nodes and ways carrying any of the requested `key=value` tags
/// inside a bounding box. Ways are located by their centre.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    endpoint: String,
    timeout_secs: u64,
    client: Client,
}

impl OverpassClient {
    /// Create a new Overpass client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout_secs,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch POIs inside `bbox` matching any of `tags`
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    pub async fn fetch_pois(
        &self,
        bbox: &BoundingBox,
        tags: &[String],
    ) -> Result<Vec<PointOfInterest>, FetchError> {
        let query = build_query(bbox, tags, self.timeout_secs);

        tracing::debug!("Querying Overpass at {}: {}", self.endpoint, query);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::ApiError(format!(
                "Overpass query failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let pois = parse_elements(&json)?;

        tracing::debug!("Overpass returned {} POIs for bbox {}", pois.len(), bbox.to_overpass());
        Ok(pois)
    }
}

/// Build an Overpass QL query for nodes and ways with any of `tags`
///
/// Tags without `=` are ignored.
pub fn build_query(bbox: &BoundingBox, tags: &[String], timeout_secs: u64) -> String {
    let area = bbox.to_overpass();
    let clauses: String = tags
        .iter()
        .filter_map(|tag| tag.split_once('='))
        .map(|(k, v)| {
            format!(
                r#"node["{k}"="{v}"]({area});way["{k}"="{v}"]({area});"#,
                k = k,
                v = v,
                area = area
            )
        })
        .collect();

    format!("[out:json][timeout:{}];({});out center tags;", timeout_secs, clauses)
}

/// Parse the `elements` array of an Overpass JSON response
///
/// Elements with neither `lat`/`lon` nor a `center` are dropped.
pub fn parse_elements(json: &Value) -> Result<Vec<PointOfInterest>, FetchError> {
    let elements = json
        .get("elements")
        .and_then(|e| e.as_array())
        .ok_or_else(|| FetchError::InvalidResponse("Missing elements array".into()))?;

    let pois = elements
        .iter()
        .filter_map(|el| {
            let (lat, lon) = element_position(el)?;
            let id = match el.get("id") {
                Some(Value::Number(n)) => PoiId::Int(n.as_i64()?),
                Some(Value::String(s)) => PoiId::Str(s.clone()),
                _ => return None,
            };
            let tags: BTreeMap<String, Option<String>> = el
                .get("tags")
                .and_then(|t| t.as_object())
                .map(|t| {
                    t.iter()
                        .map(|(k, v)| (k.clone(), v.as_str().map(str::to_string)))
                        .collect()
                })
                .unwrap_or_default();

            Some(PointOfInterest {
                id,
                lat: Some(lat),
                lon: Some(lon),
                tags,
            })
        })
        .collect();

    Ok(pois)
}

fn element_position(el: &Value) -> Option<(f64, f64)> {
    let direct = el
        .get("lat")
        .and_then(Value::as_f64)
        .zip(el.get("lon").and_then(Value::as_f64));

    direct.or_else(|| {
        let center = el.get("center")?;
        center
            .get("lat")
            .and_then(Value::as_f64)
            .zip(center.get("lon").and_then(Value::as_f64))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bbox() -> BoundingBox {
        BoundingBox::new(-23.58, -46.66, -23.52, -46.60)
    }

    #[test]
    fn test_build_query() {
        let tags = vec!["highway=bus_stop".to_string(), "garbage".to_string()];
        let query = build_query(&bbox(), &tags, 25);

        assert_eq!(
            query,
            "[out:json][timeout:25];(\
             node[\"highway\"=\"bus_stop\"](-23.58,-46.66,-23.52,-46.6);\
             way[\"highway\"=\"bus_stop\"](-23.58,-46.66,-23.52,-46.6);\
             );out center tags;"
        );
    }

    #[test]
    fn test_build_query_no_tags() {
        assert_eq!(build_query(&bbox(), &[], 10), "[out:json][timeout:10];();out center tags;");
    }

    #[test]
    fn test_parse_elements() {
        let json = json!({
            "elements": [
                {"type": "node", "id": 1, "lat": -23.55, "lon": -46.63,
                 "tags": {"highway": "bus_stop", "name": "Sé"}},
                {"type": "way", "id": 2, "center": {"lat": -23.56, "lon": -46.64},
                 "tags": {"advertising": "billboard"}},
                {"type": "way", "id": 3, "tags": {"advertising": "billboard"}},
                {"type": "node", "id": 4, "lat": -23.57, "lon": -46.65}
            ]
        });

        let pois = parse_elements(&json).unwrap();
        assert_eq!(pois.len(), 3);
        assert_eq!(pois[0].tag("name"), Some("Sé"));
        assert_eq!(pois[1].lat, Some(-23.56));
        assert_eq!(pois[1].id, PoiId::Int(2));
        assert!(pois[2].tags.is_empty());
    }

    #[test]
    fn test_parse_elements_requires_array() {
        assert!(matches!(
            parse_elements(&json!({"remark": "timeout"})),
            Err(FetchError::InvalidResponse(_))
        ));
        assert!(parse_elements(&json!({"elements": []})).unwrap().is_empty());
    }
}
