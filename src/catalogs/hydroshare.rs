//! HydroShare REST catalog client.
//!
//! Queries the `hsapi` resource listing and maps records, including their
//! box or point coverages, into [`Resource`]s.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use geo::{coord, BoundingRect, Geometry, Point, Rect};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Catalog, CatalogError, SearchParams};
use crate::dates::parse_date;
use crate::models::{BBox, LinkType, Resource, ResourceLink, ResourceList};

pub const DEFAULT_BASE_URL: &str = "https://www.hydroshare.org/hsapi/resource/";

pub struct HydroShareCatalog {
    client: Client,
    base_url: Url,
    page_size: usize,
}

impl HydroShareCatalog {
    pub fn new(client: Client, base_url: Url, page_size: usize) -> Self {
        Self {
            client,
            base_url,
            page_size,
        }
    }

    fn request_url(&self, params: &SearchParams) -> Url {
        let mut url = self.base_url.clone();

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("full_text_search", &params.query);
            query.append_pair("count", &self.page_size.to_string());

            if let Some(from) = params.from_date {
                query.append_pair("from_date", &from.format("%Y-%m-%d").to_string());
            }
            if let Some(to) = params.to_date {
                query.append_pair("to_date", &to.format("%Y-%m-%d").to_string());
            }
            if let Some(page) = params.page {
                query.append_pair("page", &page.to_string());
            }
        }

        url
    }
}

#[async_trait]
impl Catalog for HydroShareCatalog {
    fn name(&self) -> &'static str {
        "hydroshare"
    }

    async fn search(&self, params: &SearchParams) -> Result<ResourceList, CatalogError> {
        let url = self.request_url(params);
        debug!("HydroShare request: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(CatalogError::from_reqwest)?
            .error_for_status()
            .map_err(CatalogError::from_reqwest)?;

        let body: Value = response.json().await.map_err(CatalogError::from_reqwest)?;

        let count = body["count"]
            .as_u64()
            .ok_or_else(|| CatalogError::Payload("missing result count".to_string()))?;

        let results = body["results"]
            .as_array()
            .map(|records| records.iter().filter_map(parse_resource).collect())
            .unwrap_or_default();

        Ok(ResourceList {
            catalog: self.name().to_string(),
            api_url: Some(url.to_string()),
            count,
            results,
        })
    }
}

/// Map one HydroShare record; records missing id or title are skipped.
fn parse_resource(value: &Value) -> Option<Resource> {
    let id = value["resource_id"].as_str()?;
    let title = value["resource_title"].as_str()?;

    let geom = value["coverages"]
        .as_array()
        .and_then(|coverages| geometry_from_coverages(coverages));
    let bbox = geom.as_ref().and_then(|g| g.bounding_rect()).map(BBox::from);

    let mut links = Vec::new();
    if let Some(href) = value["resource_url"].as_str() {
        links.push(ResourceLink::new(LinkType::Details, href));
    }
    if let Some(href) = value["bag_url"].as_str() {
        links.push(ResourceLink::new(LinkType::Download, href));
    }

    Some(Resource {
        id: id.to_string(),
        title: title.to_string(),
        description: non_empty(value["abstract"].as_str()),
        author: non_empty(value["creator"].as_str()),
        links,
        created_at: date_field(&value["date_created"]),
        updated_at: date_field(&value["date_last_updated"]),
        geom,
        bbox,
    })
}

/// Prefer a box coverage; fall back to a point. Records may carry several
/// coverage entries (period, box, point) in any order.
fn geometry_from_coverages(coverages: &[Value]) -> Option<Geometry<f64>> {
    if let Some(geom) = coverages.iter().find_map(box_coverage) {
        return Some(geom);
    }
    coverages.iter().find_map(point_coverage)
}

fn box_coverage(coverage: &Value) -> Option<Geometry<f64>> {
    if coverage["type"].as_str()? != "box" {
        return None;
    }

    let value = &coverage["value"];
    let rect = Rect::new(
        coord! { x: num(&value["westlimit"])?, y: num(&value["southlimit"])? },
        coord! { x: num(&value["eastlimit"])?, y: num(&value["northlimit"])? },
    );

    Some(Geometry::Polygon(rect.to_polygon()))
}

fn point_coverage(coverage: &Value) -> Option<Geometry<f64>> {
    if coverage["type"].as_str()? != "point" {
        return None;
    }

    let value = &coverage["value"];
    Some(Geometry::Point(Point::new(
        num(&value["east"])?,
        num(&value["north"])?,
    )))
}

/// HydroShare encodes coverage limits as numbers or numeric strings.
fn num(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

/// Timestamps in upstream payloads degrade to None instead of failing the record.
fn date_field(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(|s| parse_date(Some(s)).ok().flatten())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn record() -> Value {
        json!({
            "resource_id": "c6b9d2a7",
            "resource_title": "Delaware River nitrate samples",
            "abstract": "Monthly nitrate grab samples.",
            "creator": "Stroud Water Research Center",
            "resource_url": "https://www.hydroshare.org/resource/c6b9d2a7/",
            "date_created": "2015-05-12T15:47:48Z",
            "date_last_updated": "2016-01-02T08:00:00Z",
            "coverages": [
                { "type": "period", "value": { "start": "2014-01-01", "end": "2015-01-01" } },
                {
                    "type": "box",
                    "value": {
                        "northlimit": "41.0",
                        "southlimit": 39.0,
                        "eastlimit": "-74.0",
                        "westlimit": -76.0
                    }
                }
            ]
        })
    }

    #[test]
    fn test_parse_resource_with_box_coverage() {
        let resource = parse_resource(&record()).unwrap();

        assert_eq!(resource.id, "c6b9d2a7");
        assert_eq!(resource.bbox, Some(BBox::new(-76.0, 39.0, -74.0, 41.0)));
        assert!(matches!(resource.geom, Some(Geometry::Polygon(_))));
        assert_eq!(resource.links.len(), 1);
        assert_eq!(resource.created_at.unwrap().format("%Y").to_string(), "2015");
    }

    #[test]
    fn test_parse_resource_with_point_coverage() {
        let value = json!({
            "resource_id": "p1",
            "resource_title": "Gauge site",
            "coverages": [
                { "type": "point", "value": { "north": 40.5, "east": -75.2 } }
            ]
        });

        let resource = parse_resource(&value).unwrap();
        assert_eq!(
            resource.geom,
            Some(Geometry::Point(Point::new(-75.2, 40.5)))
        );
    }

    #[test]
    fn test_record_without_title_is_skipped() {
        let value = json!({ "resource_id": "x" });
        assert!(parse_resource(&value).is_none());

        let value = json!({ "resource_title": "no id" });
        assert!(parse_resource(&value).is_none());
    }

    #[test]
    fn test_record_without_coverages_has_no_geometry() {
        let value = json!({
            "resource_id": "n1",
            "resource_title": "Tabular only"
        });

        let resource = parse_resource(&value).unwrap();
        assert!(resource.geom.is_none());
        assert!(resource.bbox.is_none());
    }

    #[tokio::test]
    async fn test_search_parses_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/hsapi/resource/")
                .query_param("full_text_search", "nitrate");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "count": 27, "results": [record()] }));
        });

        let catalog = HydroShareCatalog::new(
            Client::new(),
            Url::parse(&server.url("/hsapi/resource/")).unwrap(),
            20,
        );

        let params = SearchParams {
            query: "nitrate".to_string(),
            ..Default::default()
        };

        let list = catalog.search(&params).await.unwrap();
        assert_eq!(list.count, 27);
        assert_eq!(list.results.len(), 1);
        assert_eq!(list.catalog, "hydroshare");

        mock.assert();
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_with_408() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({ "count": 0, "results": [] }));
        });

        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let catalog = HydroShareCatalog::new(
            client,
            Url::parse(&server.url("/hsapi/resource/")).unwrap(),
            20,
        );

        let err = catalog
            .search(&SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::RequestTimedOut));
        assert_eq!(err.status_code(), 408);
    }
}
