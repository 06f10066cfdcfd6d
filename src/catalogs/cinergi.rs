//! CINERGI geoportal catalog client.
//!
//! Talks to the geoportal opensearch endpoint, which returns an
//! Elasticsearch-shaped payload with envelope geometries.

use async_trait::async_trait;
use geo::{coord, BoundingRect, Geometry, Rect};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Catalog, CatalogError, SearchParams};
use crate::dates::parse_date;
use crate::models::{BBox, LinkType, Resource, ResourceLink, ResourceList};

pub const DEFAULT_BASE_URL: &str = "https://cinergi.sdsc.edu/geoportal/opensearch";

pub struct CinergiCatalog {
    client: Client,
    base_url: Url,
    page_size: usize,
}

impl CinergiCatalog {
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
            query.append_pair("q", &params.query);
            query.append_pair("f", "json");
            query.append_pair("size", &self.page_size.to_string());

            if let Some(bbox) = params.bbox {
                query.append_pair("bbox", &bbox.to_param());
            }

            if params.from_date.is_some() || params.to_date.is_some() {
                let from = params
                    .from_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let to = params
                    .to_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                query.append_pair("time", &format!("{}/{}", from, to));
            }

            if let Some(page) = params.page {
                // The geoportal paginates by record offset
                let offset = (page.saturating_sub(1) as usize) * self.page_size;
                query.append_pair("from", &offset.to_string());
            }
        }

        url
    }
}

#[async_trait]
impl Catalog for CinergiCatalog {
    fn name(&self) -> &'static str {
        "cinergi"
    }

    async fn search(&self, params: &SearchParams) -> Result<ResourceList, CatalogError> {
        let url = self.request_url(params);
        debug!("CINERGI request: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(CatalogError::from_reqwest)?
            .error_for_status()
            .map_err(CatalogError::from_reqwest)?;

        let body: Value = response.json().await.map_err(CatalogError::from_reqwest)?;

        let count = total_hits(&body)
            .ok_or_else(|| CatalogError::Payload("missing hit total".to_string()))?;

        let results = body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().filter_map(parse_hit).collect())
            .unwrap_or_default();

        Ok(ResourceList {
            catalog: self.name().to_string(),
            api_url: Some(url.to_string()),
            count,
            results,
        })
    }
}

/// Elasticsearch 6 reports `hits.total` as a number, 7+ as an object.
fn total_hits(body: &Value) -> Option<u64> {
    let total = &body["hits"]["total"];
    total.as_u64().or_else(|| total["value"].as_u64())
}

/// Map one geoportal hit; hits missing id or title are skipped.
fn parse_hit(hit: &Value) -> Option<Resource> {
    let id = hit["_id"].as_str()?;
    let source = &hit["_source"];
    let title = source["title"].as_str()?;

    let geom = envelope_geometry(&source["envelope_geo"]);
    let bbox = geom.as_ref().and_then(|g| g.bounding_rect()).map(BBox::from);

    let mut links = Vec::new();
    if let Some(href) = source["url"].as_str() {
        links.push(ResourceLink::new(LinkType::Details, href));
    }
    if let Some(href) = source["url_http_download"].as_str() {
        links.push(ResourceLink::new(LinkType::Download, href));
    }

    let author = source["contact_organizations"]
        .as_array()
        .and_then(|orgs| orgs.first())
        .and_then(|org| org.as_str())
        .map(String::from);

    Some(Resource {
        id: id.to_string(),
        title: title.to_string(),
        description: source["description"].as_str().map(String::from),
        author,
        links,
        created_at: None,
        updated_at: source["sys_modified_dt"]
            .as_str()
            .and_then(|s| parse_date(Some(s)).ok().flatten()),
        geom,
        bbox,
    })
}

/// The geoportal stores envelopes as `[[minx, maxy], [maxx, miny]]`, either
/// as a single object or an array of them; only the first is used.
fn envelope_geometry(value: &Value) -> Option<Geometry<f64>> {
    let envelope = if value.is_array() {
        value.as_array()?.first()?
    } else {
        value
    };

    if envelope["type"].as_str()? != "envelope" {
        return None;
    }

    let corners = envelope["coordinates"].as_array()?;
    let upper_left = corners.first()?.as_array()?;
    let lower_right = corners.get(1)?.as_array()?;

    let rect = Rect::new(
        coord! {
            x: upper_left.first()?.as_f64()?,
            y: lower_right.get(1)?.as_f64()?,
        },
        coord! {
            x: lower_right.first()?.as_f64()?,
            y: upper_left.get(1)?.as_f64()?,
        },
    );

    Some(Geometry::Polygon(rect.to_polygon()))
}
