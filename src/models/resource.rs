//! Resource records returned by catalog searches.

use chrono::NaiveDateTime;
use geo::Geometry;
use serde::{Serialize, Serializer};

use super::BBox;
use crate::aoi::{geometry_to_value, Georeferenced};

/// Kind of link attached to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Landing page with the full record
    Details,
    /// Direct data download
    Download,
}

/// A typed link on a catalog resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLink {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub href: String,
}

impl ResourceLink {
    pub fn new(link_type: LinkType, href: impl Into<String>) -> Self {
        Self {
            link_type,
            href: href.into(),
        }
    }
}

/// A single search hit from an upstream catalog.
///
/// The geometry is optional: many catalog records carry no spatial footprint
/// at all, and those records are never excluded by spatial filtering.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Upstream identifier, unique within its catalog
    pub id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ResourceLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,

    /// Spatial footprint, rendered as GeoJSON in responses
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_geom"
    )]
    pub geom: Option<Geometry<f64>>,

    /// Bounding box derived from the footprint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

impl Georeferenced for Resource {
    fn geom(&self) -> Option<&Geometry<f64>> {
        self.geom.as_ref()
    }
}

fn serialize_geom<S>(geom: &Option<Geometry<f64>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match geom {
        Some(g) => geometry_to_value(g).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// One catalog's page of search results.
///
/// `count` is the total reported by the upstream catalog, not the length of
/// `results`: spatial filtering trims `results` without touching `count`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    pub catalog: String,

    /// Upstream request URL that produced this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    pub count: u64,

    pub results: Vec<Resource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Geometry};

    fn sample_resource() -> Resource {
        Resource {
            id: "hs-123".to_string(),
            title: "Streamflow observations".to_string(),
            description: None,
            author: Some("USGS".to_string()),
            links: vec![ResourceLink::new(
                LinkType::Details,
                "https://example.org/hs-123",
            )],
            created_at: None,
            updated_at: None,
            geom: Some(Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 2.0),
                (x: 0.0, y: 2.0),
            ])),
            bbox: Some(BBox::new(0.0, 0.0, 2.0, 2.0)),
        }
    }

    #[test]
    fn test_geometry_serializes_as_geojson() {
        let value = serde_json::to_value(sample_resource()).unwrap();
        assert_eq!(value["geom"]["type"], "Polygon");
        assert_eq!(value["geom"]["coordinates"][0][0][0], 0.0);
        assert_eq!(value["links"][0]["type"], "details");
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let mut resource = sample_resource();
        resource.geom = None;
        resource.bbox = None;
        resource.links.clear();

        let value = serde_json::to_value(resource).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("geom"));
        assert!(!obj.contains_key("bbox"));
        assert!(!obj.contains_key("links"));
        assert!(!obj.contains_key("description"));
    }
}
