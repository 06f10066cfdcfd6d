//! GeoJSON conversion for AOI payloads and response geometries.
//!
//! Only the geometry object itself is handled here; Feature wrappers are the
//! client's concern.

use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoJsonError {
    #[error("GeoJSON geometry must be a JSON object")]
    NotAnObject,
    #[error("missing or non-string GeoJSON \"type\" member")]
    MissingType,
    #[error("unsupported GeoJSON geometry type: {0}")]
    UnsupportedType(String),
    #[error("malformed GeoJSON coordinates")]
    MalformedCoordinates,
    #[error("area of interest must be a Polygon or MultiPolygon, got {0}")]
    InvalidAoi(String),
}

/// Parse a GeoJSON geometry object into a geometry.
///
/// Supports Point, Polygon, and MultiPolygon, which covers everything the
/// catalogs and AOI payloads produce.
pub fn geometry_from_value(value: &Value) -> Result<Geometry<f64>, GeoJsonError> {
    let (geo_type, coordinates) = unpack(value)?;

    match geo_type {
        "Point" => Ok(Geometry::Point(Point::from(parse_coord(coordinates)?))),
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(coordinates)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coordinates)?)),
        other => Err(GeoJsonError::UnsupportedType(other.to_string())),
    }
}

/// Parse an AOI geometry, accepting a Polygon or MultiPolygon.
///
/// A bare Polygon is promoted to a single-member MultiPolygon so callers
/// always work with one AOI type.
pub fn multi_polygon_from_value(value: &Value) -> Result<MultiPolygon<f64>, GeoJsonError> {
    let (geo_type, coordinates) = unpack(value)?;

    match geo_type {
        "Polygon" => Ok(MultiPolygon::new(vec![parse_polygon(coordinates)?])),
        "MultiPolygon" => parse_multi_polygon(coordinates),
        other => Err(GeoJsonError::InvalidAoi(other.to_string())),
    }
}

/// Render a geometry as a GeoJSON geometry object.
pub fn geometry_to_value(geom: &Geometry<f64>) -> Value {
    match geom {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": coord_value(p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.iter().map(|p| coord_value(p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(l) => json!({
            "type": "LineString",
            "coordinates": [coord_value(l.start), coord_value(l.end)],
        }),
        Geometry::LineString(ls) => json!({
            "type": "LineString",
            "coordinates": ring_value(ls),
        }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.iter().map(ring_value).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => json!({
            "type": "Polygon",
            "coordinates": polygon_rings(p),
        }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
        Geometry::Rect(r) => geometry_to_value(&Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => geometry_to_value(&Geometry::Polygon(t.to_polygon())),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.iter().map(geometry_to_value).collect::<Vec<_>>(),
        }),
    }
}

fn unpack(value: &Value) -> Result<(&str, &Value), GeoJsonError> {
    let obj = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
    let geo_type = obj
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(GeoJsonError::MissingType)?;

    // GeometryCollection aside, every geometry type carries coordinates
    let coordinates = obj
        .get("coordinates")
        .ok_or(GeoJsonError::MalformedCoordinates)?;

    Ok((geo_type, coordinates))
}

fn parse_coord(value: &Value) -> Result<Coord<f64>, GeoJsonError> {
    let pair = value.as_array().ok_or(GeoJsonError::MalformedCoordinates)?;
    if pair.len() < 2 {
        return Err(GeoJsonError::MalformedCoordinates);
    }

    let x = pair[0].as_f64().ok_or(GeoJsonError::MalformedCoordinates)?;
    let y = pair[1].as_f64().ok_or(GeoJsonError::MalformedCoordinates)?;
    Ok(Coord { x, y })
}

fn parse_ring(value: &Value) -> Result<LineString<f64>, GeoJsonError> {
    let coords = value
        .as_array()
        .ok_or(GeoJsonError::MalformedCoordinates)?
        .iter()
        .map(parse_coord)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineString::new(coords))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, GeoJsonError> {
    let rings = value.as_array().ok_or(GeoJsonError::MalformedCoordinates)?;
    let mut rings = rings.iter().map(parse_ring);

    let exterior = rings.next().ok_or(GeoJsonError::MalformedCoordinates)??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn parse_multi_polygon(value: &Value) -> Result<MultiPolygon<f64>, GeoJsonError> {
    let polygons = value
        .as_array()
        .ok_or(GeoJsonError::MalformedCoordinates)?
        .iter()
        .map(parse_polygon)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MultiPolygon::new(polygons))
}

fn coord_value(coord: Coord<f64>) -> Value {
    json!([coord.x, coord.y])
}

fn ring_value(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| coord_value(*c)).collect())
}

fn polygon_rings(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![ring_value(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_value));
    Value::Array(rings)
}
