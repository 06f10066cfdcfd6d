//! Area-of-interest (AOI) spatial filtering.
//!
//! Filters catalog results against a reference polygon using a prepared
//! geometry, and computes bounding boxes for upstream spatial queries.

mod bounds;
mod filter;
mod geojson;

pub use bounds::{get_bounds, EmptyBoundaryError};
pub use filter::{filter_aoi_intersection, Georeferenced};
pub use geojson::{
    geometry_from_value, geometry_to_value, multi_polygon_from_value, GeoJsonError,
};
