//! Intersection filtering of search results against an AOI.

use geo::{Geometry, MultiPolygon, PreparedGeometry, Relate};

/// Capability trait for records that may carry a spatial footprint.
pub trait Georeferenced {
    fn geom(&self) -> Option<&Geometry<f64>>;
}

/// Only include results with no geometry, or geometries which intersect
/// the area of interest.
///
/// The AOI is prepared once and reused across all candidates, so repeated
/// intersection tests stay cheap. Order is preserved and results are never
/// mutated. The AOI must be a valid, non-empty geometry; feeding an invalid
/// one is a caller error.
pub fn filter_aoi_intersection<T: Georeferenced>(
    aoi: &MultiPolygon<f64>,
    results: Vec<T>,
) -> Vec<T> {
    let prepared = PreparedGeometry::from(aoi);

    results
        .into_iter()
        .filter(|result| match result.geom() {
            None => true,
            Some(geom) => prepared.relate(geom).is_intersects(),
        })
        .collect()
}
