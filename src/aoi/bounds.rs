//! Bounding box computation from a polygon boundary.

use geo::Polygon;
use thiserror::Error;

use crate::models::BBox;

/// Returned when a polygon's exterior ring has no coordinates.
///
/// An empty ring has no well-defined extent; callers get an explicit error
/// rather than a zeroed box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot compute bounds of an empty boundary ring")]
pub struct EmptyBoundaryError;

/// Returns the bounding box of the polygon's first boundary ring.
///
/// Minima and maxima of the x and y coordinates are computed independently
/// over the exterior ring; interior rings never widen the box.
pub fn get_bounds(aoi: &Polygon<f64>) -> Result<BBox, EmptyBoundaryError> {
    let mut coords = aoi.exterior().coords();

    let first = coords.next().ok_or(EmptyBoundaryError)?;
    let (mut xmin, mut ymin, mut xmax, mut ymax) = (first.x, first.y, first.x, first.y);

    for coord in coords {
        xmin = xmin.min(coord.x);
        ymin = ymin.min(coord.y);
        xmax = xmax.max(coord.x);
        ymax = ymax.max(coord.y);
    }

    Ok(BBox::new(xmin, ymin, xmax, ymax))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, LineString, Polygon};

    #[test]
    fn test_square_bounds() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 2.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0),
        ];

        assert_eq!(get_bounds(&square), Ok(BBox::new(0.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_irregular_ring() {
        let poly = polygon![
            (x: -3.5, y: 1.0),
            (x: 4.0, y: -2.0),
            (x: 1.0, y: 7.25),
        ];

        assert_eq!(get_bounds(&poly), Ok(BBox::new(-3.5, -2.0, 4.0, 7.25)));
    }

    #[test]
    fn test_interior_rings_ignored() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 2.0),
            ])],
        );

        assert_eq!(get_bounds(&poly), Ok(BBox::new(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn test_empty_ring_errors() {
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        assert_eq!(get_bounds(&empty), Err(EmptyBoundaryError));
    }
}
