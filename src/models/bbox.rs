//! Axis-aligned bounding box used for spatial search constraints.

use serde::{Deserialize, Serialize};

/// Bounding box as `(xmin, ymin, xmax, ymax)`.
///
/// Holds `xmin <= xmax` and `ymin <= ymax` when built from a well-formed
/// ring or rect; `new` does not reorder its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Parse a bbox string "xmin,ymin,xmax,ymax"
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
        if parts.len() == 4 {
            Some(Self::new(parts[0], parts[1], parts[2], parts[3]))
        } else {
            None
        }
    }

    /// Render as the "xmin,ymin,xmax,ymax" form upstream catalogs accept.
    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

impl From<geo_types::Rect<f64>> for BBox {
    fn from(rect: geo_types::Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let bbox = BBox::parse("-76.5,39.7,-74.2,41.1").unwrap();
        assert_eq!(bbox, BBox::new(-76.5, 39.7, -74.2, 41.1));
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(BBox::parse("1,2,3").is_none());
        assert!(BBox::parse("").is_none());
        assert!(BBox::parse("a,b,c,d").is_none());
    }

    #[test]
    fn test_to_param_round_trip() {
        let bbox = BBox::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(BBox::parse(&bbox.to_param()), Some(bbox));
    }

    #[test]
    fn test_from_rect() {
        let rect = geo_types::Rect::new(
            geo_types::coord! { x: 2.0, y: 3.0 },
            geo_types::coord! { x: 0.0, y: 1.0 },
        );
        assert_eq!(BBox::from(rect), BBox::new(0.0, 1.0, 2.0, 3.0));
    }
}
