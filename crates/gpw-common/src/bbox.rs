//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The whole globe, `[-180, -90, 180, 90]`.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Build from two opposite corners in any order, e.g. the
    /// `[west, north, east, south]` form of [`crate::GPW_BOUNDING_BOX`].
    pub fn from_corners(corners: [f64; 4]) -> Self {
        let [x0, y0, x1, y1] = corners;
        Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Build from a `[xmin, ymin, xmax, ymax]` slice, as passed on the command line.
    pub fn from_values(values: &[f64]) -> Result<Self, BboxParseError> {
        match values {
            [min_x, min_y, max_x, max_y] => Ok(Self::new(*min_x, *min_y, *max_x, *max_y)),
            _ => Err(BboxParseError::WrongArity(values.len())),
        }
    }

    /// Parse a comma separated string: "xmin,ymin,xmax,ymax"
    pub fn from_cli_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let values = parts
            .iter()
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_values(&values)
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when both axes have a positive, finite extent.
    pub fn is_valid(&self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        finite && self.min_x < self.max_x && self.min_y < self.max_y
    }

    /// Clamp this box to another, typically the global extent.
    pub fn clamp_to(&self, limits: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.max(limits.min_x),
            min_y: self.min_y.max(limits.min_y),
            max_x: self.max_x.min(limits.max_x),
            max_y: self.max_y.min(limits.max_y),
        }
    }

    /// `[xmin, ymin, xmax, ymax]`, the order used by GeoJSON and STAC `bbox`.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Closed counter-clockwise ring of five positions, starting at the
    /// lower-right corner.
    pub fn to_polygon(&self) -> Vec<[f64; 2]> {
        vec![
            [self.max_x, self.min_y],
            [self.max_x, self.max_y],
            [self.min_x, self.max_y],
            [self.min_x, self.min_y],
            [self.max_x, self.min_y],
        ]
    }

    /// Edge-by-edge comparison; every edge must differ by at most `tolerance`.
    pub fn matches_within(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.min_x - other.min_x).abs() <= tolerance
            && (self.min_y - other.min_y).abs() <= tolerance
            && (self.max_x - other.max_x).abs() <= tolerance
            && (self.max_y - other.max_y).abs() <= tolerance
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'xmin,ymin,xmax,ymax'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),

    #[error("A bbox needs exactly 4 values, got {0}")]
    WrongArity(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_bbox() {
        let bbox = BoundingBox::from_cli_string("-180,-77,-95,7").unwrap();
        assert_eq!(bbox.min_x, -180.0);
        assert_eq!(bbox.min_y, -77.0);
        assert_eq!(bbox.max_x, -95.0);
        assert_eq!(bbox.max_y, 7.0);
    }

    #[test]
    fn test_polygon_is_closed() {
        let ring = BoundingBox::new(0.0, 0.0, 10.0, 5.0).to_polygon();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
