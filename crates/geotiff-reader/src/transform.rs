//! Affine geotransform of a raster.

use gpw_common::BoundingBox;
use serde::{Deserialize, Serialize};

/// Pixel-to-world affine transform in rasterio coefficient order:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// The transform maps pixel corners (area convention), so `(c, f)` is the
/// upper-left corner of the upper-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl GeoTransform {
    /// North-up transform from an origin and positive cell sizes.
    pub fn north_up(origin_x: f64, origin_y: f64, dx: f64, dy: f64) -> Self {
        Self {
            a: dx,
            b: 0.0,
            c: origin_x,
            d: 0.0,
            e: -dy,
            f: origin_y,
        }
    }

    /// Build from ModelPixelScaleTag `[sx, sy, sz]` and the first
    /// ModelTiepointTag `[i, j, k, x, y, z]`.
    pub fn from_scale_and_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        let (sx, sy) = (scale[0], scale[1]);
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);

        Some(Self {
            a: sx,
            b: 0.0,
            c: x - i * sx,
            d: 0.0,
            e: -sy,
            f: y + j * sy,
        })
    }

    /// Build from the 4x4 row-major ModelTransformationTag.
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Self {
            a: matrix[0],
            b: matrix[1],
            c: matrix[3],
            d: matrix[4],
            e: matrix[5],
            f: matrix[7],
        })
    }

    /// Shift the origin by half a pixel so that a PixelIsPoint raster is
    /// described by its cell corners.
    pub fn point_to_area(&self) -> Self {
        Self {
            c: self.c - 0.5 * self.a - 0.5 * self.b,
            f: self.f - 0.5 * self.d - 0.5 * self.e,
            ..*self
        }
    }

    /// World coordinates of pixel corner `(col, row)`.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Bounds of a `width` x `height` raster under this transform.
    pub fn bounds(&self, width: usize, height: usize) -> BoundingBox {
        let (w, h) = (width as f64, height as f64);
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(0.0, h),
            self.apply(w, h),
        ];

        let mut bbox = BoundingBox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in corners {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    /// The nine-value list stored in `proj:transform`.
    pub fn to_proj_transform(&self) -> [f64; 9] {
        [self.a, self.b, self.c, self.d, self.e, self.f, 0.0, 0.0, 1.0]
    }

    /// Cell size as positive `(dx, dy)` for north-up rasters.
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.a.abs(), self.e.abs())
    }
}
