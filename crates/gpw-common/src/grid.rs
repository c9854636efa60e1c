//! The fixed grids GPW rasters are resampled onto and split into.

use std::num::NonZeroUsize;

use crate::constants::{EXPANDED_GRID_SIZE, TILING_PIXEL_SIZE};
use crate::BoundingBox;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TILE_WIDTH: NonZeroUsize = match NonZeroUsize::new(TILING_PIXEL_SIZE.0) {
    Some(n) => n,
    None => panic!("default tile width is zero"),
};
const DEFAULT_TILE_HEIGHT: NonZeroUsize = match NonZeroUsize::new(TILING_PIXEL_SIZE.1) {
    Some(n) => n,
    None => panic!("default tile height is zero"),
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Tile size must be non-zero, got {width} x {height}")]
    ZeroTileSize { width: usize, height: usize },
}

/// A regular lat/lon grid of `width` x `height` cells covering `bbox`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Geographic extent covered by the grid
    pub bbox: BoundingBox,
}

impl GridSpec {
    pub fn new(width: usize, height: usize, bbox: BoundingBox) -> Self {
        Self {
            width,
            height,
            bbox,
        }
    }

    /// The target grid used when expanding a raster onto `bbox`
    /// (43200 x 21600 cells, whatever the box).
    pub fn expanded(bbox: BoundingBox) -> Self {
        Self::new(EXPANDED_GRID_SIZE.0, EXPANDED_GRID_SIZE.1, bbox)
    }

    /// Cell size in degrees as `(dx, dy)`.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.bbox.width() / self.width as f64,
            self.bbox.height() / self.height as f64,
        )
    }

    /// Largest of the two cell dimensions; the tolerance for bounds checks.
    pub fn max_pixel_size(&self) -> f64 {
        let (dx, dy) = self.pixel_size();
        dx.abs().max(dy.abs())
    }
}

/// Pixel window of one tile in the parent raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWindow {
    /// 1-based tile row
    pub row: usize,
    /// 1-based tile column
    pub col: usize,
    pub x_off: usize,
    pub y_off: usize,
    pub width: usize,
    pub height: usize,
}

/// Fixed-size tiling scheme. Tiles are numbered from 1, row-major, and the
/// last row/column is clipped at the raster edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub tile_width: NonZeroUsize,
    pub tile_height: NonZeroUsize,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
        }
    }
}

impl TileGrid {
    /// Tiles of `tile_width` x `tile_height` pixels. Both must be non-zero.
    pub fn new(tile_width: usize, tile_height: usize) -> Result<Self, GridError> {
        match (NonZeroUsize::new(tile_width), NonZeroUsize::new(tile_height)) {
            (Some(tile_width), Some(tile_height)) => Ok(Self {
                tile_width,
                tile_height,
            }),
            _ => Err(GridError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            }),
        }
    }

    /// Number of tiles as `(rows, cols)` for a raster of the given size.
    pub fn tile_counts(&self, width: usize, height: usize) -> (usize, usize) {
        (
            height.div_ceil(self.tile_height.get()),
            width.div_ceil(self.tile_width.get()),
        )
    }

    /// Total number of tiles a raster splits into.
    pub fn tile_count(&self, width: usize, height: usize) -> usize {
        let (rows, cols) = self.tile_counts(width, height);
        rows * cols
    }

    /// Window for the 1-based tile `(row, col)`, or None when out of range.
    pub fn tile_window(
        &self,
        width: usize,
        height: usize,
        row: usize,
        col: usize,
    ) -> Option<TileWindow> {
        let (rows, cols) = self.tile_counts(width, height);
        if row == 0 || col == 0 || row > rows || col > cols {
            return None;
        }

        let (tile_width, tile_height) = (self.tile_width.get(), self.tile_height.get());
        let x_off = (col - 1) * tile_width;
        let y_off = (row - 1) * tile_height;

        Some(TileWindow {
            row,
            col,
            x_off,
            y_off,
            width: tile_width.min(width - x_off),
            height: tile_height.min(height - y_off),
        })
    }

    /// All tile windows in row-major order.
    pub fn windows(&self, width: usize, height: usize) -> Vec<TileWindow> {
        let (rows, cols) = self.tile_counts(width, height);
        (1..=rows)
            .flat_map(|row| (1..=cols).map(move |col| (row, col)))
            .filter_map(|(row, col)| self.tile_window(width, height, row, col))
            .collect()
    }

    /// File stem of a tile the way `gdal_retile.py` names it:
    /// `<stem>_<row>_<col>`, zero-padded to the digit count of the totals.
    pub fn tile_stem(&self, stem: &str, width: usize, height: usize, row: usize, col: usize) -> String {
        let (rows, cols) = self.tile_counts(width, height);
        let row_digits = rows.to_string().len();
        let col_digits = cols.to_string().len();
        format!(
            "{}_{:0rw$}_{:0cw$}",
            stem,
            row,
            col,
            rw = row_digits,
            cw = col_digits
        )
    }
}
