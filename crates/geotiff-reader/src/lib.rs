//! GeoTIFF header decoding and sample scanning.
//!
//! Reads what the catalog builder needs from a raster (size, affine
//! transform, EPSG code, sample type, sampling convention, nodata) and
//! answers whether a tile holds any population data at all. Everything is
//! decoded with the pure Rust `tiff` crate.

pub mod error;
pub mod header;
pub mod scan;
pub mod transform;

pub use error::{GeoTiffError, Result};
pub use header::{RasterDataType, RasterHeader, Sampling};
pub use scan::contains_data;
pub use transform::GeoTransform;
