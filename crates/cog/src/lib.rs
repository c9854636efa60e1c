//! Cloud Optimized GeoTIFF production for GPW rasters.
//!
//! A global GPW raster is optionally resampled onto a bounding box at the
//! fixed 43200 x 21600 grid, split into 10001 x 10001 pixel tiles, filtered
//! for tiles that hold no population data, and each remaining tile is
//! converted to a DEFLATE-compressed COG. The raster work itself is done by
//! the GDAL command-line tools behind the [`RasterTools`] trait.
//!
//! # Example
//!
//! ```ignore
//! use cog::{CogOptions, FailurePolicy, GdalTools, ProduceRequest, RunMode, TileProducer};
//!
//! let producer = TileProducer::new(
//!     GdalTools::default(),
//!     CogOptions::default(),
//!     FailurePolicy::Strict,
//!     RunMode::Execute,
//! );
//! let outcome = producer.produce(&ProduceRequest {
//!     input: "gpw_v4_population_count_rev11_2020_30_sec.tif".into(),
//!     output_dir: "cogs".into(),
//!     tile: true,
//!     expand_bbox: None,
//! }).await?;
//! ```

pub mod args;
pub mod error;
pub mod options;
pub mod producer;
pub mod tools;

pub use args::{cog_output_path, expanded_path, retile_args, translate_args, warp_args};
pub use error::{CogError, Result};
pub use options::{CogOptions, FailurePolicy, RunMode};
pub use producer::{CogOutcome, CogStatus, ProduceOutcome, ProduceRequest, TileProducer};
pub use tools::{GdalTools, RasterTools, ToolConfig, ToolOutput};
