//! Common types and constants shared across the GPW tiling and cataloging crates.

pub mod bbox;
pub mod constants;
pub mod crs;
pub mod grid;
pub mod time;

pub use bbox::{BboxParseError, BoundingBox};
pub use constants::*;
pub use crs::{CrsCode, CrsParseError};
pub use grid::{GridError, GridSpec, TileGrid, TileWindow};
pub use time::{TimeParseError, TimeRange};
