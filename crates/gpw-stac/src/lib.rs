//! STAC catalog records for the Gridded Population of the World COGs.
//!
//! Three GPW datasets are catalogued: the population counts of each census
//! year (2000 to 2020) at five resolutions, the population count and density
//! grids of each census year, and the 2010 ancillary grids. For each, a
//! collection describes the whole dataset and an item groups one COG per
//! asset of a single year and tile.
//!
//! # Example
//!
//! ```ignore
//! use gpw_stac::{write_item, DatasetKind, ItemBuilder};
//!
//! let builder = ItemBuilder::new(DatasetKind::Population)?;
//! let item = builder.build(&hrefs).await?;
//! write_item(&item, Path::new("stac"))?;
//! ```

pub mod assets;
pub mod collection;
pub mod dataset;
pub mod error;
pub mod filename;
pub mod item;
pub mod model;
pub mod persist;
pub mod size;
pub mod validate;

pub use assets::{match_asset, AssetDefinition};
pub use collection::build_collection;
pub use dataset::{Dataset, DatasetKind};
pub use error::{Result, StacError};
pub use filename::{GpwFileName, TileIndex};
pub use item::ItemBuilder;
pub use model::{Asset, Collection, Item, Link};
pub use persist::{relative_href, write_collection, write_item};
pub use size::SizeProbe;
pub use validate::{read_and_validate, validate_collection, validate_item};
