//! Dataset-wide constants for the GPWv4 rasters.

/// Pixel size `(width, height)` of each tile produced by retiling.
pub const TILING_PIXEL_SIZE: (usize, usize) = (10001, 10001);

/// Target grid `(columns, rows)` when expanding a raster to a bounding box.
pub const EXPANDED_GRID_SIZE: (usize, usize) = (43200, 21600);

pub const GPW_EPSG: u32 = 4326;

/// Global extent in the `[west, north, east, south]` order GPW publishes.
pub const GPW_BOUNDING_BOX: [f64; 4] = [-180.0, 90.0, 180.0, -90.0];

pub const GPW_LICENSE: &str = "CC-BY-4.0";
pub const GPW_LICENSE_LINK: &str = "https://creativecommons.org/licenses/by/4.0/legalcode";
pub const GPW_LICENSE_TITLE: &str = "Creative Commons Attribution 4.0 International";

pub const GPW_PROVIDER_NAME: &str =
    "Center for International Earth Science Information Network - CIESIN - Columbia University";
pub const GPW_PROVIDER_URL: &str =
    "https://sedac.ciesin.columbia.edu/data/set/gpw-v4-population-count-rev11";
pub const GPW_PROVIDER_ROLES: &[&str] = &["producer", "processor", "host"];

/// Suffix appended to a raster's stem for its cloud-optimized copy.
pub const COG_SUFFIX: &str = "_cog";

/// Suffix of the intermediate raster written by bounding-box expansion.
pub const EXPANDED_SUFFIX: &str = "_expanded";
