//! Shared test utilities for the gpw-stac workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic GeoTIFF writing (no GDAL needed)
//! - Skip macros for tests that need the GDAL command-line tools or network
//!   access to the STAC schemas
//! - Grid data generators
//! - GPW file name and bounding box fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_tool, fixtures, TestGeoTiff};
//! ```

pub mod fixtures;
pub mod generators;
pub mod geotiff;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use geotiff::*;
pub use paths::*;

/// Macro to skip a test if an external program is not on `PATH`.
///
/// The GDAL tools are not installed in every environment, so tests that
/// exercise the real conversion path bail out early instead of failing.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_tool;
///
/// #[tokio::test]
/// async fn test_real_expansion() {
///     let gdalwarp = require_tool!("gdalwarp");
///     // Test code using the resolved path...
/// }
/// ```
#[macro_export]
macro_rules! require_tool {
    ($name:expr) => {{
        match $crate::find_program($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: '{}' not found on PATH. Install GDAL to run this test.", $name);
                return;
            }
        }
    }};
}

/// Macro to skip a test when the STAC extension schemas are unreachable.
///
/// Schema validation downloads each extension's JSON Schema, so it only runs
/// with network access.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_network;
///
/// #[tokio::test]
/// async fn test_written_item_validates() {
///     require_network!();
///     // Test code that validates records...
/// }
/// ```
#[macro_export]
macro_rules! require_network {
    () => {{
        if !$crate::network_available($crate::SCHEMA_HOST) {
            eprintln!(
                "SKIPPED: '{}' is unreachable. Network access is needed to validate STAC records.",
                $crate::SCHEMA_HOST
            );
            return;
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
