//! Error types for catalog record building.

use std::path::PathBuf;

use thiserror::Error;

use geotiff_reader::GeoTiffError;
use gpw_common::{CrsParseError, TimeParseError};

/// Errors that can occur while building, writing or validating STAC records.
#[derive(Debug, Error)]
pub enum StacError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Raster error: {0}")]
    Raster(#[from] GeoTiffError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Time error: {0}")]
    Time(#[from] TimeParseError),

    #[error("CRS error: {0}")]
    Crs(#[from] CrsParseError),

    #[error("Invalid GPW file name '{path}': {reason}")]
    InvalidFileName { path: String, reason: String },

    #[error("{dataset} items need {expected} COG hrefs, got {actual}")]
    WrongAssetCount {
        dataset: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No {dataset} asset matches '{href}'")]
    UnknownAsset { dataset: &'static str, href: String },

    #[error("Asset '{key}' given twice: '{first}' and '{second}'")]
    DuplicateAsset {
        key: &'static str,
        first: String,
        second: String,
    },

    #[error("COG hrefs disagree on {what}: {detail}")]
    MismatchedGroup { what: &'static str, detail: String },

    #[error("Year {year} is outside the {dataset} range {start}-{end}")]
    YearOutOfRange {
        dataset: &'static str,
        year: i32,
        start: i32,
        end: i32,
    },

    #[error("Cannot read a raster header from remote href '{0}'")]
    RemoteRaster(String),

    #[error("Size of '{href}' is unavailable: {reason}")]
    SizeUnavailable { href: String, reason: String },

    #[error("Destination '{0}' not found")]
    MissingDestination(PathBuf),

    #[error("STAC error: {0}")]
    Stac(#[from] stac::Error),

    #[error("Unknown STAC record type: {0}")]
    UnknownRecordType(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, StacError>;
