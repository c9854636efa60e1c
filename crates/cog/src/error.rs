//! Error types for the cog crate.

use std::path::PathBuf;

use geotiff_reader::GeoTiffError;
use thiserror::Error;

/// Errors that can occur while producing COGs.
#[derive(Error, Debug)]
pub enum CogError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Destination directory does not exist: {}", .0.display())]
    MissingDestination(PathBuf),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed (exit code {exit_code:?}): {output}")]
    Tool {
        program: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid input path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to read raster: {0}")]
    Raster(#[from] GeoTiffError),

    #[error("Failed to list tiles: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for COG operations.
pub type Result<T> = std::result::Result<T, CogError>;
