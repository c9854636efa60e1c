//! Error types for GeoTIFF reading.

use thiserror::Error;

/// Errors that can occur while decoding a GeoTIFF.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF decoding error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Missing GeoTIFF tag: {0}")]
    MissingTag(&'static str),

    #[error("Invalid GeoTIFF tag {tag}: {reason}")]
    InvalidTag { tag: &'static str, reason: String },

    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),
}

pub type Result<T> = std::result::Result<T, GeoTiffError>;
