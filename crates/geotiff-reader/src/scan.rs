//! Sample scan deciding whether a raster holds any data.

use std::path::Path;

use num_traits::ToPrimitive;
use tiff::decoder::DecodingResult;
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{GeoTiffError, Result};
use crate::header::{open, read_nodata};

/// Returns true as soon as one sample is non-zero, not NaN, and not the
/// declared nodata value. Chunks (strips or tiles) are decoded one at a time
/// so a tile is never held in memory in full.
pub fn contains_data(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let mut decoder = open(path)?;
    let nodata = read_nodata(&mut decoder)?;

    let (width, height) = decoder.dimensions()?;
    let (chunk_width, chunk_height) = decoder.chunk_dimensions();
    if chunk_width == 0 || chunk_height == 0 {
        return Err(GeoTiffError::InvalidTag {
            tag: "TileWidth/RowsPerStrip",
            reason: "zero-sized chunk".to_string(),
        });
    }

    // Planar configuration 2 stores each band in its own set of chunks
    let planes = match decoder.find_tag_unsigned::<u16>(Tag::PlanarConfiguration)? {
        Some(2) => decoder
            .find_tag_unsigned::<u32>(Tag::SamplesPerPixel)?
            .unwrap_or(1),
        _ => 1,
    };
    let chunks = width.div_ceil(chunk_width) * height.div_ceil(chunk_height) * planes;

    for index in 0..chunks {
        let chunk = decoder.read_chunk(index)?;
        if chunk_has_data(&chunk, nodata)? {
            debug!(path = %path.display(), chunk = index, "Found data");
            return Ok(true);
        }
    }

    debug!(path = %path.display(), chunks, "No data in any chunk");
    Ok(false)
}

#[allow(unreachable_patterns)]
fn chunk_has_data(chunk: &DecodingResult, nodata: Option<f64>) -> Result<bool> {
    let found = match chunk {
        DecodingResult::U8(v) => any_present(v, nodata),
        DecodingResult::U16(v) => any_present(v, nodata),
        DecodingResult::U32(v) => any_present(v, nodata),
        DecodingResult::U64(v) => any_present(v, nodata),
        DecodingResult::I8(v) => any_present(v, nodata),
        DecodingResult::I16(v) => any_present(v, nodata),
        DecodingResult::I32(v) => any_present(v, nodata),
        DecodingResult::I64(v) => any_present(v, nodata),
        DecodingResult::F32(v) => any_present(v, nodata),
        DecodingResult::F64(v) => any_present(v, nodata),
        _ => {
            return Err(GeoTiffError::UnsupportedSampleFormat(
                "chunk sample type".to_string(),
            ))
        }
    };
    Ok(found)
}

fn any_present<T: ToPrimitive + Copy>(samples: &[T], nodata: Option<f64>) -> bool {
    samples
        .iter()
        .filter_map(|s| s.to_f64())
        .any(|value| is_present(value, nodata))
}

/// A sample counts as data unless it is zero, NaN, or the nodata value.
/// Nodata is also compared at f32 precision because GDAL writes float32
/// nodata values as their shortest decimal form.
pub(crate) fn is_present(value: f64, nodata: Option<f64>) -> bool {
    if value == 0.0 || value.is_nan() {
        return false;
    }
    match nodata {
        Some(nd) => value != nd && (value as f32) != (nd as f32),
        None => true,
    }
}
