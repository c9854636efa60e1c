//! Output naming and GDAL argument vectors.
//!
//! These are pure functions so the exact command lines can be tested
//! without GDAL installed.

use std::path::{Path, PathBuf};

use gpw_common::{BoundingBox, GridSpec, TileGrid, COG_SUFFIX, EXPANDED_SUFFIX};

use crate::error::{CogError, Result};
use crate::options::CogOptions;

/// File stem of `path`, or an error for paths without one.
pub fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CogError::InvalidPath(path.to_path_buf()))
}

/// `<output_dir>/<stem>_cog.tif`
pub fn cog_output_path(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = file_stem(input)?;
    Ok(output_dir.join(format!("{}{}.tif", stem, COG_SUFFIX)))
}

/// `<scratch_dir>/<stem>_expanded.tif`
pub fn expanded_path(input: &Path, scratch_dir: &Path) -> Result<PathBuf> {
    let stem = file_stem(input)?;
    Ok(scratch_dir.join(format!("{}{}.tif", stem, EXPANDED_SUFFIX)))
}

/// Arguments for `gdal_translate` producing a COG.
pub fn translate_args(input: &Path, output: &Path, options: &CogOptions) -> Vec<String> {
    let mut args = vec![
        "-of".to_string(),
        "COG".to_string(),
        "-co".to_string(),
        format!("NUM_THREADS={}", options.num_threads),
        "-co".to_string(),
        format!("BLOCKSIZE={}", options.block_size),
        "-co".to_string(),
        "COMPRESS=DEFLATE".to_string(),
        "-co".to_string(),
        format!("LEVEL={}", options.deflate_level),
    ];
    if options.predictor {
        args.push("-co".to_string());
        args.push("PREDICTOR=YES".to_string());
    }
    if options.ignore_existing_overviews {
        args.push("-co".to_string());
        args.push("OVERVIEWS=IGNORE_EXISTING".to_string());
    }
    if let Some(nodata) = options.nodata {
        args.push("-a_nodata".to_string());
        args.push(nodata.to_string());
    }
    args.push(input.to_string_lossy().into_owned());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Arguments for `gdal_retile.py` splitting `input` into `target_dir`.
pub fn retile_args(input: &Path, target_dir: &Path, tiling: &TileGrid) -> Vec<String> {
    vec![
        "-ps".to_string(),
        tiling.tile_width.to_string(),
        tiling.tile_height.to_string(),
        "-targetDir".to_string(),
        target_dir.to_string_lossy().into_owned(),
        input.to_string_lossy().into_owned(),
    ]
}

/// Arguments for `gdalwarp` resampling `input` onto `grid`.
pub fn warp_args(input: &Path, output: &Path, grid: &GridSpec) -> Vec<String> {
    let BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    } = grid.bbox;
    vec![
        "-te".to_string(),
        min_x.to_string(),
        min_y.to_string(),
        max_x.to_string(),
        max_y.to_string(),
        "-ts".to_string(),
        grid.width.to_string(),
        grid.height.to_string(),
        "-co".to_string(),
        "COMPRESS=DEFLATE".to_string(),
        input.to_string_lossy().into_owned(),
        output.to_string_lossy().into_owned(),
    ]
}
