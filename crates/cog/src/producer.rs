//! Tile producer: single-raster conversion, bounding-box expansion, and
//! retiling with the empty-tile filter.

use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};
use walkdir::WalkDir;

use geotiff_reader::contains_data;
use gpw_common::{BoundingBox, GridSpec, TileGrid, EXPANDED_SUFFIX};

use crate::args::{cog_output_path, expanded_path};
use crate::error::{CogError, Result};
use crate::options::{CogOptions, FailurePolicy, RunMode};
use crate::tools::{RasterTools, ToolOutput};

/// Parameters of one `produce` call.
#[derive(Debug, Clone)]
pub struct ProduceRequest {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Split into fixed-size tiles before converting
    pub tile: bool,
    /// Resample onto this box before tiling
    pub expand_bbox: Option<BoundingBox>,
}

/// What happened to one output COG.
#[derive(Debug, Clone, PartialEq)]
pub enum CogStatus {
    Converted,
    /// Nothing was run; the path is where the COG would go
    DryRun,
    /// The step failed under [`FailurePolicy::BestEffort`]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CogOutcome {
    pub path: PathBuf,
    pub status: CogStatus,
}

/// Result of a `produce` or `create_retiled_cogs` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProduceOutcome {
    pub cogs: Vec<CogOutcome>,
    /// File names of tiles discarded because they held no data
    pub empty_tiles: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ProduceOutcome {
    /// Paths of the COGs that were actually written.
    pub fn written(&self) -> Vec<&Path> {
        self.cogs
            .iter()
            .filter(|c| c.status == CogStatus::Converted)
            .map(|c| c.path.as_path())
            .collect()
    }

    pub fn failures(&self) -> Vec<&CogOutcome> {
        self.cogs
            .iter()
            .filter(|c| matches!(c.status, CogStatus::Failed(_)))
            .collect()
    }
}

/// Converts GPW rasters into Cloud Optimized GeoTIFFs.
///
/// Every step goes through the injected [`RasterTools`]; the producer owns
/// naming, scratch space, the empty-tile filter, and the failure policy.
pub struct TileProducer<T: RasterTools> {
    tools: T,
    options: CogOptions,
    policy: FailurePolicy,
    mode: RunMode,
    tiling: TileGrid,
}

impl<T: RasterTools> TileProducer<T> {
    pub fn new(tools: T, options: CogOptions, policy: FailurePolicy, mode: RunMode) -> Self {
        Self {
            tools,
            options,
            policy,
            mode,
            tiling: TileGrid::default(),
        }
    }

    /// Override the tile size (10001 x 10001 by default).
    pub fn with_tiling(mut self, tiling: TileGrid) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    fn is_dry_run(&self) -> bool {
        self.mode == RunMode::DryRun
    }

    /// Convert or tile one raster into `request.output_dir`.
    ///
    /// Fails with [`CogError::MissingDestination`] before doing anything if
    /// the output directory doesn't exist.
    #[instrument(skip_all, fields(input = %request.input.display(), tile = request.tile))]
    pub async fn produce(&self, request: &ProduceRequest) -> Result<ProduceOutcome> {
        if !request.output_dir.is_dir() {
            return Err(CogError::MissingDestination(request.output_dir.clone()));
        }

        if request.tile {
            return self
                .create_retiled_cogs(&request.input, &request.output_dir, request.expand_bbox)
                .await;
        }

        if request.expand_bbox.is_some() {
            warn!("Bounding box expansion only applies when tiling; ignoring it");
        }

        let output = cog_output_path(&request.input, &request.output_dir)?;
        let outcome = self.create_cog(&request.input, &output).await?;
        Ok(ProduceOutcome {
            cogs: vec![outcome],
            empty_tiles: Vec::new(),
            dry_run: self.is_dry_run(),
        })
    }

    /// Convert a single raster to a COG at `output`.
    pub async fn create_cog(&self, input: &Path, output: &Path) -> Result<CogOutcome> {
        self.convert(input, output, &self.options).await
    }

    async fn convert(&self, input: &Path, output: &Path, options: &CogOptions) -> Result<CogOutcome> {
        if self.is_dry_run() {
            info!(
                input = %input.display(),
                output = %output.display(),
                "Dry run: would convert to COG"
            );
            return Ok(CogOutcome {
                path: output.to_path_buf(),
                status: CogStatus::DryRun,
            });
        }

        let result = match self.tools.translate(input, output, options).await {
            Ok(run) => log_tool_output(run).into_result(),
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                info!(output = %output.display(), "Wrote COG");
                Ok(CogOutcome {
                    path: output.to_path_buf(),
                    status: CogStatus::Converted,
                })
            }
            Err(e) => {
                let status = self.on_failure(input, e)?;
                Ok(CogOutcome {
                    path: output.to_path_buf(),
                    status,
                })
            }
        }
    }

    /// Resample `input` onto the fixed 43200 x 21600 grid over `bbox`,
    /// writing `<scratch_dir>/<stem>_expanded.tif`.
    ///
    /// Always strict: any failure is returned to the caller.
    #[instrument(skip_all, fields(input = %input.display(), bbox = %bbox))]
    pub async fn expand(&self, input: &Path, scratch_dir: &Path, bbox: BoundingBox) -> Result<PathBuf> {
        if !bbox.is_valid() {
            return Err(CogError::InvalidBbox(bbox.to_string()));
        }

        let output = expanded_path(input, scratch_dir)?;
        if self.is_dry_run() {
            info!(output = %output.display(), "Dry run: would expand raster");
            return Ok(output);
        }

        let grid = GridSpec::expanded(bbox);
        let run = self.tools.warp(input, &output, &grid).await?;
        log_tool_output(run).into_result()?;

        info!(output = %output.display(), "Expanded raster");
        Ok(output)
    }

    /// Split `input` into tiles and convert every tile that holds data.
    ///
    /// Tiles and the expanded raster live in a temporary directory that is
    /// removed when this returns, whether it succeeds or not.
    #[instrument(skip_all, fields(input = %input.display()))]
    pub async fn create_retiled_cogs(
        &self,
        input: &Path,
        output_dir: &Path,
        expand_bbox: Option<BoundingBox>,
    ) -> Result<ProduceOutcome> {
        let mut outcome = ProduceOutcome {
            dry_run: self.is_dry_run(),
            ..ProduceOutcome::default()
        };

        if self.is_dry_run() {
            info!(
                output_dir = %output_dir.display(),
                tile_width = self.tiling.tile_width.get(),
                tile_height = self.tiling.tile_height.get(),
                expand = expand_bbox.is_some(),
                "Dry run: would retile and convert"
            );
            return Ok(outcome);
        }

        let scratch = tempfile::tempdir()?;

        let (tiling_input, options) = match expand_bbox {
            Some(bbox) => match self.expand(input, scratch.path(), bbox).await {
                Ok(expanded) => (expanded, self.options.without_nodata()),
                Err(e) => {
                    let status = self.on_failure(input, e)?;
                    outcome.cogs.push(CogOutcome {
                        path: input.to_path_buf(),
                        status,
                    });
                    return Ok(outcome);
                }
            },
            None => (input.to_path_buf(), self.options.clone()),
        };

        let retiled = match self
            .tools
            .retile(&tiling_input, scratch.path(), &self.tiling)
            .await
        {
            Ok(run) => log_tool_output(run).into_result(),
            Err(e) => Err(e),
        };
        if let Err(e) = retiled {
            let status = self.on_failure(input, e)?;
            outcome.cogs.push(CogOutcome {
                path: input.to_path_buf(),
                status,
            });
            return Ok(outcome);
        }

        let tiles = list_tiles(scratch.path())?;
        info!(tiles = tiles.len(), "Retiled raster");

        for tile in tiles {
            let output = cog_output_path(&tile, output_dir)?;

            match contains_data(&tile) {
                Ok(true) => {}
                Ok(false) => {
                    info!(tile = %tile.display(), "Discarding empty tile");
                    if let Some(name) = tile.file_name() {
                        outcome.empty_tiles.push(PathBuf::from(name));
                    }
                    continue;
                }
                Err(e) => {
                    let status = self.on_failure(&tile, e.into())?;
                    outcome.cogs.push(CogOutcome {
                        path: output,
                        status,
                    });
                    continue;
                }
            }

            let converted = self.convert(&tile, &output, &options).await?;
            outcome.cogs.push(converted);
        }

        info!(
            written = outcome.written().len(),
            empty = outcome.empty_tiles.len(),
            failed = outcome.failures().len(),
            "Finished retiled COGs"
        );
        Ok(outcome)
    }

    /// Log a failed step and apply the failure policy: strict returns the
    /// error, best-effort turns it into a recorded status.
    fn on_failure(&self, path: &Path, e: CogError) -> Result<CogStatus> {
        error!(path = %path.display(), error = %e, "COG step failed");
        match self.policy {
            FailurePolicy::Strict => Err(e),
            FailurePolicy::BestEffort => {
                warn!(path = %path.display(), "Continuing in best-effort mode");
                Ok(CogStatus::Failed(e.to_string()))
            }
        }
    }
}

/// Log captured tool output, success or not.
fn log_tool_output(run: ToolOutput) -> ToolOutput {
    let text = run.output.trim();
    if !text.is_empty() {
        info!(
            program = %run.program,
            success = run.success,
            exit_code = ?run.exit_code,
            "{}",
            text
        );
    }
    run
}

/// `*.tif` files directly inside `dir`, sorted, skipping the expanded
/// intermediate raster. Tiles cut from it (`<stem>_expanded_<row>_<col>`)
/// are kept.
fn list_tiles(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut tiles = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_tif = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("tif"))
            .unwrap_or(false);
        let is_expanded = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(EXPANDED_SUFFIX))
            .unwrap_or(false);
        if is_tif && !is_expanded {
            tiles.push(path.to_path_buf());
        }
    }
    tiles.sort();
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tiles_skips_expanded_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "pop_2_1.tif",
            "pop_1_1.tif",
            "pop_expanded.tif",
            "pop_expanded_1_1.tif",
            "pop_1_2.TIF",
            "tiles.csv",
        ] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.tif")).unwrap();

        let names: Vec<String> = list_tiles(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "pop_1_1.tif",
                "pop_1_2.TIF",
                "pop_2_1.tif",
                "pop_expanded_1_1.tif"
            ]
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = ProduceOutcome {
            cogs: vec![
                CogOutcome {
                    path: PathBuf::from("a_cog.tif"),
                    status: CogStatus::Converted,
                },
                CogOutcome {
                    path: PathBuf::from("b_cog.tif"),
                    status: CogStatus::Failed("boom".to_string()),
                },
            ],
            empty_tiles: vec![],
            dry_run: false,
        };
        assert_eq!(outcome.written(), vec![Path::new("a_cog.tif")]);
        assert_eq!(outcome.failures().len(), 1);
    }
}
