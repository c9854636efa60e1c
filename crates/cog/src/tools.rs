//! External raster tools.
//!
//! The conversion engine is GDAL's command-line suite. [`RasterTools`] is the
//! seam between the tile producer and the processes it runs; [`GdalTools`]
//! is the real implementation.

use std::env;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use gpw_common::{GridSpec, TileGrid};

use crate::args::{retile_args, translate_args, warp_args};
use crate::error::{CogError, Result};
use crate::options::CogOptions;

/// Captured diagnostics of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub program: String,
    pub args: Vec<String>,
    pub success: bool,
    pub exit_code: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
}

impl ToolOutput {
    /// A successful run with no output.
    pub fn ok(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            success: true,
            exit_code: Some(0),
            output: String::new(),
        }
    }

    /// Turn a failed run into [`CogError::Tool`].
    pub fn into_result(self) -> Result<ToolOutput> {
        if self.success {
            Ok(self)
        } else {
            Err(CogError::Tool {
                program: self.program,
                exit_code: self.exit_code,
                output: self.output.trim().to_string(),
            })
        }
    }
}

/// The three raster operations the pipeline needs.
///
/// Implementations report a tool that ran and failed through
/// `ToolOutput::success`; `Err` is reserved for not being able to run it.
#[async_trait]
pub trait RasterTools: Send + Sync {
    /// Convert `input` into a Cloud Optimized GeoTIFF at `output`.
    async fn translate(&self, input: &Path, output: &Path, options: &CogOptions)
        -> Result<ToolOutput>;

    /// Split `input` into tiles written to `target_dir`.
    async fn retile(&self, input: &Path, target_dir: &Path, tiling: &TileGrid)
        -> Result<ToolOutput>;

    /// Resample `input` onto `grid`, writing `output`.
    async fn warp(&self, input: &Path, output: &Path, grid: &GridSpec) -> Result<ToolOutput>;
}

/// Names or paths of the GDAL executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub gdal_translate: String,
    pub gdal_retile: String,
    pub gdalwarp: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            gdal_translate: "gdal_translate".to_string(),
            gdal_retile: "gdal_retile.py".to_string(),
            gdalwarp: "gdalwarp".to_string(),
        }
    }
}

impl ToolConfig {
    /// Load from `GPW_GDAL_TRANSLATE`, `GPW_GDAL_RETILE` and `GPW_GDALWARP`,
    /// falling back to the executables on `PATH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            gdal_translate: env::var("GPW_GDAL_TRANSLATE").unwrap_or(defaults.gdal_translate),
            gdal_retile: env::var("GPW_GDAL_RETILE").unwrap_or(defaults.gdal_retile),
            gdalwarp: env::var("GPW_GDALWARP").unwrap_or(defaults.gdalwarp),
        }
    }
}

/// Runs the GDAL command-line tools as child processes.
#[derive(Debug, Clone, Default)]
pub struct GdalTools {
    config: ToolConfig,
}

impl GdalTools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    async fn run(&self, program: &str, args: Vec<String>) -> Result<ToolOutput> {
        debug!(program = %program, args = ?args, "Running external tool");

        let output = Command::new(program)
            .args(&args)
            .output()
            .await
            .map_err(|source| CogError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolOutput {
            program: program.to_string(),
            args,
            success: output.status.success(),
            exit_code: output.status.code(),
            output: text,
        })
    }
}

#[async_trait]
impl RasterTools for GdalTools {
    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        options: &CogOptions,
    ) -> Result<ToolOutput> {
        self.run(
            &self.config.gdal_translate,
            translate_args(input, output, options),
        )
        .await
    }

    async fn retile(
        &self,
        input: &Path,
        target_dir: &Path,
        tiling: &TileGrid,
    ) -> Result<ToolOutput> {
        self.run(
            &self.config.gdal_retile,
            retile_args(input, target_dir, tiling),
        )
        .await
    }

    async fn warp(&self, input: &Path, output: &Path, grid: &GridSpec) -> Result<ToolOutput> {
        self.run(&self.config.gdalwarp, warp_args(input, output, grid))
            .await
    }
}
