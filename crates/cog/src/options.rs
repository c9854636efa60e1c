//! Conversion options and run policies.

/// What to do when a conversion step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and return it to the caller, aborting remaining tiles.
    #[default]
    Strict,
    /// Log the failure, record it in the outcome, and carry on.
    BestEffort,
}

/// Whether steps actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Execute,
    /// Log what would happen without touching the filesystem or running tools.
    DryRun,
}

/// Creation options passed to the COG driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CogOptions {
    pub block_size: u32,
    /// DEFLATE level, 1-9
    pub deflate_level: u8,
    /// Horizontal differencing predictor
    pub predictor: bool,
    /// Rebuild overviews instead of reusing ones present in the source
    pub ignore_existing_overviews: bool,
    pub num_threads: String,
    /// Value written as the output nodata (`-a_nodata`)
    pub nodata: Option<f64>,
}

impl Default for CogOptions {
    fn default() -> Self {
        Self {
            block_size: 512,
            deflate_level: 9,
            predictor: true,
            ignore_existing_overviews: true,
            num_threads: "ALL_CPUS".to_string(),
            nodata: Some(0.0),
        }
    }
}

impl CogOptions {
    /// Options for tiles cut from an expanded raster, which keep the nodata
    /// value chosen by the resampling step.
    pub fn for_expanded() -> Self {
        Self {
            nodata: None,
            ..Self::default()
        }
    }

    /// Same options without the nodata override.
    pub fn without_nodata(&self) -> Self {
        Self {
            nodata: None,
            ..self.clone()
        }
    }
}
