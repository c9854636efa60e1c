//! Command implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use cog::{
    CogOptions, FailurePolicy, GdalTools, ProduceOutcome, ProduceRequest, RasterTools, RunMode,
    TileProducer,
};
use gpw_common::BoundingBox;
use gpw_stac::{
    build_collection, read_and_validate, write_collection, write_item, DatasetKind, ItemBuilder,
};

use crate::cli::{Cli, CollectionArgs, Command, ConvertArgs, ItemArgs};

/// Run the parsed command line, returning the paths written.
pub async fn run(cli: &Cli) -> Result<Vec<PathBuf>> {
    let (path, validate) = match &cli.command {
        Command::ConvertToCog(args) => {
            let tools = GdalTools::new(cli.tools.resolve());
            let outcome = convert_to_cog(tools, args).await?;
            return Ok(outcome.written().into_iter().map(Path::to_path_buf).collect());
        }
        Command::CreateCollection(args) => {
            (create_collection(DatasetKind::Count, args)?, args.validate)
        }
        Command::CreatePopCollection(args) => {
            (create_collection(DatasetKind::Population, args)?, args.validate)
        }
        Command::CreateAncCollection(args) => {
            (create_collection(DatasetKind::Ancillary, args)?, args.validate)
        }
        Command::CreateItem(args) => (create_item(DatasetKind::Count, args).await?, args.validate),
        Command::CreatePopItem(args) => {
            (create_item(DatasetKind::Population, args).await?, args.validate)
        }
        Command::CreateAncItem(args) => {
            (create_item(DatasetKind::Ancillary, args).await?, args.validate)
        }
    };
    if validate {
        validate_written(&path).await?;
    }
    Ok(vec![path])
}

/// Re-read a written record and check it against the STAC JSON schemas.
pub async fn validate_written(path: &Path) -> Result<()> {
    read_and_validate(path)
        .await
        .with_context(|| format!("{} is not a valid STAC record", path.display()))?;
    info!(path = %path.display(), "STAC record is valid");
    Ok(())
}

/// Expansion box from the four `--expand-bbox` values.
pub fn expand_bbox(args: &ConvertArgs) -> Result<Option<BoundingBox>> {
    args.expand_bbox
        .as_deref()
        .map(|values| BoundingBox::from_values(values).context("Invalid --expand-bbox"))
        .transpose()
}

/// Convert or tile one raster with the given tools.
pub async fn convert_to_cog<T: RasterTools>(tools: T, args: &ConvertArgs) -> Result<ProduceOutcome> {
    let policy = if args.best_effort {
        FailurePolicy::BestEffort
    } else {
        FailurePolicy::Strict
    };
    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Execute
    };
    let request = ProduceRequest {
        input: args.source.clone(),
        output_dir: args.destination.clone(),
        tile: args.tile,
        expand_bbox: expand_bbox(args)?,
    };

    let producer = TileProducer::new(tools, CogOptions::default(), policy, mode);
    let outcome = producer
        .produce(&request)
        .await
        .with_context(|| format!("Failed to convert {}", args.source.display()))?;

    info!(
        written = outcome.written().len(),
        empty_tiles = outcome.empty_tiles.len(),
        dry_run = outcome.dry_run,
        "Conversion finished"
    );

    // Failures only reach this point in best-effort mode
    for failure in outcome.failures() {
        warn!(path = %failure.path.display(), status = ?failure.status, "Conversion failed");
    }
    Ok(outcome)
}

pub fn create_collection(kind: DatasetKind, args: &CollectionArgs) -> Result<PathBuf> {
    let collection = build_collection(kind)?;
    let path = write_collection(&collection, &args.destination)
        .with_context(|| format!("Failed to write {} collection", kind))?;
    Ok(path)
}

pub async fn create_item(kind: DatasetKind, args: &ItemArgs) -> Result<PathBuf> {
    if !args.destination.is_dir() {
        bail!(
            "Destination directory does not exist: {}",
            args.destination.display()
        );
    }
    let item = ItemBuilder::new(kind)?
        .build(&args.cog)
        .await
        .with_context(|| format!("Failed to build {} item", kind))?;
    let path = write_item(&item, &args.destination)?;
    Ok(path)
}
