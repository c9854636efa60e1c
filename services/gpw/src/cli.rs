//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{LogArgs, ToolArgs};

#[derive(Parser, Debug)]
#[command(name = "gpw")]
#[command(about = "Convert Gridded Population of the World rasters to COGs and STAC records")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub tools: ToolArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a GPW raster to COG, optionally tiled
    #[command(alias = "create-cog")]
    ConvertToCog(ConvertArgs),

    /// Write the population count collection
    CreateCollection(CollectionArgs),

    /// Write the population count and density collection
    CreatePopCollection(CollectionArgs),

    /// Write the ancillary collection
    CreateAncCollection(CollectionArgs),

    /// Write an item from the five population count COGs
    CreateItem(ItemArgs),

    /// Write an item from the four population COGs of one year
    CreatePopItem(ItemArgs),

    /// Write an item from the twelve ancillary COGs
    CreateAncItem(ItemArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Directory that receives the COGs
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Source GPW raster
    #[arg(short, long)]
    pub source: PathBuf,

    /// Split into 10001 x 10001 pixel tiles, dropping empty ones
    #[arg(long)]
    pub tile: bool,

    /// Resample onto this box at 43200 x 21600 before tiling
    #[arg(
        long,
        num_args = 4,
        value_names = ["XMIN", "YMIN", "XMAX", "YMAX"],
        allow_negative_numbers = true
    )]
    pub expand_bbox: Option<Vec<f64>>,

    /// Keep going after a failed tile and report failures at the end
    #[arg(long)]
    pub best_effort: bool,

    /// Log the steps without running any tool
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CollectionArgs {
    /// Output directory, or a `.json` file path
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Check the written collection against the STAC JSON schemas
    #[arg(long)]
    pub validate: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ItemArgs {
    /// Output directory
    #[arg(short, long)]
    pub destination: PathBuf,

    /// COG hrefs, one per asset of the dataset
    #[arg(short, long, num_args = 1.., required = true)]
    pub cog: Vec<String>,

    /// Check the written item against the STAC JSON schemas
    #[arg(long)]
    pub validate: bool,
}
