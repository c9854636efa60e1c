//! The `gpw` command-line tool.
//!
//! Wraps the COG tile producer and the STAC record builders behind one
//! subcommand per operation.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command};
