//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// voxweb - spoken-command website generation sessions
#[derive(Parser)]
#[command(
    name = "voxweb",
    about = "Generate, materialize and serve static websites from free-form instructions",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an interactive generation session (default)
    Run {
        /// Instruction for the first iteration, skipping its capture prompt
        instruction: Option<String>,
    },

    /// Re-host a previously materialized site
    Serve {
        /// Iteration number whose site directory to serve (numbering starts at 1)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        iteration: u32,

        /// Port to bind (defaults to base-port + iteration - 1)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration
    Config,
}
