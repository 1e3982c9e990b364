use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ground - field data collection toolkit
#[derive(Parser, Debug)]
#[command(name = "ground")]
#[command(about = "Field data collection toolkit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a geometry between representations
    Convert(ConvertArgs),

    /// Replay a scripted polygon drawing session
    Draw(DrawArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

/// Geometry representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GeometryFormat {
    /// Document-store map as JSON
    Store,
    /// Protobuf bytes
    Wire,
    /// In-memory geometry as JSON
    Geometry,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,

    /// Representation of the input
    #[arg(long, value_enum)]
    pub from: GeometryFormat,

    /// Representation to produce
    #[arg(long, value_enum)]
    pub to: GeometryFormat,

    /// Write the result to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DrawArgs {
    /// Drawing script (TOML)
    pub script: PathBuf,

    /// Project to draw in, as an index into the user's project list
    #[arg(long, value_name = "INDEX")]
    pub project: Option<usize>,

    /// Override the snap-to-first-vertex threshold, in dp
    #[arg(long)]
    pub snap_threshold: Option<f64>,

    /// Override the user recorded in audit info
    #[arg(long)]
    pub user_email: Option<String>,
}
