use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Initialize a SPARC-aligned Roo Code workspace.
#[derive(Parser)]
#[command(name = "acf-sparc", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Copy the bundled template into a target directory.
    Init(InitArgs),
    /// Print JSON Schema for the `--json` event stream.
    Schema,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Directory to scaffold (created if absent).
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// Override the template directory instead of the one bundled next to the executable.
    #[arg(long, env = "ACF_SPARC_TEMPLATES", value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Report what would be copied without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Output structured JSON to stdout.
    #[arg(long)]
    pub json: bool,

    /// Give copied files the access and modification times of their template source.
    #[arg(long)]
    pub preserve_timestamps: bool,
}
