use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available bale subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle the descriptor's entry into every declared output
    ///
    /// Validates the descriptor, resolves the module graph and writes all
    /// artifacts together. Nothing is written if any step fails.
    Build(BuildArgs),

    /// Validate the descriptor without building
    ///
    /// Checks field values, that the entry exists, that every output is
    /// writable and that every plugin is known.
    Check(CheckArgs),
}

/// Where to find the descriptor and the project it describes
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Path to a descriptor file (.toml or .json)
    ///
    /// If not provided, searches the project directory for bale.toml,
    /// bale.config.json, then a "bale" field in package.json.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project directory that descriptor paths are relative to
    ///
    /// Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}
