//! Command-line interface definition, using clap v4's derive macros.
//!
//! - `bale build` - bundle the entry into every declared output
//! - `bale check` - load and validate the descriptor without building

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, ProjectArgs};

/// bale - bundle one ES module entry into CommonJS and ES module artifacts
#[derive(Parser, Debug)]
#[command(
    name = "bale",
    version,
    about = "Bundle one ES module entry into CommonJS and ES module artifacts",
    long_about = "bale reads a build descriptor (bale.toml, bale.config.json or the \"bale\"\n\
                  field of package.json), resolves the module graph reachable from its entry\n\
                  and writes one bundle per declared output, leaving externals unbundled."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every resolved import and the module graph size.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    ///
    /// Status lines, warnings and the build summary are not printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
