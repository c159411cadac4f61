//! bale CLI - applies a build descriptor from the command line.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `build` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and the build summary
//!
//! # Example
//!
//! ```rust,no_run
//! use bale_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
