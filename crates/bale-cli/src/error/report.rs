//! Conversion from CLI errors to miette reports.

use miette::Report;

use super::CliError;

/// Convert a [`CliError`] into a miette [`Report`].
///
/// Bundler errors already implement `Diagnostic`, so they keep their codes
/// and help text. Config errors are routed through the bundler's wrapper to
/// pick up the same rendering.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => Report::new(e),
        CliError::Config(e) => Report::new(bale_bundler::Error::Config(e)),
        other => miette::miette!("{}", other),
    }
}
