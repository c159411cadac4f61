//! `bale build`: load the descriptor, bundle and write every output.

use std::time::Instant;

use bale_bundler::Bundler;
use tracing::debug;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// 1. Resolve the project directory and load the descriptor
/// 2. Validate, resolve the module graph and render each output
/// 3. Write all artifacts together
/// 4. Display the build summary
///
/// Any failure before step 3 leaves the output locations untouched.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let cwd = utils::resolve_cwd(args.project.cwd.as_deref())?;
    let (spec, config_path) = utils::load_spec(&args.project, &cwd)?;
    ui::info(&format!(
        "Loaded {}",
        utils::display_relative(&config_path, &cwd)
    ));
    ui::info(&format!("Building: {}", spec.entry.display()));
    debug!(
        outputs = spec.output.len(),
        externals = spec.external.len(),
        plugins = spec.plugins.len(),
        "descriptor loaded"
    );

    let result = Bundler::new(spec).cwd(&cwd).build().await?;
    for name in &result.unused_externals {
        ui::warning(&format!("{name} is declared external but never imported"));
    }

    let entries: Vec<ui::SummaryEntry> = result
        .artifacts
        .iter()
        .map(|artifact| ui::SummaryEntry {
            path: utils::display_relative(&artifact.path, &cwd),
            format: artifact.format.to_string(),
            size: artifact.size() as u64,
        })
        .collect();

    let duration = start_time.elapsed();
    ui::print_build_summary(&entries, duration);
    ui::success(&format!(
        "Bundled {} module{} in {}",
        result.module_count,
        if result.module_count == 1 { "" } else { "s" },
        ui::format_duration(duration)
    ));

    Ok(())
}
