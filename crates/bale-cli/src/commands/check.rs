//! `bale check`: validate the descriptor without building.

use bale_bundler::PluginRegistry;
use bale_config::{ConfigValidator, FsValidator};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Runs every check a build performs before it touches the module graph:
/// field values, entry existence, output writability and plugin names.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let cwd = utils::resolve_cwd(args.project.cwd.as_deref())?;
    let (spec, config_path) = utils::load_spec(&args.project, &cwd)?;
    let shown = utils::display_relative(&config_path, &cwd);

    FsValidator::new(&cwd).validate(&spec)?;
    let plugins = PluginRegistry::from_refs(&spec.plugins)?;

    ui::success(&format!("{shown} is valid"));
    ui::info(&format!("Entry: {}", spec.entry.display()));
    for target in &spec.output {
        ui::info(&format!("Output: {} ({})", target.file.display(), target.format));
    }
    if !spec.external.is_empty() {
        let externals: Vec<&str> = spec.external.iter().map(String::as_str).collect();
        ui::info(&format!("External: {}", externals.join(", ")));
    }
    ui::info(&format!("Plugins: {}", plugins.len()));

    Ok(())
}
