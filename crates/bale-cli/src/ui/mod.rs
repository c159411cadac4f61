//! Terminal output: status messages and the build summary.
//!
//! Everything goes to stderr so stdout stays free for piping. `--quiet`
//! silences all of it; errors are reported by miette instead.
//!
//! ```no_run
//! use bale_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Loading bale.toml");
//! ui::success("Build completed");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{SummaryEntry, format_duration, format_size, print_build_summary};
pub use messages::{info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Decide whether color output should be used.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stderr is attended.
pub fn should_use_color(no_color_env: bool, force_color_env: bool, attended: bool) -> bool {
    if no_color_env {
        return false;
    }
    force_color_env || attended
}

/// Initialize color support from the `--no-color` flag and the environment.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color
        && should_use_color(
            std::env::var_os("NO_COLOR").is_some(),
            std::env::var_os("FORCE_COLOR").is_some(),
            console::user_attended_stderr(),
        );
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Apply the `--quiet` flag.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_overrides_force_color() {
        assert!(!should_use_color(true, true, true));
    }

    #[test]
    fn force_color_enables_without_a_terminal() {
        assert!(should_use_color(false, true, false));
    }

    #[test]
    fn follows_terminal_by_default() {
        assert!(should_use_color(false, false, true));
        assert!(!should_use_color(false, false, false));
    }
}
