//! Error handling utilities for the CLI.

use verdict::{Error, RenderConfig, render_error_to};

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, Error>;

pub fn render_config(no_color: bool, filename: Option<&str>) -> RenderConfig<'_> {
    RenderConfig {
        color: !no_color,
        filename,
        ..Default::default()
    }
}

/// Render an error to stderr.
pub fn render(error: &Error, no_color: bool, filename: Option<&str>) {
    render_error_to(error, &mut std::io::stderr(), &render_config(no_color, filename)).ok();
}

/// Render an error to stderr and exit with code 1.
pub fn render_and_exit(error: Error, no_color: bool) -> ! {
    render(&error, no_color, None);
    std::process::exit(1);
}
