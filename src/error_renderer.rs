//! Error rendering using ariadne.
//!
//! Errors that carry a diagnostic are drawn against the expression text with
//! the offending span underlined; the rest are printed as a single line.

use std::io::Write;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};

use crate::{Diagnostic, Error};

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Unicode,
    /// ASCII only, for terminals that cannot draw box characters.
    Ascii,
}

#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Emit ANSI color codes.
    pub color: bool,
    /// Name shown in the report header. Defaults to `<expression>`.
    pub filename: Option<&'a str>,
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Renders `error` to stderr with the default configuration.
///
/// # Example
/// ```no_run
/// use verdict::{Bindings, eval, render_error};
///
/// if let Err(e) = eval("$speed > limit", &Bindings::new()) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Renders `error` to `writer`.
///
/// # Example
/// ```
/// use verdict::{Bindings, RenderConfig, eval, render_error_to};
///
/// let err = eval("1 < $missing", &Bindings::new()).unwrap_err();
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// assert!(String::from_utf8_lossy(&buf).contains("[E003] Error"));
/// ```
pub fn render_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    match (error.diagnostic(), error.input()) {
        (Some(diagnostic), Some(input)) => render_diagnostic(input, diagnostic, writer, config),
        _ => writeln!(writer, "Error: {error}"),
    }
}

fn render_diagnostic(
    input: &str,
    diagnostic: &Diagnostic,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let filename = config.filename.unwrap_or("<expression>");
    let span = diagnostic.span.0.clone();

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(charset);

    let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
        .with_message(&diagnostic.message)
        .with_config(ariadne_config);
    if let Some(code) = diagnostic.code {
        report = report.with_code(code);
    }
    report = report.with_label(
        Label::new((filename, span))
            .with_message(&diagnostic.message)
            .with_color(colors.next()),
    );
    for help in &diagnostic.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((filename, Source::from(input)), &mut *writer)
}
