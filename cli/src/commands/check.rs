//! The `check` command - validate expressions without evaluating them.

use std::process::ExitCode;

use verdict::{Engine, EngineOptions};

use crate::cli::CheckArgs;
use crate::common::CliResult;
use crate::common::error::render;
use crate::common::input::read_input;

/// Run the check command.
pub fn run(args: CheckArgs, no_color: bool) -> CliResult<ExitCode> {
    let engine = Engine::new(EngineOptions {
        max_depth: args.max_depth,
        ..EngineOptions::default()
    });

    let mut has_errors = false;
    for file in &args.files {
        if !check_file(&engine, file, args.quiet, no_color) {
            has_errors = true;
        }
    }

    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Check a single file. Returns true if OK, false if errors.
fn check_file(engine: &Engine, path: &str, quiet: bool, no_color: bool) -> bool {
    let (content, display_name) = match read_input(path) {
        Ok(c) => c,
        Err(e) => {
            if !quiet {
                eprintln!("error: {e}");
            }
            return false;
        }
    };

    match engine.compile(&content) {
        Ok(_) => {
            if !quiet {
                println!("{display_name}: OK");
            }
            true
        }
        Err(e) => {
            tracing::debug!(file = %display_name, error = %e, "Check failed");
            if !quiet {
                render(&e, no_color, Some(display_name.as_str()));
            }
            false
        }
    }
}
