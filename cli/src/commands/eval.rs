//! The `eval` command - evaluate an expression.

use std::process::ExitCode;

use verdict::{Engine, EngineOptions};

use crate::cli::EvalArgs;
use crate::common::CliResult;
use crate::common::vars::build_bindings;

/// Run the eval command.
///
/// Prints the result on stdout. The exit status only reports whether
/// evaluation succeeded, not whether the expression held.
pub fn run(args: EvalArgs) -> CliResult<ExitCode> {
    let bindings = build_bindings(&args.vars)?;
    let engine = Engine::new(EngineOptions {
        max_depth: args.max_depth,
        ..EngineOptions::default()
    });

    let expr = engine.compile(&args.expression)?;
    let result = expr.run(&bindings)?;
    println!("{result}");
    Ok(ExitCode::SUCCESS)
}
